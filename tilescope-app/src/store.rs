use image::{DynamicImage, RgbaImage};
use std::path::Path;
use tilescope::export::ExportFormat;
use tilescope::traits::ImageStore;

/// Reads and writes atlas images on the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageStore;

impl ImageStore for FileImageStore {
    fn load_image(&self, path: &Path) -> tilescope::Result<RgbaImage> {
        let image = image::open(path)?;
        Ok(image.to_rgba8())
    }

    fn save_image(&self, path: &Path, image: &RgbaImage) -> tilescope::Result<()> {
        let format = ExportFormat::from_path(path).unwrap_or_default();
        match format {
            // JPEG carries no alpha channel
            ExportFormat::Jpeg => DynamicImage::ImageRgba8(image.clone())
                .to_rgb8()
                .save_with_format(path, format.image_format())?,
            _ => image.save_with_format(path, format.image_format())?,
        }
        Ok(())
    }
}
