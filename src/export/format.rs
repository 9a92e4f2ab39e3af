use std::fmt;
use std::path::Path;

/// Raster formats the export can be saved as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Bmp,
}

impl ExportFormat {
    /// Parses an extension, with or without the leading dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Configured default, falling back to PNG for anything unknown
    pub fn from_setting(setting: &str) -> Self {
        Self::from_extension(setting).unwrap_or(Self::Png)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
        }
    }

    /// File name offered by the save dialog
    pub fn suggested_file_name(&self) -> String {
        format!("tileset_export.{}", self.extension())
    }

    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self::Png
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_parsing() {
        assert_eq!(ExportFormat::from_extension("PNG"), Some(ExportFormat::Png));
        assert_eq!(ExportFormat::from_extension(".jpeg"), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_extension("jpg"), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_extension("tga"), None);
    }

    #[test]
    fn test_setting_falls_back_to_png() {
        assert_eq!(ExportFormat::from_setting("bmp"), ExportFormat::Bmp);
        assert_eq!(ExportFormat::from_setting("webp"), ExportFormat::Png);
        assert_eq!(ExportFormat::from_setting("jpeg").suggested_file_name(), "tileset_export.jpg");
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/atlas.BMP")),
            Some(ExportFormat::Bmp)
        );
        assert_eq!(ExportFormat::from_path(Path::new("atlas")), None);
    }
}
