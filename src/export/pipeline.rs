//! Full-resolution atlas export with cooperative progress reporting.
//!
//! The export ignores the viewport entirely and renders at 1:1. Work is done
//! tile by tile: each tile gets its overlay, then its top and left grid edges,
//! then its label. Those operations never leave the tile, so the result is the
//! same as compositing overlay, grid and labels in three global passes, while
//! cancellation can land between any two tiles.

use crate::core::config::{Color, TileScopeConfig};
use crate::core::constants::EXPORT_PROGRESS_INTERVAL;
use crate::core::grid::TileGrid;
use crate::rendering::{glyphs, raster};
use crate::traits::ImageStore;
use crate::{Result, TileScopeError};
use crossbeam_channel::{unbounded, Receiver, Sender};
use image::RgbaImage;
use std::path::Path;

/// What to draw on top of the base atlas
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub show_overlay: bool,
    pub show_grid: bool,
    pub show_numbers: bool,
    pub overlay_color: Color,
    pub grid_color: Color,
    pub number_color: Color,
    /// Label size in pixels at 1:1
    pub label_size: u32,
}

impl ExportOptions {
    pub fn from_config(config: &TileScopeConfig) -> Self {
        Self {
            show_overlay: config.toggles.show_background_overlay,
            show_grid: config.toggles.show_grid,
            show_numbers: config.toggles.show_numbers,
            overlay_color: config.colors.overlay,
            grid_color: config.colors.grid,
            number_color: config.colors.tile_number_text,
            label_size: config.labels.reference_font_size,
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from_config(&TileScopeConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    pub processed: usize,
    pub total: usize,
}

impl ExportProgress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f32 / self.total as f32
        }
    }
}

#[derive(Debug)]
pub enum ExportOutcome {
    /// The composited atlas
    Completed(RgbaImage),
    /// Aborted between tiles; nothing was written
    Cancelled { processed: usize },
}

impl ExportOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Receives progress and is polled for cancellation at every report point
pub trait ExportObserver {
    fn on_progress(&mut self, progress: ExportProgress);

    /// Drains pending external events; `true` aborts the export
    fn should_cancel(&mut self) -> bool;
}

/// Observer that never cancels and ignores progress
#[derive(Debug, Default)]
pub struct SilentObserver;

impl ExportObserver for SilentObserver {
    fn on_progress(&mut self, _progress: ExportProgress) {}

    fn should_cancel(&mut self) -> bool {
        false
    }
}

/// External events that reach a running export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSignal {
    /// Quit or window close
    Cancel,
}

/// Observer backed by channels: progress goes out, cancel signals come in
#[derive(Debug)]
pub struct ChannelObserver {
    progress: Sender<ExportProgress>,
    signals: Receiver<ExportSignal>,
}

impl ChannelObserver {
    /// Returns the observer, the progress receiver and the cancel sender
    pub fn new() -> (Self, Receiver<ExportProgress>, Sender<ExportSignal>) {
        let (progress_tx, progress_rx) = unbounded();
        let (signal_tx, signal_rx) = unbounded();
        (
            Self {
                progress: progress_tx,
                signals: signal_rx,
            },
            progress_rx,
            signal_tx,
        )
    }
}

impl ExportObserver for ChannelObserver {
    fn on_progress(&mut self, progress: ExportProgress) {
        // nobody listening is fine
        let _ = self.progress.send(progress);
    }

    fn should_cancel(&mut self) -> bool {
        self.signals
            .try_iter()
            .any(|signal| signal == ExportSignal::Cancel)
    }
}

/// Renders the whole atlas at native resolution
#[derive(Debug, Clone)]
pub struct ExportPipeline<'a> {
    grid: &'a TileGrid,
    options: ExportOptions,
}

impl<'a> ExportPipeline<'a> {
    pub fn new(grid: &'a TileGrid, options: ExportOptions) -> Self {
        Self { grid, options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Composites the atlas, reporting every [`EXPORT_PROGRESS_INTERVAL`] tiles
    pub fn run(&self, base: &RgbaImage, observer: &mut dyn ExportObserver) -> Result<ExportOutcome> {
        let expected = (self.grid.image_width(), self.grid.image_height());
        if base.dimensions() != expected {
            return Err(TileScopeError::Export(format!(
                "base image is {}x{}, expected {}x{}",
                base.width(),
                base.height(),
                expected.0,
                expected.1
            )));
        }

        let tile = self.grid.tile_size();
        let overlay_tile = RgbaImage::from_pixel(tile, tile, self.options.overlay_color.to_rgba());
        let grid_color = self.options.grid_color.to_rgba();
        let number_color = self.options.number_color.to_rgba();
        let scale = glyphs::scale_for_size(self.options.label_size);

        let mut canvas = base.clone();
        let total = self.grid.total_tiles() as usize;
        let mut processed = 0;

        for coord in self.grid.iter() {
            let (x, y) = self.grid.tile_origin(coord);
            let (x, y) = (x as i64, y as i64);

            if self.options.show_overlay {
                raster::blit(&mut canvas, &overlay_tile, x, y);
            }
            if self.options.show_grid {
                raster::vline(&mut canvas, x, y, y + tile as i64 - 1, grid_color);
                raster::hline(&mut canvas, x, x + tile as i64 - 1, y, grid_color);
            }
            if self.options.show_numbers {
                let label = self.grid.tile_label(coord);
                let (w, h) = glyphs::text_size(&label, scale);
                let tx = x + (tile as i64 - w as i64).div_euclid(2);
                let ty = y + (tile as i64 - h as i64).div_euclid(2);
                glyphs::draw_text(&mut canvas, &label, tx, ty, scale, number_color);
            }

            processed += 1;
            if processed % EXPORT_PROGRESS_INTERVAL == 0 {
                observer.on_progress(ExportProgress { processed, total });
                if observer.should_cancel() {
                    log::info!("export cancelled after {} of {} tiles", processed, total);
                    return Ok(ExportOutcome::Cancelled { processed });
                }
            }
        }

        if processed % EXPORT_PROGRESS_INTERVAL != 0 {
            observer.on_progress(ExportProgress { processed, total });
        }
        Ok(ExportOutcome::Completed(canvas))
    }

    /// Runs the export and saves the result; a cancelled run writes nothing
    pub fn export_to(
        &self,
        base: &RgbaImage,
        path: &Path,
        store: &dyn ImageStore,
        observer: &mut dyn ExportObserver,
    ) -> Result<ExportOutcome> {
        let outcome = self.run(base, observer)?;
        if let ExportOutcome::Completed(image) = &outcome {
            store.save_image(path, image)?;
            log::info!("exported atlas to {}", path.display());
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    struct CancelAfter {
        reports: Vec<ExportProgress>,
        cancel_at: usize,
    }

    impl ExportObserver for CancelAfter {
        fn on_progress(&mut self, progress: ExportProgress) {
            self.reports.push(progress);
        }

        fn should_cancel(&mut self) -> bool {
            self.reports.len() >= self.cancel_at
        }
    }

    fn grey_base(grid: &TileGrid) -> RgbaImage {
        RgbaImage::from_pixel(grid.image_width(), grid.image_height(), Rgba([200, 200, 200, 255]))
    }

    #[test]
    fn test_export_composites_every_layer() {
        let grid = TileGrid::reference();
        let pipeline = ExportPipeline::new(&grid, ExportOptions::default());
        let outcome = pipeline.run(&grey_base(&grid), &mut SilentObserver).unwrap();

        let ExportOutcome::Completed(image) = outcome else {
            panic!("export should complete");
        };
        assert_eq!(image.dimensions(), (2048, 512));
        // grid line over the overlay
        assert_eq!(*image.get_pixel(16, 5), Rgba([60, 70, 90, 255]));
        assert_eq!(*image.get_pixel(2047, 496), Rgba([60, 70, 90, 255]));
        // dimmed atlas away from lines and labels
        assert_eq!(*image.get_pixel(1, 1), Rgba([145, 145, 145, 255]));
        // label "00" of tile (0, 0) starts at (4, 5)
        assert_eq!(*image.get_pixel(4, 5), Rgba([220, 220, 220, 255]));
    }

    #[test]
    fn test_export_without_decorations_copies_base() {
        let grid = TileGrid::new(256, 64, 2).unwrap();
        let options = ExportOptions {
            show_overlay: false,
            show_grid: false,
            show_numbers: false,
            ..ExportOptions::default()
        };
        let base = RgbaImage::from_fn(256, 64, |x, y| Rgba([x as u8, y as u8, 1, 255]));
        let outcome = ExportPipeline::new(&grid, options).run(&base, &mut SilentObserver).unwrap();

        match outcome {
            ExportOutcome::Completed(image) => assert_eq!(image, base),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_progress_reported_every_hundred_tiles() {
        let grid = TileGrid::reference();
        let mut observer = CancelAfter {
            reports: Vec::new(),
            cancel_at: usize::MAX,
        };
        ExportPipeline::new(&grid, ExportOptions::default())
            .run(&grey_base(&grid), &mut observer)
            .unwrap();

        // 40 interval reports and the final one at 4096
        assert_eq!(observer.reports.len(), 41);
        assert_eq!(observer.reports[0], ExportProgress { processed: 100, total: 4096 });
        assert_eq!(observer.reports[40], ExportProgress { processed: 4096, total: 4096 });
        assert_eq!(observer.reports.last().unwrap().fraction(), 1.0);
        assert!(observer.reports.windows(2).all(|w| w[0].processed < w[1].processed));
    }

    #[test]
    fn test_cancellation_stops_at_tile_granularity() {
        let grid = TileGrid::reference();
        let mut observer = CancelAfter {
            reports: Vec::new(),
            cancel_at: 3,
        };
        let outcome = ExportPipeline::new(&grid, ExportOptions::default())
            .run(&grey_base(&grid), &mut observer)
            .unwrap();

        assert!(matches!(outcome, ExportOutcome::Cancelled { processed: 300 }));
    }

    #[test]
    fn test_channel_observer_cancels() {
        let grid = TileGrid::reference();
        let (mut observer, progress, cancel) = ChannelObserver::new();
        cancel.send(ExportSignal::Cancel).unwrap();

        let outcome = ExportPipeline::new(&grid, ExportOptions::default())
            .run(&grey_base(&grid), &mut observer)
            .unwrap();

        assert!(outcome.is_cancelled());
        assert_eq!(progress.try_iter().count(), 1);
    }

    #[test]
    fn test_wrong_base_size_is_an_error() {
        let grid = TileGrid::reference();
        let result = ExportPipeline::new(&grid, ExportOptions::default())
            .run(&RgbaImage::new(10, 10), &mut SilentObserver);

        assert!(matches!(result, Err(TileScopeError::Export(_))));
    }
}
