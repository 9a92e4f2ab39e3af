//! The owning state handle of a viewing session.
//!
//! `TileScope` ties the grid, viewport, render cache, selection and status
//! board together for a single-threaded frame loop. Components stay separate
//! and are reached through accessors; the scope only sequences them and talks
//! to the collaborators behind [`crate::traits`].

use crate::core::config::{ColorConfig, TileScopeConfig, ToggleConfig};
use crate::core::constants::SEARCH_MIN_ZOOM;
use crate::core::geo::{Point, TileCoord};
use crate::core::grid::TileGrid;
use crate::core::selection::{SelectionModel, SelectionModifiers};
use crate::core::status::StatusBoard;
use crate::core::viewport::Viewport;
use crate::export::format::ExportFormat;
use crate::export::pipeline::{ExportObserver, ExportOptions, ExportOutcome, ExportPipeline};
use crate::rendering::cache::{OverlaySurfaces, RenderCache};
use crate::rendering::compositor;
use crate::rendering::frame::FramePlan;
use crate::spatial::culling::{TileRange, VisibilityCuller};
use crate::tiles::source::{placeholder_gradient, prepare_atlas, AtlasIssue};
use crate::traits::{DialogKind, DialogProvider, DialogResponse, ImageStore};
use crate::{Result, TileScopeError};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Tooltip content for the hovered tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverInfo {
    pub coord: TileCoord,
    pub id: u32,
}

impl HoverInfo {
    pub fn lines(&self) -> [String; 2] {
        [format!("ID: {}", self.id), format!("Pos: {}", self.coord)]
    }
}

pub struct TileScope {
    config: TileScopeConfig,
    grid: TileGrid,
    viewport: Viewport,
    cache: RenderCache,
    selection: SelectionModel,
    base_image: RgbaImage,
    toggles: ToggleConfig,
    panel_visible: bool,
    hover: Option<TileCoord>,
    status: StatusBoard,
    export_dir: PathBuf,
    export_format: ExportFormat,
}

impl TileScope {
    /// Session on the reference atlas, showing the placeholder image
    pub fn new(config: TileScopeConfig) -> Self {
        Self::with_grid(TileGrid::reference(), config)
    }

    pub fn with_grid(grid: TileGrid, config: TileScopeConfig) -> Self {
        let viewport = Viewport::new(&grid, &config.view);
        let cache = RenderCache::new(grid.tile_size(), &config.colors);
        let base_image = placeholder_gradient(grid.image_width(), grid.image_height());
        let export_format = ExportFormat::from_setting(&config.export.default_format);
        let export_dir = PathBuf::from(&config.export.default_path);

        Self {
            toggles: config.toggles,
            config,
            grid,
            viewport,
            cache,
            selection: SelectionModel::new(),
            base_image,
            panel_visible: true,
            hover: None,
            status: StatusBoard::new(),
            export_dir,
            export_format,
        }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn base_image(&self) -> &RgbaImage {
        &self.base_image
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn colors(&self) -> &ColorConfig {
        &self.config.colors
    }

    pub fn toggles(&self) -> ToggleConfig {
        self.toggles
    }

    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    pub fn hover(&self) -> Option<TileCoord> {
        self.hover
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn export_format(&self) -> ExportFormat {
        self.export_format
    }

    pub fn effective_zoom(&self) -> f64 {
        self.viewport.effective_zoom()
    }

    pub fn visible_tile_range(&self) -> TileRange {
        VisibilityCuller::visible_range(&self.viewport)
    }

    pub fn screen_to_image(&self, screen: Point) -> Point {
        self.viewport.screen_to_image(screen)
    }

    pub fn image_to_tile(&self, image: Point) -> Option<TileCoord> {
        self.viewport.image_to_tile(image)
    }

    /// The scaled atlas, `None` until the first [`TileScope::refresh_cache`]
    pub fn scaled_image(&self) -> Option<&RgbaImage> {
        self.cache.scaled_image()
    }

    pub fn overlay_surfaces(&self) -> Option<OverlaySurfaces<'_>> {
        self.cache.overlay_surfaces()
    }

    /// Installs a new base atlas, substituting or rescaling as needed, and
    /// resets the view
    pub fn replace_image(&mut self, image: Option<RgbaImage>) {
        let prepared = prepare_atlas(image, &self.grid);
        match prepared.issue {
            Some(AtlasIssue::Placeholder) => {
                self.status.warning("No usable image, showing placeholder.");
            }
            Some(AtlasIssue::Resized { .. }) => {
                self.status.warning(format!(
                    "Image resized to {}x{}",
                    self.grid.image_width(),
                    self.grid.image_height()
                ));
            }
            None => {}
        }
        self.base_image = prepared.image;
        self.cache.invalidate();
        self.viewport.reset();
    }

    /// Loads an atlas through `store`. A failed load still installs the
    /// placeholder before the error is returned.
    pub fn load_image_from(&mut self, path: &Path, store: &dyn ImageStore) -> Result<()> {
        match store.load_image(path) {
            Ok(image) => {
                log::info!("loaded atlas {}", path.display());
                self.replace_image(Some(image));
                Ok(())
            }
            Err(err) => {
                self.replace_image(None);
                self.status.error(format!("Error loading image: {}", err));
                Err(err)
            }
        }
    }

    /// Asks for an image and loads it. Returns `false` when the dialog was cancelled.
    pub fn open_image_with(
        &mut self,
        dialogs: &mut dyn DialogProvider,
        store: &dyn ImageStore,
    ) -> Result<bool> {
        let kind = DialogKind::OpenImage {
            initial_dir: self.export_dir.clone(),
        };
        let Some(DialogResponse::Path(path)) = dialogs.show_dialog(kind) else {
            return Ok(false);
        };

        self.load_image_from(&path, store)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.export_dir = parent.to_path_buf();
        }
        Ok(true)
    }

    /// Brings the cache in line with the viewport. Returns whether it rebuilt.
    pub fn refresh_cache(&mut self) -> bool {
        if self.viewport.take_surfaces_dirty() {
            self.cache.invalidate();
        }
        self.cache.refresh(&self.base_image, &self.viewport)
    }

    pub fn frame_plan(&self) -> FramePlan {
        FramePlan::build(
            &self.grid,
            &self.viewport,
            &self.selection,
            self.hover,
            &self.toggles,
            &self.config.labels,
        )
    }

    /// Refreshes the cache and rasterises the current frame
    pub fn render_frame(&mut self) -> RgbaImage {
        self.refresh_cache();
        let plan = self.frame_plan();
        let size = (
            self.viewport.screen_width().round() as u32,
            self.viewport.screen_height().round() as u32,
        );
        compositor::compose_frame(&plan, &self.cache, &self.config.colors, size)
    }

    /// Recomputes the hovered tile; nothing is hovered over the panel
    pub fn update_hover(&mut self, screen: Point) {
        self.hover = self.viewport.screen_to_tile(screen);
    }

    pub fn hover_info(&self) -> Option<HoverInfo> {
        self.hover.map(|coord| HoverInfo {
            coord,
            id: self.grid.tile_id(coord),
        })
    }

    /// Applies a click at a screen position. Returns the tile it landed on.
    pub fn click_at(&mut self, screen: Point, modifiers: SelectionModifiers) -> Option<TileCoord> {
        let coord = self.viewport.screen_to_tile(screen)?;
        self.selection.click(coord, modifiers);
        Some(coord)
    }

    /// Selects the tile carrying `tile_id`, zooms in to at least 2x and
    /// centers it. Nothing changes when the ID does not exist.
    pub fn search_and_select(&mut self, tile_id: i64) -> Result<TileCoord> {
        let coord = self
            .grid
            .tile_from_id(tile_id)
            .ok_or(TileScopeError::TileNotFound(tile_id))?;

        self.selection.replace(coord);
        if self.viewport.zoom() < SEARCH_MIN_ZOOM {
            self.viewport.set_zoom(SEARCH_MIN_ZOOM);
        }
        let tile = self.grid.tile_size() as f64;
        self.viewport.center_on_image_point(Point::new(
            (coord.col as f64 + 0.5) * tile,
            (coord.row as f64 + 0.5) * tile,
        ));
        Ok(coord)
    }

    /// Parses free text as a tile ID and searches for it, posting the result
    pub fn search_text(&mut self, text: &str) -> Result<TileCoord> {
        let trimmed = text.trim();
        let tile_id: i64 = match trimmed.parse() {
            Ok(id) => id,
            Err(_) => {
                self.status.error("Invalid Tile ID format.");
                return Err(TileScopeError::InvalidTileId(trimmed.to_string()));
            }
        };

        match self.search_and_select(tile_id) {
            Ok(coord) => {
                self.status.info(format!("Found Tile ID: {}", tile_id));
                Ok(coord)
            }
            Err(err) => {
                self.status.error(format!("Tile ID {} not found or invalid.", tile_id));
                Err(err)
            }
        }
    }

    /// Prompts for a tile ID. `Ok(None)` when cancelled or left empty.
    pub fn search_with(&mut self, dialogs: &mut dyn DialogProvider) -> Result<Option<TileCoord>> {
        let prompt = format!(
            "Enter Tile ID (0-{}):",
            self.grid.total_tiles().saturating_sub(1)
        );
        match dialogs.show_dialog(DialogKind::SearchTile { prompt }) {
            Some(DialogResponse::Text(text)) if !text.trim().is_empty() => {
                self.search_text(&text).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Selected IDs for the clipboard, `None` with a notice when nothing is selected
    pub fn copy_ids_text(&mut self) -> Option<String> {
        if self.selection.is_empty() {
            self.status.info("No tiles selected.");
            return None;
        }
        let ids = self.selection.id_list(&self.grid);
        let preview: String = ids.chars().take(50).collect();
        self.status
            .success(format!("{} ID(s) copied: {}...", self.selection.len(), preview));
        Some(ids)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            show_overlay: self.toggles.show_background_overlay,
            show_grid: self.toggles.show_grid,
            show_numbers: self.toggles.show_numbers,
            ..ExportOptions::from_config(&self.config)
        }
    }

    /// Exports the full atlas to `path` with the current toggles
    pub fn export_to(
        &mut self,
        path: &Path,
        store: &dyn ImageStore,
        observer: &mut dyn ExportObserver,
    ) -> Result<ExportOutcome> {
        let outcome = ExportPipeline::new(&self.grid, self.export_options())
            .export_to(&self.base_image, path, store, observer);

        match &outcome {
            Ok(ExportOutcome::Completed(_)) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.status.success(format!("Exported to {}", name));
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    self.export_dir = parent.to_path_buf();
                }
                self.export_format = ExportFormat::from_path(path).unwrap_or_default();
            }
            Ok(ExportOutcome::Cancelled { .. }) => self.status.info("Export cancelled."),
            Err(err) => self.status.error(format!("Error saving: {}", err)),
        }
        outcome
    }

    /// Asks for a destination and exports. `Ok(None)` when the dialog was cancelled.
    pub fn export_with(
        &mut self,
        dialogs: &mut dyn DialogProvider,
        store: &dyn ImageStore,
        observer: &mut dyn ExportObserver,
    ) -> Result<Option<ExportOutcome>> {
        let kind = DialogKind::SaveExport {
            initial_dir: self.export_dir.clone(),
            suggested_name: self.export_format.suggested_file_name(),
        };
        let Some(DialogResponse::Path(path)) = dialogs.show_dialog(kind) else {
            return Ok(None);
        };
        self.export_to(&path, store, observer).map(Some)
    }

    pub fn toggle_grid(&mut self) -> bool {
        self.toggles.show_grid = !self.toggles.show_grid;
        self.toggles.show_grid
    }

    pub fn toggle_numbers(&mut self) -> bool {
        self.toggles.show_numbers = !self.toggles.show_numbers;
        self.toggles.show_numbers
    }

    pub fn toggle_overlay(&mut self) -> bool {
        self.toggles.show_background_overlay = !self.toggles.show_background_overlay;
        self.toggles.show_background_overlay
    }

    /// Shows or hides the bottom panel, giving its height back to the tile view
    pub fn toggle_panel(&mut self) -> bool {
        self.panel_visible = !self.panel_visible;
        let reserved = if self.panel_visible {
            self.config.view.panel_height
        } else {
            0.0
        };
        self.viewport.set_reserved_bottom(reserved);
        self.panel_visible
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
    }

    /// Configuration reflecting the session's toggles and export defaults,
    /// for the persistence collaborator
    pub fn settings_snapshot(&self) -> TileScopeConfig {
        let mut config = self.config.clone();
        config.toggles = self.toggles;
        config.export.default_path = self.export_dir.to_string_lossy().into_owned();
        config.export.default_format = self.export_format.extension().to_string();
        config
    }
}

impl Default for TileScope {
    fn default() -> Self {
        Self::new(TileScopeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::StatusLevel;
    use crate::export::pipeline::SilentObserver;
    use std::cell::RefCell;

    struct ScriptedDialogs {
        responses: Vec<Option<DialogResponse>>,
        asked: Vec<DialogKind>,
    }

    impl ScriptedDialogs {
        fn new(responses: Vec<Option<DialogResponse>>) -> Self {
            Self {
                responses,
                asked: Vec::new(),
            }
        }
    }

    impl DialogProvider for ScriptedDialogs {
        fn show_dialog(&mut self, kind: DialogKind) -> Option<DialogResponse> {
            self.asked.push(kind);
            if self.responses.is_empty() {
                None
            } else {
                self.responses.remove(0)
            }
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        image: Option<RgbaImage>,
        saved: RefCell<Vec<PathBuf>>,
    }

    impl ImageStore for MemoryStore {
        fn load_image(&self, path: &Path) -> Result<RgbaImage> {
            self.image.clone().ok_or_else(|| {
                TileScopeError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    path.display().to_string(),
                ))
            })
        }

        fn save_image(&self, path: &Path, _image: &RgbaImage) -> Result<()> {
            self.saved.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    fn level(scope: &TileScope) -> Option<StatusLevel> {
        scope.status().latest().map(|m| m.level)
    }

    #[test]
    fn test_search_selects_zooms_and_centers() {
        let mut scope = TileScope::default();
        let coord = scope.search_and_select(2304).unwrap();

        assert_eq!(coord, TileCoord::new(64, 16));
        assert_eq!(scope.selection().len(), 1);
        assert!(scope.selection().contains(&coord));
        assert!((scope.viewport().zoom() - 2.0).abs() < 1e-9);

        let center = scope.viewport().view_center();
        assert_eq!(scope.viewport().screen_to_tile(center), Some(coord));
    }

    #[test]
    fn test_search_keeps_higher_zoom() {
        let mut scope = TileScope::default();
        scope.viewport_mut().set_zoom(3.0);
        scope.search_and_select(0).unwrap();
        assert!((scope.viewport().zoom() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_failed_search_changes_nothing() {
        let mut scope = TileScope::default();
        scope.click_at(Point::new(20.0, 60.0), SelectionModifiers::NONE);
        let before = scope.viewport().clone();
        let selection = scope.selection().clone();

        assert!(matches!(scope.search_text("4096"), Err(TileScopeError::TileNotFound(4096))));
        assert!(matches!(scope.search_text("-1"), Err(TileScopeError::TileNotFound(-1))));
        assert!(matches!(scope.search_text("abc"), Err(TileScopeError::InvalidTileId(_))));

        assert_eq!(scope.viewport(), &before);
        assert_eq!(scope.selection(), &selection);
        assert_eq!(level(&scope), Some(StatusLevel::Error));
    }

    #[test]
    fn test_search_dialog_cancel_is_noop() {
        let mut scope = TileScope::default();
        let mut dialogs = ScriptedDialogs::new(vec![None, Some(DialogResponse::Text("  ".into()))]);

        assert_eq!(scope.search_with(&mut dialogs).unwrap(), None);
        assert_eq!(scope.search_with(&mut dialogs).unwrap(), None);
        assert!(scope.selection().is_empty());
        assert_eq!(
            dialogs.asked[0],
            DialogKind::SearchTile {
                prompt: "Enter Tile ID (0-4095):".to_string()
            }
        );
    }

    #[test]
    fn test_copy_ids() {
        let mut scope = TileScope::default();
        assert_eq!(scope.copy_ids_text(), None);
        assert_eq!(level(&scope), Some(StatusLevel::Info));

        let shift = SelectionModifiers { shift: true, ctrl: false };
        for id in [512, 3, 16] {
            let coord = scope.grid().tile_from_id(id).unwrap();
            scope.selection.click(coord, shift);
        }
        assert_eq!(scope.copy_ids_text().as_deref(), Some("3, 16, 512"));
        assert_eq!(level(&scope), Some(StatusLevel::Success));
    }

    #[test]
    fn test_hover_info_lines() {
        let mut scope = TileScope::default();
        // default view: atlas at (0, 51.5), zoom 1
        scope.update_hover(Point::new(17.0, 70.0));

        let info = scope.hover_info().unwrap();
        assert_eq!(info.coord, TileCoord::new(1, 1));
        assert_eq!(info.lines(), ["ID: 17".to_string(), "Pos: (1, 1)".to_string()]);

        // over the panel
        scope.update_hover(Point::new(17.0, 650.0));
        assert_eq!(scope.hover_info(), None);
    }

    #[test]
    fn test_panel_toggle_changes_view_height() {
        let mut scope = TileScope::default();
        assert_eq!(scope.viewport().view_height(), 615.0);

        assert!(!scope.toggle_panel());
        assert_eq!(scope.viewport().view_height(), 700.0);
        assert_eq!(scope.viewport().offset().y, 94.0);

        assert!(scope.toggle_panel());
        assert_eq!(scope.viewport().view_height(), 615.0);
    }

    #[test]
    fn test_replace_image_warns_and_resets() {
        let mut scope = TileScope::default();
        scope.viewport_mut().set_zoom(3.0);
        scope.refresh_cache();

        scope.replace_image(Some(RgbaImage::new(100, 100)));
        assert_eq!(scope.base_image().dimensions(), (2048, 512));
        assert_eq!(level(&scope), Some(StatusLevel::Warning));
        assert!((scope.viewport().zoom() - 1.0).abs() < 1e-9);
        assert!(scope.refresh_cache());
    }

    #[test]
    fn test_open_image_flow() {
        let mut scope = TileScope::default();
        let store = MemoryStore {
            image: Some(RgbaImage::new(2048, 512)),
            ..MemoryStore::default()
        };

        let mut cancelled = ScriptedDialogs::new(vec![None]);
        assert!(!scope.open_image_with(&mut cancelled, &store).unwrap());

        let mut dialogs = ScriptedDialogs::new(vec![Some(DialogResponse::Path(
            PathBuf::from("assets/atlas.png"),
        ))]);
        assert!(scope.open_image_with(&mut dialogs, &store).unwrap());
        assert_eq!(scope.export_dir(), Path::new("assets"));
        // fully transparent input is flattened onto black
        assert_eq!(scope.base_image().get_pixel(5, 5)[3], 255);
    }

    #[test]
    fn test_failed_load_installs_placeholder() {
        let mut scope = TileScope::default();
        let store = MemoryStore::default();

        assert!(scope.load_image_from(Path::new("missing.png"), &store).is_err());
        assert_eq!(level(&scope), Some(StatusLevel::Error));
        assert_eq!(scope.base_image().get_pixel(0, 0)[0], 200);
    }

    #[test]
    fn test_export_flow_updates_defaults() {
        let mut scope = TileScope::default();
        let store = MemoryStore::default();
        let mut dialogs = ScriptedDialogs::new(vec![Some(DialogResponse::Path(
            PathBuf::from("out/atlas.bmp"),
        ))]);

        let outcome = scope
            .export_with(&mut dialogs, &store, &mut SilentObserver)
            .unwrap()
            .unwrap();
        assert!(!outcome.is_cancelled());
        assert_eq!(store.saved.borrow().as_slice(), &[PathBuf::from("out/atlas.bmp")]);
        assert_eq!(
            dialogs.asked[0],
            DialogKind::SaveExport {
                initial_dir: PathBuf::from("."),
                suggested_name: "tileset_export.png".to_string(),
            }
        );

        let snapshot = scope.settings_snapshot();
        assert_eq!(snapshot.export.default_format, "bmp");
        assert_eq!(snapshot.export.default_path, "out");
    }

    #[test]
    fn test_toggles_reach_export_and_snapshot() {
        let mut scope = TileScope::default();
        assert!(!scope.toggle_grid());
        assert!(!scope.toggle_overlay());

        let options = scope.export_options();
        assert!(!options.show_grid);
        assert!(!options.show_overlay);
        assert!(options.show_numbers);
        assert!(!scope.settings_snapshot().toggles.show_grid);
    }
}
