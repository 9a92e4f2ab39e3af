use image::{Rgba, RgbaImage};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tilescope::export::{ChannelObserver, ExportSignal};
use tilescope::input::{InputEvent, KeyCode, KeyModifiers, MouseButton, PanelCommand};
use tilescope::traits::{DialogKind, DialogProvider, DialogResponse, ImageStore};
use tilescope::{Action, InputHandler, Point, Result, TileCoord, TileScope};

/// End-to-end sessions driving a scope through input events and collaborators
#[cfg(test)]
mod session_tests {
    use super::*;

    #[derive(Default)]
    struct RecordingStore {
        saved: RefCell<Vec<(PathBuf, (u32, u32))>>,
    }

    impl ImageStore for RecordingStore {
        fn load_image(&self, _path: &Path) -> Result<RgbaImage> {
            Ok(RgbaImage::from_fn(2048, 512, |x, y| {
                Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
            }))
        }

        fn save_image(&self, path: &Path, image: &RgbaImage) -> Result<()> {
            self.saved
                .borrow_mut()
                .push((path.to_path_buf(), image.dimensions()));
            Ok(())
        }
    }

    struct FixedDialogs(Option<DialogResponse>);

    impl DialogProvider for FixedDialogs {
        fn show_dialog(&mut self, _kind: DialogKind) -> Option<DialogResponse> {
            self.0.clone()
        }
    }

    fn ctrl(key: KeyCode) -> InputEvent {
        InputEvent::KeyPress {
            key,
            modifiers: KeyModifiers::CTRL,
        }
    }

    /// Search through the dialog, then render a frame showing the selection
    #[test]
    fn test_search_then_render() {
        let mut scope = TileScope::default();
        let mut handler = InputHandler::new();
        let store = RecordingStore::default();

        let mut open = FixedDialogs(Some(DialogResponse::Path(PathBuf::from("atlas.png"))));
        assert!(scope.open_image_with(&mut open, &store).unwrap());

        assert_eq!(handler.handle_event(ctrl(KeyCode::F), &mut scope), Some(Action::Search));
        let mut search = FixedDialogs(Some(DialogResponse::Text(" 2304 ".to_string())));
        let found = scope.search_with(&mut search).unwrap();
        assert_eq!(found, Some(TileCoord::new(64, 16)));

        let frame = scope.render_frame();
        assert_eq!(frame.dimensions(), (1000, 700));
        assert_eq!(scope.cache().rebuild_count(), 1);

        let plan = scope.frame_plan();
        assert_eq!(plan.selected.len(), 1);
        assert!(plan.labels.iter().all(|label| label.text.len() == 2));

        // nothing moved, so the next frame reuses the cache
        scope.render_frame();
        assert_eq!(scope.cache().rebuild_count(), 1);
    }

    /// Copy request round trip with a multi-selection
    #[test]
    fn test_copy_ids_from_clicks() {
        let mut scope = TileScope::default();
        let mut handler = InputHandler::new();

        for (x, modifiers) in [(8.0, KeyModifiers::default()), (264.0, KeyModifiers::SHIFT)] {
            handler.handle_event(
                InputEvent::MouseDown {
                    position: Point::new(x, 60.0),
                    button: MouseButton::Left,
                    modifiers,
                },
                &mut scope,
            );
        }

        assert_eq!(handler.handle_event(ctrl(KeyCode::C), &mut scope), Some(Action::CopyIds));
        // tile (0, 0) is ID 0, tile (16, 0) starts the second band
        assert_eq!(scope.copy_ids_text().as_deref(), Some("0, 512"));
    }

    /// A cancel signal pending before the first report aborts without saving
    #[test]
    fn test_cancelled_export_writes_nothing() {
        let mut scope = TileScope::default();
        let mut handler = InputHandler::new();
        let store = RecordingStore::default();

        let action = handler.handle_event(InputEvent::Panel(PanelCommand::Export), &mut scope);
        assert_eq!(action, Some(Action::Export));

        let (mut observer, progress, cancel) = ChannelObserver::new();
        cancel.send(ExportSignal::Cancel).unwrap();

        let mut dialogs = FixedDialogs(Some(DialogResponse::Path(PathBuf::from("out.png"))));
        let outcome = scope
            .export_with(&mut dialogs, &store, &mut observer)
            .unwrap()
            .unwrap();

        assert!(outcome.is_cancelled());
        assert!(store.saved.borrow().is_empty());
        assert_eq!(progress.try_iter().count(), 1);
    }

    /// A completed export saves one atlas-sized image and reports full progress
    #[test]
    fn test_completed_export_saves_atlas() {
        let mut scope = TileScope::default();
        let store = RecordingStore::default();
        let (mut observer, progress, _cancel) = ChannelObserver::new();

        let outcome = scope
            .export_to(Path::new("exports/tiles.jpg"), &store, &mut observer)
            .unwrap();

        assert!(!outcome.is_cancelled());
        assert_eq!(
            store.saved.borrow().as_slice(),
            &[(PathBuf::from("exports/tiles.jpg"), (2048, 512))]
        );
        let last = progress.try_iter().last().unwrap();
        assert_eq!(last.fraction(), 1.0);
        assert_eq!(scope.settings_snapshot().export.default_format, "jpg");
    }

    /// Cancelling the save dialog leaves everything as it was
    #[test]
    fn test_cancelled_dialogs_change_nothing() {
        let mut scope = TileScope::default();
        let store = RecordingStore::default();
        let before = scope.viewport().clone();
        let mut dialogs = FixedDialogs(None);
        let (mut observer, _progress, _cancel) = ChannelObserver::new();

        assert!(scope
            .export_with(&mut dialogs, &store, &mut observer)
            .unwrap()
            .is_none());
        assert!(!scope.open_image_with(&mut dialogs, &store).unwrap());
        assert_eq!(scope.search_with(&mut dialogs).unwrap(), None);

        assert_eq!(scope.viewport(), &before);
        assert!(store.saved.borrow().is_empty());
        assert!(scope.status().latest().is_none());
    }
}
