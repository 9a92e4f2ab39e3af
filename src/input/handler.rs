use crate::{
    core::constants::{KEY_ZOOM_STEP, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT},
    core::geo::Point,
    core::scope::TileScope,
    input::events::{InputEvent, KeyCode, KeyModifiers, MouseButton, PanelCommand},
    prelude::VecDeque,
};

/// Intents that need a collaborator (dialog, clipboard, encoder, window)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OpenImage,
    Search,
    CopyIds,
    Export,
    Quit,
}

/// Turns input events into state changes on a [`TileScope`].
///
/// Viewport, selection, hover and toggle changes are applied directly.
/// Anything that has to go through a collaborator comes back as an [`Action`].
#[derive(Debug)]
pub struct InputHandler {
    pub enabled: bool,
    event_queue: VecDeque<InputEvent>,
    dragging: bool,
    last_pointer: Option<Point>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            enabled: true,
            event_queue: VecDeque::new(),
            dragging: false,
            last_pointer: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Handle one event
    pub fn handle_event(&mut self, event: InputEvent, scope: &mut TileScope) -> Option<Action> {
        if !self.enabled {
            return None;
        }

        match event {
            InputEvent::MouseDown {
                position,
                button: MouseButton::Left,
                modifiers,
            } => {
                // presses over the panel belong to the panel
                if scope.viewport().in_tile_area(position) {
                    self.dragging = true;
                    self.last_pointer = Some(position);
                    if let Some(coord) = scope.click_at(position, modifiers.selection()) {
                        log::debug!("clicked tile {}", coord);
                    }
                }
                None
            }
            InputEvent::MouseDown { .. } => None,
            InputEvent::MouseUp {
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = false;
                self.last_pointer = None;
                None
            }
            InputEvent::MouseUp { .. } => None,
            InputEvent::MouseMove { position } => {
                if self.dragging {
                    if let Some(last) = self.last_pointer {
                        let delta = position.subtract(&last);
                        scope.viewport_mut().pan(delta.x, delta.y);
                    }
                    self.last_pointer = Some(position);
                }
                scope.update_hover(position);
                None
            }
            InputEvent::Scroll { delta, position } => {
                if delta != 0.0 && scope.viewport().in_tile_area(position) {
                    let factor = if delta > 0.0 { WHEEL_ZOOM_IN } else { WHEEL_ZOOM_OUT };
                    scope.viewport_mut().zoom_at_point(factor, position);
                }
                None
            }
            InputEvent::KeyPress { key, modifiers } => self.handle_key(key, modifiers, scope),
            InputEvent::Resize { size } => {
                scope.resize(size.x, size.y);
                None
            }
            InputEvent::Panel(command) => Self::handle_panel(command, scope),
            InputEvent::CloseRequested => Some(Action::Quit),
        }
    }

    fn handle_key(
        &mut self,
        key: KeyCode,
        modifiers: KeyModifiers,
        scope: &mut TileScope,
    ) -> Option<Action> {
        match key {
            KeyCode::F1 => {
                scope.toggle_panel();
            }
            KeyCode::R => scope.reset_view(),
            KeyCode::Plus | KeyCode::Equals => {
                scope.viewport_mut().zoom_at_view_center(KEY_ZOOM_STEP);
            }
            KeyCode::Minus | KeyCode::Underscore => {
                scope.viewport_mut().zoom_at_view_center(1.0 / KEY_ZOOM_STEP);
            }
            KeyCode::G => {
                scope.toggle_grid();
            }
            KeyCode::N => {
                scope.toggle_numbers();
            }
            KeyCode::C if modifiers.ctrl => return Some(Action::CopyIds),
            KeyCode::F if modifiers.ctrl => return Some(Action::Search),
            _ => {}
        }
        None
    }

    fn handle_panel(command: PanelCommand, scope: &mut TileScope) -> Option<Action> {
        match command {
            PanelCommand::OpenImage => return Some(Action::OpenImage),
            PanelCommand::SearchTile => return Some(Action::Search),
            PanelCommand::CopyIds => return Some(Action::CopyIds),
            PanelCommand::Export => return Some(Action::Export),
            PanelCommand::ToggleGrid => {
                scope.toggle_grid();
            }
            PanelCommand::ToggleNumbers => {
                scope.toggle_numbers();
            }
            PanelCommand::ToggleOverlay => {
                scope.toggle_overlay();
            }
            PanelCommand::ZoomIn => {
                scope.viewport_mut().zoom_at_view_center(KEY_ZOOM_STEP);
            }
            PanelCommand::ZoomOut => {
                scope.viewport_mut().zoom_at_view_center(1.0 / KEY_ZOOM_STEP);
            }
            PanelCommand::ResetView => scope.reset_view(),
            PanelCommand::TogglePanel => {
                scope.toggle_panel();
            }
        }
        None
    }

    /// Queue an event for later processing
    pub fn queue_event(&mut self, event: InputEvent) {
        self.event_queue.push_back(event);
    }

    /// Process all queued events and return resulting actions
    pub fn process_queued_events(&mut self, scope: &mut TileScope) -> Vec<Action> {
        let mut actions = vec![];
        while let Some(event) = self.event_queue.pop_front() {
            actions.extend(self.handle_event(event, scope));
        }
        actions
    }

    /// Clear the event queue
    pub fn clear_queue(&mut self) {
        self.event_queue.clear();
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
