use crate::core::geo::Point;
use crate::core::selection::SelectionModifiers;
use serde::{Deserialize, Serialize};

/// Input events delivered by the windowing collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Mouse button pressed
    MouseDown {
        position: Point,
        button: MouseButton,
        modifiers: KeyModifiers,
    },
    /// Mouse button released
    MouseUp { position: Point, button: MouseButton },
    /// Pointer moved
    MouseMove { position: Point },
    /// Scroll wheel; positive delta scrolls up
    Scroll { delta: f64, position: Point },
    /// Keyboard input
    KeyPress {
        key: KeyCode,
        modifiers: KeyModifiers,
    },
    /// Window resize
    Resize { size: Point },
    /// A button of the bottom panel was pressed
    Panel(PanelCommand),
    /// Window close
    CloseRequested,
}

impl InputEvent {
    /// Gets the pointer position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::MouseDown { position, .. } => Some(*position),
            InputEvent::MouseUp { position, .. } => Some(*position),
            InputEvent::MouseMove { position } => Some(*position),
            InputEvent::Scroll { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Keyboard key codes the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    F1,
    R,
    G,
    N,
    C,
    F,
    Plus,
    Equals,
    Minus,
    Underscore,
    Escape,
    Other(u32),
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyModifiers {
    pub const CTRL: KeyModifiers = KeyModifiers {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    pub const SHIFT: KeyModifiers = KeyModifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn selection(&self) -> SelectionModifiers {
        SelectionModifiers {
            shift: self.shift,
            ctrl: self.ctrl,
        }
    }
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Buttons of the bottom panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelCommand {
    OpenImage,
    ToggleGrid,
    ToggleNumbers,
    ToggleOverlay,
    SearchTile,
    CopyIds,
    ZoomIn,
    ZoomOut,
    ResetView,
    Export,
    TogglePanel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_position() {
        let position = Point::new(3.0, 4.0);
        let event = InputEvent::Scroll { delta: 1.0, position };

        assert_eq!(event.position(), Some(position));
        assert_eq!(InputEvent::CloseRequested.position(), None);
    }

    #[test]
    fn test_modifiers_to_selection() {
        assert!(KeyModifiers::CTRL.selection().toggles());
        assert!(KeyModifiers::SHIFT.selection().toggles());
        assert!(!KeyModifiers::default().selection().toggles());
    }

    #[test]
    fn test_events_serialize() {
        let event = InputEvent::KeyPress {
            key: KeyCode::G,
            modifiers: KeyModifiers::default(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: InputEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
