pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{InputEvent, KeyCode, KeyModifiers, MouseButton, PanelCommand};
pub use handler::{Action, InputHandler};
