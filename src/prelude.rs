//! Prelude module for common tilescope types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use tilescope::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{Color, ColorConfig, TileScopeConfig, ToggleConfig, ViewConfig},
    geo::{Point, TileCoord},
    grid::TileGrid,
    scope::{HoverInfo, TileScope},
    selection::{SelectionModel, SelectionModifiers},
    status::{StatusBoard, StatusLevel},
    viewport::Viewport,
};

pub use crate::export::{
    ChannelObserver, ExportFormat, ExportObserver, ExportOutcome, ExportPipeline, ExportProgress,
    ExportSignal,
};

pub use crate::input::{
    events::{InputEvent, KeyCode, KeyModifiers, MouseButton, PanelCommand},
    handler::{Action, InputHandler},
};

pub use crate::rendering::{cache::RenderCache, frame::FramePlan};

pub use crate::spatial::culling::{TileRange, VisibilityCuller};

pub use crate::traits::{DialogKind, DialogProvider, DialogResponse, ImageStore};

pub use crate::{Error as TileScopeError, Result};

pub use std::collections::VecDeque;

pub use fxhash::FxHashSet as HashSet;
