//! Full-resolution export of the atlas with its overlay, grid and labels.

pub mod format;
pub mod pipeline;

pub use format::ExportFormat;
pub use pipeline::{
    ChannelObserver, ExportObserver, ExportOptions, ExportOutcome, ExportPipeline, ExportProgress,
    ExportSignal, SilentObserver,
};
