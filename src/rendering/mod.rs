pub mod cache;
pub mod compositor;
pub mod frame;
pub mod glyphs;
pub mod raster;

// Re-export main types
pub use cache::{OverlaySurfaces, RenderCache};
pub use compositor::compose_frame;
pub use frame::{FramePlan, LineSegment, TileLabel};
