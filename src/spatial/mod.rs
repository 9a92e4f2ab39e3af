pub mod culling;

pub use culling::{TileRange, VisibilityCuller};
