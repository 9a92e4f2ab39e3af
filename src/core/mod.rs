pub mod bounds;
pub mod config;
pub mod constants;
pub mod geo;
pub mod grid;
pub mod scope;
pub mod selection;
pub mod status;
pub mod viewport;
