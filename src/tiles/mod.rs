pub mod source;

pub use source::{prepare_atlas, AtlasIssue, PreparedAtlas};
