//! The stage trait shared by every filter in the pipeline.

use moltfilter_core::Post;

/// One filtering stage.
///
/// Stages take ownership of the batch and return the surviving posts in
/// their original relative order. Records are moved, never modified.
pub trait PostFilter: Send + Sync {
    /// Returns the name of this stage (for logging)
    fn name(&self) -> &str;

    fn apply(&self, posts: Vec<Post>) -> Vec<Post>;
}
