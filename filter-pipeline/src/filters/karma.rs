use crate::traits::PostFilter;
use moltfilter_core::Post;

/// Keeps posts whose `upvotes - downvotes` is at least `min_karma`.
///
/// Any threshold is valid; `i64::MIN` keeps everything.
#[derive(Debug, Clone, Copy)]
pub struct KarmaFilter {
    min_karma: i64,
}

impl KarmaFilter {
    pub fn new(min_karma: i64) -> Self {
        Self { min_karma }
    }

    pub fn min_karma(&self) -> i64 {
        self.min_karma
    }
}

impl PostFilter for KarmaFilter {
    fn name(&self) -> &str {
        "KarmaFilter"
    }

    fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        posts
            .into_iter()
            .filter(|post| post.karma() >= self.min_karma)
            .collect()
    }
}
