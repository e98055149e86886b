use moltfilter_core::{CoreError, FeedQuery, Post};
use std::future::Future;

/// Anything that can supply a page of posts for a query.
pub trait FeedSource {
    fn fetch_posts(
        &self,
        query: &FeedQuery,
    ) -> impl Future<Output = Result<Vec<Post>, CoreError>> + Send;
}

/// A fixed page of posts, e.g. a saved API response.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    posts: Vec<Post>,
}

impl StaticSource {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// Load a saved `/posts` response body.
    pub fn from_json(body: &str) -> Result<Self, CoreError> {
        crate::api::parse_posts_response(body).map(Self::new)
    }
}

impl FeedSource for StaticSource {
    async fn fetch_posts(&self, _query: &FeedQuery) -> Result<Vec<Post>, CoreError> {
        Ok(self.posts.clone())
    }
}
