pub mod api;
pub mod feed;
pub mod retry;
pub mod source;

pub use api::{parse_posts_response, MoltbookClient};
pub use feed::fetch_filtered;
pub use retry::{RetryConfig, RetryExecutor};
pub use source::{FeedSource, StaticSource};
