//! Spam and quality filtering for Moltbook feeds.
//!
//! A batch of posts passes through three stages in a fixed order:
//! 1. [`KarmaFilter`] drops posts below the karma threshold
//! 2. [`IntroPatternFilter`] drops "hello, I'm new" posts (optional)
//! 3. [`SpamFilter`] drops every post whose trimmed title the
//!    [`SpamDetector`] flags in the batch left by stages 1 and 2
//!
//! Every stage is a pure function of its input batch, so pages can be
//! filtered independently and in parallel.
//!
//! ## Example Usage
//! ```ignore
//! use filter_pipeline::{FilterPipeline, FilterPolicy};
//! use moltfilter_core::FilterOptions;
//!
//! let pipeline = FilterPipeline::for_options(&FilterOptions::default(), &FilterPolicy::default());
//! let kept = pipeline.apply(posts);
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod policy;
pub mod render;
pub mod traits;

pub use filter_pipeline::FilterPipeline;
pub use filters::{IntroPatternFilter, KarmaFilter, SpamDetector, SpamFilter};
pub use policy::{FilterPolicy, DEFAULT_INTRO_PATTERNS, DEFAULT_SPAM_DOMAINS};
pub use render::{render_feed, render_summary, FilteredFeed};
pub use traits::PostFilter;

use moltfilter_core::{FilterOptions, Post};
use std::collections::HashSet;

/// Filter a batch with the built-in pattern lists.
pub fn filter(posts: Vec<Post>, options: &FilterOptions) -> Vec<Post> {
    FilterPipeline::for_options(options, &FilterPolicy::default()).apply(posts)
}

/// Spam titles in a batch, using the built-in domain denylist.
pub fn detect_spam(posts: &[Post]) -> HashSet<String> {
    SpamDetector::new(FilterPolicy::default().spam_domains).detect(posts)
}
