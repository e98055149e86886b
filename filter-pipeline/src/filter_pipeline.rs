//! The FilterPipeline chains filter stages in order.

use crate::filters::{IntroPatternFilter, KarmaFilter, SpamDetector, SpamFilter};
use crate::policy::FilterPolicy;
use crate::traits::PostFilter;
use moltfilter_core::{FilterOptions, Post};
use tracing::debug;

/// Runs each stage over the output of the previous one.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(KarmaFilter::new(10))
///     .add_filter(SpamFilter::new(SpamDetector::new(domains)));
///
/// let kept = pipeline.apply(posts);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn PostFilter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Standard stage order: karma, then intros (if enabled), then spam.
    pub fn for_options(options: &FilterOptions, policy: &FilterPolicy) -> Self {
        let mut pipeline = Self::new().add_filter(KarmaFilter::new(options.min_karma));
        if options.filter_intros {
            pipeline =
                pipeline.add_filter(IntroPatternFilter::new(policy.intro_patterns.clone()));
        }
        pipeline.add_filter(SpamFilter::new(SpamDetector::new(
            policy.spam_domains.clone(),
        )))
    }

    pub fn add_filter(mut self, filter: impl PostFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    pub fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        let mut current = posts;
        for filter in &self.filters {
            let before = current.len();
            current = filter.apply(current);
            debug!(
                "Filter applied: {} (input count: {}, output count: {})",
                filter.name(),
                before,
                current.len()
            );
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
