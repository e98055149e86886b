//! Duplicate and bare-link spam detection.

use crate::traits::PostFilter;
use moltfilter_core::Post;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A trimmed title seen this many times in one batch is spam.
pub const REPEAT_THRESHOLD: usize = 3;

/// Titles shorter than this (in chars, after trimming) are checked against
/// the domain denylist.
pub const SHORT_TITLE_CHARS: usize = 50;

/// Finds spam titles within a single batch of posts.
///
/// ## Algorithm
/// 1. Count every trimmed title (exact, case-sensitive match)
/// 2. Flag a title if it occurs `REPEAT_THRESHOLD` or more times
/// 3. Flag a title if it is short and contains a denylisted domain
///    (case-insensitive)
///
/// The repetition key is not case-folded while the domain check is. Both
/// behaviours are kept as-is.
#[derive(Debug, Clone)]
pub struct SpamDetector {
    spam_domains: Vec<String>,
}

impl SpamDetector {
    /// `spam_domains` must already be lower-cased (see `FilterPolicy`).
    pub fn new(spam_domains: Vec<String>) -> Self {
        Self { spam_domains }
    }

    /// Returns the distinct trimmed titles flagged as spam.
    pub fn detect(&self, posts: &[Post]) -> HashSet<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for post in posts {
            *counts.entry(post.trimmed_title()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .filter(|(title, count)| *count >= REPEAT_THRESHOLD || self.is_link_spam(title))
            .map(|(title, _)| title.to_string())
            .collect()
    }

    /// Short title pointing at a denylisted domain.
    pub fn is_link_spam(&self, title: &str) -> bool {
        let trimmed = title.trim();
        if trimmed.chars().count() >= SHORT_TITLE_CHARS {
            return false;
        }
        let lower = trimmed.to_lowercase();
        self.spam_domains
            .iter()
            .any(|domain| lower.contains(domain.as_str()))
    }
}

/// Removes every post whose trimmed title the detector flags in this batch.
#[derive(Debug, Clone)]
pub struct SpamFilter {
    detector: SpamDetector,
}

impl SpamFilter {
    pub fn new(detector: SpamDetector) -> Self {
        Self { detector }
    }
}

impl PostFilter for SpamFilter {
    fn name(&self) -> &str {
        "SpamFilter"
    }

    fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        let spam = self.detector.detect(&posts);
        if spam.is_empty() {
            return posts;
        }
        debug!("Detected {} spam titles", spam.len());

        posts
            .into_iter()
            .filter(|post| !spam.contains(post.trimmed_title()))
            .collect()
    }
}
