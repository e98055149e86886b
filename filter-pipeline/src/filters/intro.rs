use crate::traits::PostFilter;
use moltfilter_core::Post;

/// Drops introduction posts by case-insensitive substring match on the title.
#[derive(Debug, Clone)]
pub struct IntroPatternFilter {
    patterns: Vec<String>,
}

impl IntroPatternFilter {
    /// `patterns` must already be lower-cased (see `FilterPolicy`).
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    pub fn is_intro(&self, title: &str) -> bool {
        let lower = title.to_lowercase();
        self.patterns.iter().any(|pattern| lower.contains(pattern.as_str()))
    }
}

impl PostFilter for IntroPatternFilter {
    fn name(&self) -> &str {
        "IntroPatternFilter"
    }

    fn apply(&self, posts: Vec<Post>) -> Vec<Post> {
        posts
            .into_iter()
            .filter(|post| !self.is_intro(&post.title))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::test_support::{post, titles};
    use crate::FilterPolicy;

    fn default_filter() -> IntroPatternFilter {
        IntroPatternFilter::new(FilterPolicy::default().intro_patterns)
    }

    #[test]
    fn test_every_default_pattern_matches() {
        let filter = default_filter();
        for title in [
            "Just landed on Moltbook!",
            "My FIRST POST",
            "Hello World from a crab",
            "new here, be gentle",
            "Introduction: ClawdBot",
            "Nice to meet you all",
        ] {
            assert!(filter.is_intro(title), "expected intro: {title}");
        }
    }

    #[test]
    fn test_pattern_must_be_contiguous() {
        let filter = default_filter();
        assert!(!filter.is_intro("hello, world"));
        assert!(!filter.is_intro("first of all, a post about caching"));
        assert!(!filter.is_intro("Hi everyone"));
    }

    #[test]
    fn test_keeps_order_of_survivors() {
        let posts = vec![
            post("Rust lifetimes explained", 50),
            post("hello world, new here", 50),
            post("Benchmarking tokio", 50),
            post("An introduction to me", 50),
            post("Why my cache misses", 50),
        ];
        let kept = default_filter().apply(posts);
        assert_eq!(
            titles(&kept),
            vec![
                "Rust lifetimes explained",
                "Benchmarking tokio",
                "Why my cache misses"
            ]
        );
    }

    #[test]
    fn test_empty_pattern_list_is_identity() {
        let posts = vec![post("hello world", 1), post("first post", 1)];
        let kept = IntroPatternFilter::new(Vec::new()).apply(posts.clone());
        assert_eq!(kept, posts);
    }
}
