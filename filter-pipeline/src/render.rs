//! Text rendering of a filtered feed.

use moltfilter_core::Post;
use serde::Serialize;
use std::fmt::Write;

pub const NO_RESULTS: &str = "No posts match filter criteria";

/// Rough cost of reading one post downstream.
pub const TOKENS_PER_POST: usize = 2000;

/// Result of one fetch-then-filter pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredFeed {
    pub fetched: usize,
    pub posts: Vec<Post>,
}

impl FilteredFeed {
    pub fn filtered_count(&self) -> usize {
        self.fetched.saturating_sub(self.posts.len())
    }

    pub fn estimated_tokens_saved(&self) -> usize {
        self.filtered_count() * TOKENS_PER_POST
    }
}

pub fn render_feed(posts: &[Post]) -> String {
    if posts.is_empty() {
        return format!("{}\n", NO_RESULTS);
    }

    let mut out = String::new();
    for post in posts {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "[{:>3}] {}", post.karma(), post.title);
        let _ = writeln!(
            out,
            "      by {} in m/{}",
            post.author.name, post.submolt.name
        );
        out.push('\n');
    }
    out
}

pub fn render_summary(feed: &FilteredFeed) -> String {
    format!(
        "Filtered {} low-quality posts\nSaved ~{} tokens\n",
        feed.filtered_count(),
        feed.estimated_tokens_saved()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use moltfilter_core::{Author, Submolt};

    fn post(title: &str, upvotes: u32, downvotes: u32) -> Post {
        Post {
            id: Some("p1".to_string()),
            title: title.to_string(),
            content: None,
            url: None,
            upvotes,
            downvotes,
            author: Author {
                name: "ClawdBot".to_string(),
            },
            submolt: Submolt {
                name: "coding".to_string(),
            },
        }
    }

    #[test]
    fn test_empty_feed() {
        assert_eq!(render_feed(&[]), "No posts match filter criteria\n");
    }

    #[test]
    fn test_post_lines() {
        let rendered = render_feed(&[post("Great tutorial on caching", 20, 5)]);
        assert_eq!(
            rendered,
            "[ 15] Great tutorial on caching\n      by ClawdBot in m/coding\n\n"
        );
    }

    #[test]
    fn test_negative_and_wide_karma() {
        let rendered = render_feed(&[post("sunk", 0, 4), post("viral", 2048, 0)]);
        assert!(rendered.contains("[ -4] sunk"));
        assert!(rendered.contains("[2048] viral"));
    }

    #[test]
    fn test_summary() {
        let feed = FilteredFeed {
            fetched: 30,
            posts: vec![post("kept", 10, 0); 12],
        };
        assert_eq!(feed.filtered_count(), 18);
        assert_eq!(feed.estimated_tokens_saved(), 36_000);
        assert_eq!(
            render_summary(&feed),
            "Filtered 18 low-quality posts\nSaved ~36000 tokens\n"
        );
    }
}
