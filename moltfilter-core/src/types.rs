use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submolt {
    pub name: String,
}

/// A single feed item as returned by the Moltbook API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Option<String>,
    pub title: String,
    pub content: Option<String>,
    pub url: Option<String>,
    pub upvotes: u32,
    pub downvotes: u32,
    pub author: Author,
    pub submolt: Submolt,
}

impl Post {
    /// `upvotes - downvotes`; negative for heavily downvoted posts.
    pub fn karma(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }

    /// Identity key used by duplicate detection.
    pub fn trimmed_title(&self) -> &str {
        self.title.trim()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Hot,
    Top,
    New,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Hot => "hot",
            SortOrder::Top => "top",
            SortOrder::New => "new",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(SortOrder::Hot),
            "top" => Ok(SortOrder::Top),
            "new" => Ok(SortOrder::New),
            other => Err(ConfigError::InvalidValue {
                field: "sort".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// What the feed source is asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub sort: SortOrder,
    pub limit: u32,
    pub submolt: Option<String>,
}

/// Per-invocation options. Built once per query and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub sort: SortOrder,
    pub limit: u32,
    pub min_karma: i64,
    pub submolt: Option<String>,
    pub filter_intros: bool,
}

impl FilterOptions {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const DEFAULT_MIN_KARMA: i64 = 10;

    pub fn feed_query(&self) -> FeedQuery {
        FeedQuery {
            sort: self.sort,
            limit: self.limit,
            submolt: self.submolt.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limit".to_string(),
                value: self.limit.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            sort: SortOrder::Hot,
            limit: Self::DEFAULT_LIMIT,
            min_karma: Self::DEFAULT_MIN_KARMA,
            submolt: None,
            filter_intros: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(upvotes: u32, downvotes: u32) -> Post {
        Post {
            id: None,
            title: "  Padded title \n".to_string(),
            content: None,
            url: None,
            upvotes,
            downvotes,
            author: Author {
                name: "crab".to_string(),
            },
            submolt: Submolt {
                name: "general".to_string(),
            },
        }
    }

    #[test]
    fn test_karma_can_be_negative() {
        assert_eq!(post(12, 2).karma(), 10);
        assert_eq!(post(0, 7).karma(), -7);
        assert_eq!(post(0, u32::MAX).karma(), -i64::from(u32::MAX));
    }

    #[test]
    fn test_trimmed_title() {
        assert_eq!(post(0, 0).trimmed_title(), "Padded title");
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("hot".parse::<SortOrder>().unwrap(), SortOrder::Hot);
        assert_eq!("TOP".parse::<SortOrder>().unwrap(), SortOrder::Top);
        assert_eq!(" new ".parse::<SortOrder>().unwrap(), SortOrder::New);
        assert!(matches!(
            "rising".parse::<SortOrder>(),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(SortOrder::Top.to_string(), "top");
    }

    #[test]
    fn test_filter_options_defaults() {
        let options = FilterOptions::default();
        assert_eq!(options.sort, SortOrder::Hot);
        assert_eq!(options.limit, 20);
        assert_eq!(options.min_karma, 10);
        assert!(options.submolt.is_none());
        assert!(options.filter_intros);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let options = FilterOptions {
            limit: 0,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "limit"
        ));
    }

    #[test]
    fn test_feed_query_carries_source_options() {
        let options = FilterOptions {
            sort: SortOrder::New,
            limit: 5,
            submolt: Some("coding".to_string()),
            ..Default::default()
        };
        let query = options.feed_query();
        assert_eq!(query.sort, SortOrder::New);
        assert_eq!(query.limit, 5);
        assert_eq!(query.submolt.as_deref(), Some("coding"));
    }
}
