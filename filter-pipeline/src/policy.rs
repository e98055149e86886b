//! Pattern lists used by the intro and spam stages.

use moltfilter_core::FilterSettings;

pub const DEFAULT_INTRO_PATTERNS: &[&str] = &[
    "just landed",
    "first post",
    "hello world",
    "new here",
    "introduction",
    "nice to meet",
];

pub const DEFAULT_SPAM_DOMAINS: &[&str] = &["pornhub.com", "xvideos.com", "onlyfans.com"];

/// Substring lists for intro and domain matching.
///
/// Entries are lower-cased and trimmed on construction; blank entries are
/// dropped so an empty string can never match every title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPolicy {
    pub intro_patterns: Vec<String>,
    pub spam_domains: Vec<String>,
}

impl FilterPolicy {
    pub fn new<I, D>(intro_patterns: I, spam_domains: D) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            intro_patterns: normalize(intro_patterns),
            spam_domains: normalize(spam_domains),
        }
    }

    pub fn with_intro_patterns<I>(mut self, patterns: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.intro_patterns = normalize(patterns);
        self
    }

    pub fn with_spam_domains<D>(mut self, domains: D) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        self.spam_domains = normalize(domains);
        self
    }

    pub fn from_settings(settings: &FilterSettings) -> Self {
        let mut policy = Self::default();
        if let Some(patterns) = &settings.intro_patterns {
            policy = policy.with_intro_patterns(patterns);
        }
        if let Some(domains) = &settings.spam_domains {
            policy = policy.with_spam_domains(domains);
        }
        policy
    }
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INTRO_PATTERNS, DEFAULT_SPAM_DOMAINS)
    }
}

fn normalize<I>(entries: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    entries
        .into_iter()
        .map(|entry| entry.as_ref().trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = FilterPolicy::default();
        assert_eq!(policy.intro_patterns.len(), 6);
        assert!(policy.intro_patterns.contains(&"nice to meet".to_string()));
        assert_eq!(
            policy.spam_domains,
            vec!["pornhub.com", "xvideos.com", "onlyfans.com"]
        );
    }

    #[test]
    fn test_entries_are_normalized() {
        let policy = FilterPolicy::new(["  Hi Everyone ", ""], ["SPAM.Example", "   "]);
        assert_eq!(policy.intro_patterns, vec!["hi everyone"]);
        assert_eq!(policy.spam_domains, vec!["spam.example"]);
    }

    #[test]
    fn test_from_settings_overrides_only_given_lists() {
        let settings = FilterSettings {
            spam_domains: Some(vec!["bad.example".to_string()]),
            ..Default::default()
        };
        let policy = FilterPolicy::from_settings(&settings);
        assert_eq!(policy.intro_patterns, FilterPolicy::default().intro_patterns);
        assert_eq!(policy.spam_domains, vec!["bad.example"]);
    }
}
