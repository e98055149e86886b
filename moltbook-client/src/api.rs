use crate::retry::{RetryConfig, RetryExecutor};
use crate::source::FeedSource;
use moltfilter_core::{
    AppConfig, Author, ConfigError, CoreError, FeedQuery, MoltbookApiError, Post, Submolt,
};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

const POSTS_ENDPOINT: &str = "posts";
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub posts: Vec<MoltbookPostData>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoltbookPostData {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub upvotes: u32,
    pub downvotes: u32,
    #[serde(default)]
    pub comment_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub author: NamedRef,
    pub submolt: NamedRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl From<MoltbookPostData> for Post {
    fn from(post_data: MoltbookPostData) -> Self {
        Self {
            id: post_data.id,
            title: post_data.title,
            content: post_data.content.filter(|c| !c.is_empty()),
            url: post_data.url,
            upvotes: post_data.upvotes,
            downvotes: post_data.downvotes,
            author: Author {
                name: post_data.author.name,
            },
            submolt: Submolt {
                name: post_data.submolt.name,
            },
        }
    }
}

/// Parse a `/posts` response body.
///
/// A missing `posts` key is an empty page. A record missing a required field
/// fails the whole page rather than guessing defaults.
pub fn parse_posts_response(body: &str) -> Result<Vec<Post>, CoreError> {
    let response: PostsResponse = serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse posts response: {}", e);
        CoreError::MoltbookApi(MoltbookApiError::InvalidResponse {
            details: e.to_string(),
        })
    })?;

    if response.success == Some(false) {
        return Err(CoreError::MoltbookApi(MoltbookApiError::RequestRejected {
            status_code: StatusCode::OK.as_u16(),
            message: response
                .error
                .unwrap_or_else(|| "request was not successful".to_string()),
        }));
    }

    Ok(response.posts.into_iter().map(Post::from).collect())
}

/// Map a non-success response to an API error.
pub fn status_error(
    status: StatusCode,
    retry_after: Option<&str>,
    body: &str,
    query: &FeedQuery,
) -> MoltbookApiError {
    match status {
        StatusCode::UNAUTHORIZED => MoltbookApiError::InvalidApiKey,
        StatusCode::FORBIDDEN => MoltbookApiError::Forbidden {
            resource: format!("/{}", POSTS_ENDPOINT),
        },
        StatusCode::NOT_FOUND if query.submolt.is_some() => MoltbookApiError::SubmoltNotFound {
            submolt: query.submolt.clone().unwrap_or_default(),
        },
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = retry_after
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            warn!("Rate limited, retry after {} seconds", retry_after);
            MoltbookApiError::RateLimitExceeded { retry_after }
        }
        s if s.is_server_error() => MoltbookApiError::ServerError {
            status_code: s.as_u16(),
        },
        s => MoltbookApiError::RequestRejected {
            status_code: s.as_u16(),
            message: error_message(s, body),
        },
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        message: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.error.or(parsed.message) {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Moltbook REST client authenticated with an agent API key.
pub struct MoltbookClient {
    http_client: Client,
    base_url: Url,
    api_key: String,
    retry: RetryExecutor,
}

impl fmt::Debug for MoltbookClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoltbookClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("retry", self.retry.config())
            .finish()
    }
}

impl MoltbookClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, CoreError> {
        let base_url = Url::parse(base_url).map_err(|_| ConfigError::InvalidValue {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".to_string(),
                value: base_url.to_string(),
            }
            .into());
        }

        let http_client = Client::builder()
            .user_agent(concat!("moltfilter/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            api_key: api_key.into(),
            retry: RetryExecutor::new(RetryConfig::default()),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        let api_key = config.require_api_key()?;
        let client = Self::new(
            api_key,
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
        )?;
        Ok(client.with_retry_config(RetryConfig::moltbook(config.api.max_attempts)))
    }

    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry = RetryExecutor::new(config);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn posts_url(&self, query: &FeedQuery) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(POSTS_ENDPOINT);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("sort", query.sort.as_str())
                .append_pair("limit", &query.limit.to_string());
            if let Some(submolt) = &query.submolt {
                pairs.append_pair("submolt", submolt);
            }
        }
        url
    }

    /// Fetch one page of posts, retrying transient failures.
    pub async fn get_posts(&self, query: &FeedQuery) -> Result<Vec<Post>, CoreError> {
        self.retry
            .execute("get_posts", || self.request_posts(query))
            .await
    }

    async fn request_posts(&self, query: &FeedQuery) -> Result<Vec<Post>, CoreError> {
        let url = self.posts_url(query);
        info!("Making Moltbook API request: GET {}", url.path());

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                error!("Network error for /{}: {}", POSTS_ENDPOINT, e);
                if e.is_timeout() {
                    CoreError::MoltbookApi(MoltbookApiError::RequestTimeout)
                } else {
                    CoreError::Network(e)
                }
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        if !status.is_success() {
            error!("Request failed with status: {} for /{}", status, POSTS_ENDPOINT);
            return Err(status_error(status, retry_after.as_deref(), &body, query).into());
        }

        let posts = parse_posts_response(&body)?;
        debug!("Request successful: {} ({} bytes)", status, body.len());
        info!("Retrieved {} posts (sort={})", posts.len(), query.sort);
        Ok(posts)
    }
}

impl FeedSource for MoltbookClient {
    async fn fetch_posts(&self, query: &FeedQuery) -> Result<Vec<Post>, CoreError> {
        self.get_posts(query).await
    }
}
