use crate::source::FeedSource;
use filter_pipeline::{FilterPipeline, FilterPolicy, FilteredFeed};
use moltfilter_core::{CoreError, ErrorExt, FilterOptions};
use tracing::{info, warn};

/// Fetch one page from `source` and run it through the filter pipeline.
///
/// A source failure is returned as `Err`; it is never turned into an empty
/// feed.
pub async fn fetch_filtered<S>(
    source: &S,
    options: &FilterOptions,
    policy: &FilterPolicy,
) -> Result<FilteredFeed, CoreError>
where
    S: FeedSource + ?Sized,
{
    options.validate()?;

    let mut posts = source
        .fetch_posts(&options.feed_query())
        .await
        .map_err(|error| {
            error.log_error();
            error
        })?;

    let limit = options.limit as usize;
    if posts.len() > limit {
        warn!(
            "Source returned {} posts for limit {}, truncating",
            posts.len(),
            limit
        );
        posts.truncate(limit);
    }

    let fetched = posts.len();
    let posts = FilterPipeline::for_options(options, policy).apply(posts);
    info!("Kept {} of {} posts", posts.len(), fetched);

    Ok(FilteredFeed { fetched, posts })
}
