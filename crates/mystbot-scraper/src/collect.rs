//! Per-subreddit collection: drives the gateway client, parser, and filter
//! across the configured feed variants and merges the survivors.

use std::collections::HashSet;
use std::future::Future;

use crate::client::GatewayClient;
use crate::error::ScrapeError;
use crate::filter::filter_posts;
use crate::parse::parse_listing;
use crate::types::CandidatePost;

const REDDIT_BASE_URL: &str = "https://www.reddit.com";
const PAGE_LIMIT: u32 = 50;

/// Sort/time-window combinations fetched per subreddit, in order.
/// top/week catches stories that built up over days; hot catches fresh ones.
const FEEDS: [(&str, Option<&str>); 2] = [("top", Some("week")), ("hot", None)];

/// Collect new, filtered candidate posts from one subreddit.
///
/// Fetches each feed variant through the gateway; a variant that cannot be
/// fetched is skipped without aborting the subreddit. One `seen_ids` set is
/// shared across variants so a post appearing in both `top` and `hot` is
/// kept once. Survivors are concatenated in variant order, each variant
/// keeping its payload order.
///
/// `exists` is the persisted-store probe forwarded to [`filter_posts`].
///
/// # Errors
///
/// Returns [`ScrapeError::Store`] if the existence probe fails; the caller
/// treats the whole subreddit as having produced zero candidates.
pub async fn collect_subreddit<F, Fut>(
    client: &GatewayClient,
    subreddit: &str,
    min_score: i64,
    max_score: i64,
    mut exists: F,
) -> Result<Vec<CandidatePost>, ScrapeError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, ScrapeError>>,
{
    let mut kept = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (sort, window) in FEEDS {
        let target_url = build_feed_url(subreddit, sort, window);

        let Some(raw) = client.fetch(&target_url).await else {
            continue;
        };

        let posts = parse_listing(&raw);
        tracing::info!(
            subreddit,
            sort,
            window = window.unwrap_or("-"),
            retrieved = posts.len(),
            "retrieved listing"
        );

        let surviving =
            filter_posts(posts, &mut seen_ids, min_score, max_score, &mut exists).await?;
        kept.extend(surviving);
    }

    tracing::info!(
        subreddit,
        kept = kept.len(),
        "new candidates after filtering and dedup"
    );
    Ok(kept)
}

/// Build a Reddit listing URL for the given subreddit and sort parameters.
/// `raw_json=1` asks Reddit for unescaped characters in the payload.
fn build_feed_url(subreddit: &str, sort: &str, window: Option<&str>) -> String {
    let mut url = format!("{REDDIT_BASE_URL}/r/{subreddit}/{sort}.json?limit={PAGE_LIMIT}");
    if let Some(t) = window {
        url.push_str("&t=");
        url.push_str(t);
    }
    url.push_str("&raw_json=1");
    url
}
