//! Candidate filtering: score bounds, textual-content floor, and dedup.

use std::collections::HashSet;
use std::future::Future;

use crate::error::ScrapeError;
use crate::types::CandidatePost;

/// Minimum trimmed body length for a post to be usable by script generation.
const MIN_BODY_CHARS: usize = 100;

/// Apply the keep/drop rules to `posts`, in payload order.
///
/// Rules are evaluated per post in this order, short-circuiting on the first
/// failure (later rules run no side effects for a dropped post):
///
/// 1. already seen this run (`seen_ids`), i.e. a cross-variant duplicate;
/// 2. `score` outside `[min_score, max_score]` inclusive;
/// 3. trimmed `selftext` shorter than 100 characters;
/// 4. `exists` reports the id already persisted (cross-run dedup).
///
/// Ids of kept posts are inserted into `seen_ids`; dropped posts leave it
/// untouched. `exists` is the persisted-store probe, injected as a closure so
/// this crate stays independent of the storage layer.
///
/// # Errors
///
/// Returns [`ScrapeError::Store`] if the existence probe fails; the caller
/// abandons the subreddit rather than risk re-processing stored posts.
pub async fn filter_posts<F, Fut>(
    posts: Vec<CandidatePost>,
    seen_ids: &mut HashSet<String>,
    min_score: i64,
    max_score: i64,
    mut exists: F,
) -> Result<Vec<CandidatePost>, ScrapeError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, ScrapeError>>,
{
    let mut kept = Vec::new();

    for post in posts {
        if seen_ids.contains(&post.reddit_id) {
            continue;
        }

        if post.score < min_score || post.score > max_score {
            continue;
        }

        if post.selftext.trim().chars().count() < MIN_BODY_CHARS {
            continue;
        }

        if exists(post.reddit_id.clone()).await? {
            continue;
        }

        seen_ids.insert(post.reddit_id.clone());
        kept.push(post);
    }

    Ok(kept)
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;
