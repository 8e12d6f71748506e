//! Defensive extraction of candidate posts from a Reddit listing payload.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::types::CandidatePost;

const REDDIT_BASE_URL: &str = "https://www.reddit.com";

/// Fields we extract from one post's `data` payload. Everything is optional:
/// Reddit listings routinely omit fields and we must not fail the whole page
/// over one odd item.
#[derive(Debug, Deserialize)]
struct RawPost {
    id: Option<String>,
    subreddit: Option<String>,
    title: Option<String>,
    selftext: Option<String>,
    score: Option<i64>,
    permalink: Option<String>,
    created_utc: Option<f64>,
}

/// Extract candidate posts from a listing payload shaped
/// `{"data": {"children": [{"data": {...}}, ...]}}`.
///
/// Items with a missing or malformed `data` payload, or without an `id`, are
/// skipped silently. Payload order is preserved; no filtering or dedup
/// happens here.
#[must_use]
pub fn parse_listing(raw: &Value) -> Vec<CandidatePost> {
    let Some(children) = raw
        .get("data")
        .and_then(|data| data.get("children"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    children.iter().filter_map(candidate_from_child).collect()
}

fn candidate_from_child(child: &Value) -> Option<CandidatePost> {
    let data = child.get("data")?;
    let raw: RawPost = serde_json::from_value(data.clone()).ok()?;
    let reddit_id = raw.id.filter(|id| !id.is_empty())?;

    #[allow(clippy::cast_possible_truncation)]
    let created_at = raw
        .created_utc
        .and_then(|secs| DateTime::from_timestamp(secs as i64, 0));

    Some(CandidatePost {
        reddit_id,
        subreddit: raw.subreddit.unwrap_or_default(),
        title: raw.title.unwrap_or_default(),
        selftext: raw.selftext.unwrap_or_default(),
        score: raw.score.unwrap_or(0),
        url: format!("{REDDIT_BASE_URL}{}", raw.permalink.unwrap_or_default()),
        created_at,
    })
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod parse_test;
