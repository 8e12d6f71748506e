use chrono::{DateTime, Utc};

/// One Reddit post under consideration, as extracted from a listing payload.
///
/// `reddit_id` is non-empty (the parser drops items without one) and is the
/// sole dedup key, both within a run and against the persisted store.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePost {
    pub reddit_id: String,
    pub subreddit: String,
    pub title: String,
    /// Post body; may be empty for link posts.
    pub selftext: String,
    pub score: i64,
    /// Absolute permalink on reddit.com.
    pub url: String,
    /// Post creation time; `None` when the listing omitted `created_utc`.
    pub created_at: Option<DateTime<Utc>>,
}
