//! Queries for the `stories` table.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A fully-processed story ready for insertion.
#[derive(Debug, Clone)]
pub struct NewStory {
    pub reddit_id: String,
    pub subreddit: String,
    pub title: String,
    pub url: String,
    pub score: i64,
    pub selftext: String,
    pub script: String,
    pub keywords: Vec<String>,
    /// Original post timestamp on Reddit; `None` when the listing omitted it.
    pub reddit_created: Option<DateTime<Utc>>,
}

/// A row from the `stories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoryRow {
    pub id: i64,
    pub reddit_id: String,
    pub subreddit: String,
    pub title: String,
    pub url: String,
    pub score: i64,
    pub selftext: String,
    pub script: Option<String>,
    /// Keywords stored as a JSON array string; use [`StoryRow::keyword_list`].
    pub keywords: Option<String>,
    pub audio_file: Option<String>,
    pub created_at: String,
    pub reddit_created: Option<String>,
}

impl StoryRow {
    /// Decode the stored keywords JSON. Malformed or absent JSON decodes to
    /// an empty list rather than an error.
    #[must_use]
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Check whether a story with this `reddit_id` is already stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn story_exists(pool: &SqlitePool, reddit_id: &str) -> Result<bool, DbError> {
    let row: Option<i64> = sqlx::query_scalar("SELECT 1 FROM stories WHERE reddit_id = ?")
        .bind(reddit_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// Insert a new story and return its generated id.
///
/// Keywords are serialized to a JSON array string; `reddit_created` is stored
/// as RFC 3339 text when present.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including UNIQUE violations
/// on `reddit_id`.
pub async fn insert_story(pool: &SqlitePool, story: &NewStory) -> Result<i64, DbError> {
    let keywords_json =
        serde_json::to_string(&story.keywords).unwrap_or_else(|_| "[]".to_string());
    let reddit_created = story.reddit_created.map(|ts| ts.to_rfc3339());

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO stories \
             (reddit_id, subreddit, title, url, score, selftext, script, keywords, reddit_created) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(&story.reddit_id)
    .bind(&story.subreddit)
    .bind(&story.title)
    .bind(&story.url)
    .bind(story.score)
    .bind(&story.selftext)
    .bind(&story.script)
    .bind(keywords_json)
    .bind(reddit_created)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Set the `audio_file` path for a story.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_audio_file(
    pool: &SqlitePool,
    story_id: i64,
    path: &str,
) -> Result<(), DbError> {
    sqlx::query("UPDATE stories SET audio_file = ? WHERE id = ?")
        .bind(path)
        .bind(story_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Retrieve a story by its internal id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_story(pool: &SqlitePool, story_id: i64) -> Result<Option<StoryRow>, DbError> {
    let row = sqlx::query_as::<_, StoryRow>(
        "SELECT id, reddit_id, subreddit, title, url, score, selftext, \
                script, keywords, audio_file, created_at, reddit_created \
         FROM stories WHERE id = ?",
    )
    .bind(story_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Return recent stories, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_stories(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<StoryRow>, DbError> {
    let rows = sqlx::query_as::<_, StoryRow>(
        "SELECT id, reddit_id, subreddit, title, url, score, selftext, \
                script, keywords, audio_file, created_at, reddit_created \
         FROM stories ORDER BY id DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
