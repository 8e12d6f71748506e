use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The persisted-story existence probe failed. Aborts the current
    /// subreddit's collection; the orchestrator treats it as zero candidates.
    #[error("dedup store error: {0}")]
    Store(String),
}
