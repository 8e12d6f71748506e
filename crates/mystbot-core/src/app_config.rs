use std::path::PathBuf;

/// Runtime configuration for one pipeline run.
///
/// Built from environment variables via [`crate::load_app_config`]. The four
/// credential fields are required; everything else has a default.
#[derive(Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub brightdata_api_key: String,
    pub brightdata_zone: String,
    pub brightdata_endpoint: String,
    pub discord_webhook_url: String,
    pub db_path: PathBuf,
    pub output_dir: PathBuf,
    /// Full subreddit catalog; each run samples `subs_per_run` of these.
    pub subreddits: Vec<String>,
    pub subs_per_run: usize,
    /// Inclusive popularity bounds for candidate posts.
    pub min_score: i64,
    pub max_score: i64,
    /// Round-robin selection cap per run.
    pub max_stories_per_run: usize,
    pub fetch_max_attempts: u32,
    pub fetch_backoff_base_secs: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_key", &"[redacted]")
            .field("brightdata_api_key", &"[redacted]")
            .field("brightdata_zone", &self.brightdata_zone)
            .field("brightdata_endpoint", &self.brightdata_endpoint)
            .field("discord_webhook_url", &"[redacted]")
            .field("db_path", &self.db_path)
            .field("output_dir", &self.output_dir)
            .field("subreddits", &self.subreddits)
            .field("subs_per_run", &self.subs_per_run)
            .field("min_score", &self.min_score)
            .field("max_score", &self.max_score)
            .field("max_stories_per_run", &self.max_stories_per_run)
            .field("fetch_max_attempts", &self.fetch_max_attempts)
            .field("fetch_backoff_base_secs", &self.fetch_backoff_base_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}
