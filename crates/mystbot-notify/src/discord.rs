//! Discord webhook client.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::{json, Value};

/// Dark purple/blue embed theme.
const EMBED_COLOR: u32 = 0x001A_1A2E;
/// Discord's limit for one embed field value.
const EMBED_FIELD_LIMIT: usize = 1024;
const CARD_TIMEOUT_SECS: u64 = 15;
const UPLOAD_TIMEOUT_SECS: u64 = 60;

/// Everything shown on a story production card.
#[derive(Debug)]
pub struct StoryCard<'a> {
    pub story_id: i64,
    pub title: &'a str,
    pub url: &'a str,
    pub script: &'a str,
    pub keywords: &'a [String],
    pub score: i64,
    pub subreddit: &'a str,
}

/// Webhook client for one Discord channel.
pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
}

impl DiscordNotifier {
    /// Creates a notifier for the given webhook URL.
    ///
    /// # Errors
    ///
    /// Returns the underlying `reqwest` error if the HTTP client cannot be
    /// constructed.
    pub fn new(webhook_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.to_owned(),
        })
    }

    /// Send a rich-embed production card for a freshly generated story.
    ///
    /// Returns `true` on success; failures are logged and yield `false`.
    pub async fn send_story_card(&self, card: &StoryCard<'_>) -> bool {
        let payload = json!({ "embeds": [build_story_embed(card)] });

        let result = self
            .client
            .post(&self.webhook_url)
            .timeout(Duration::from_secs(CARD_TIMEOUT_SECS))
            .json(&payload)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        match result {
            Ok(_) => {
                tracing::info!(story_id = card.story_id, "Discord card sent");
                true
            }
            Err(e) => {
                tracing::error!(
                    story_id = card.story_id,
                    error = %e,
                    "failed to send Discord card"
                );
                false
            }
        }
    }

    /// Upload a story's MP3 to the webhook channel.
    ///
    /// Returns `true` on success; a missing file or HTTP failure is logged
    /// and yields `false`.
    pub async fn send_audio_file(
        &self,
        story_id: i64,
        title: &str,
        mp3_path: &Path,
        voice: &str,
    ) -> bool {
        let bytes = match tokio::fs::read(mp3_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(
                    story_id,
                    path = %mp3_path.display(),
                    error = %e,
                    "MP3 file not readable"
                );
                return false;
            }
        };

        let file_name = mp3_path
            .file_name()
            .map_or_else(|| format!("story_{story_id}.mp3"), |n| n.to_string_lossy().into_owned());
        let title_snippet: String = title.chars().take(150).collect();
        let message =
            format!("Audio generated for story #{story_id}: {title_snippet} (voice: {voice})");

        let part = match Part::bytes(bytes).file_name(file_name).mime_str("audio/mpeg") {
            Ok(part) => part,
            Err(e) => {
                tracing::error!(story_id, error = %e, "failed to build multipart body");
                return false;
            }
        };
        let form = Form::new().text("content", message).part("file", part);

        let result = self
            .client
            .post(&self.webhook_url)
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .multipart(form)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        match result {
            Ok(_) => {
                tracing::info!(story_id, "Discord audio file sent");
                true
            }
            Err(e) => {
                tracing::error!(story_id, error = %e, "failed to send audio file to Discord");
                false
            }
        }
    }
}

/// Build the embed JSON for a story card, truncating the script to Discord's
/// per-field limit.
fn build_story_embed(card: &StoryCard<'_>) -> Value {
    let script_display = if card.script.chars().count() > EMBED_FIELD_LIMIT {
        let truncated: String = card.script.chars().take(EMBED_FIELD_LIMIT - 4).collect();
        format!("{truncated}...")
    } else {
        card.script.to_string()
    };
    let keywords_display = if card.keywords.is_empty() {
        "-".to_string()
    } else {
        card.keywords.join(", ")
    };
    let title_snippet: String = card.title.chars().take(200).collect();

    json!({
        "title": "New story detected",
        "color": EMBED_COLOR,
        "fields": [
            { "name": "Title", "value": format!("[{title_snippet}]({})", card.url), "inline": false },
            { "name": "Script", "value": script_display, "inline": false },
            { "name": "Keywords", "value": keywords_display, "inline": true },
            { "name": "Reddit score", "value": card.score.to_string(), "inline": true },
            { "name": "Story id", "value": format!("`{}`", card.story_id), "inline": true },
            { "name": "Subreddit", "value": format!("r/{}", card.subreddit), "inline": true },
        ],
        "footer": {
            "text": format!("mystbot • {}", Utc::now().format("%Y-%m-%d %H:%M UTC")),
        },
    })
}
