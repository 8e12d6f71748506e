//! Narration-script generation via the chat completions endpoint.

use serde::Deserialize;

use crate::client::OpenAiClient;
use crate::error::OpenAiError;

const MODEL: &str = "gpt-4o";
const TEMPERATURE: f64 = 0.8;
const MAX_TOKENS: u32 = 500;
/// Long posts are truncated before prompting to keep token usage bounded.
const MAX_BODY_CHARS: usize = 3000;
const MIN_KEYWORDS: usize = 3;
/// Soft word-count band; violations log a warning but do not reject.
const WORD_COUNT_RANGE: std::ops::RangeInclusive<usize> = 100..=200;

const SYSTEM_PROMPT: &str = r#"You are a narrator for a dark, atmospheric mystery short video channel.
Given a Reddit post about an unsolved mystery, strange phenomenon, or dark real event, generate:

1. A narration script in English, between 130 and 150 words.
   Structure: attention-grabbing hook, factual development, a "proof" or eerie detail, open-ended conclusion.
   Tone: calm, eerie, and factual, like a whispered documentary. No clickbait, no hype.
   Do NOT mention Reddit, upvotes, or the source. Write as if telling a standalone story.

2. Exactly 5 to 6 visual keywords in English (single words or 2-word phrases).
   These describe the mood, objects, places, and atmosphere for video clip search.
   Examples: "abandoned hospital", "fog", "night forest", "old photograph", "static noise", "empty hallway".

Respond ONLY with valid JSON in this exact format:
{
  "script": "Your narration script here...",
  "keywords": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"]
}"#;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// The JSON document the model is instructed to produce.
#[derive(Debug, Deserialize)]
struct GeneratedStory {
    #[serde(default)]
    script: String,
    #[serde(default)]
    keywords: Vec<String>,
}

impl OpenAiClient {
    /// Generate a narration script and visual keywords from a Reddit post.
    ///
    /// # Errors
    ///
    /// - [`OpenAiError::UnexpectedStatus`] / [`OpenAiError::Http`] on API or
    ///   network failure.
    /// - [`OpenAiError::EmptyCompletion`] if the model returns no content.
    /// - [`OpenAiError::EmptyScript`] / [`OpenAiError::TooFewKeywords`] if
    ///   the output violates the contract.
    pub async fn generate_script(
        &self,
        title: &str,
        selftext: &str,
    ) -> Result<(String, Vec<String>), OpenAiError> {
        let truncated: String = selftext.chars().take(MAX_BODY_CHARS).collect();
        let user_message = format!("Title: {title}\n\nContent:\n{truncated}");

        tracing::info!(title = title_snippet(title), "generating script");

        let endpoint = self.endpoint("v1/chat/completions");
        let body = serde_json::json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_message },
            ],
            "response_format": { "type": "json_object" },
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OpenAiError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint,
            });
        }

        let text = response.text().await?;
        let chat: ChatResponse =
            serde_json::from_str(&text).map_err(|source| OpenAiError::Deserialize {
                context: "chat completions envelope".to_string(),
                source,
            })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(OpenAiError::EmptyCompletion)?;

        let (script, keywords) = parse_generated(&content)?;

        let word_count = script.split_whitespace().count();
        if !WORD_COUNT_RANGE.contains(&word_count) {
            tracing::warn!(
                word_count,
                title = title_snippet(title),
                "script word count outside target range"
            );
        }

        tracing::info!(
            word_count,
            keywords = keywords.len(),
            "script generated"
        );
        Ok((script, keywords))
    }
}

/// Parse and validate the model's JSON output.
fn parse_generated(content: &str) -> Result<(String, Vec<String>), OpenAiError> {
    let story: GeneratedStory =
        serde_json::from_str(content).map_err(|source| OpenAiError::Deserialize {
            context: "generated story payload".to_string(),
            source,
        })?;

    let script = story.script.trim().to_string();
    if script.is_empty() {
        return Err(OpenAiError::EmptyScript);
    }

    if story.keywords.len() < MIN_KEYWORDS {
        return Err(OpenAiError::TooFewKeywords {
            count: story.keywords.len(),
        });
    }

    Ok((script, story.keywords))
}

fn title_snippet(title: &str) -> String {
    title.chars().take(80).collect()
}
