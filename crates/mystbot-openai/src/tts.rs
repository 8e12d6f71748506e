//! Audio synthesis via the TTS endpoint.

use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;

use crate::client::OpenAiClient;
use crate::error::OpenAiError;

const TTS_MODEL: &str = "tts-1";

/// All voices the API accepts.
pub const VOICES: [&str; 6] = ["onyx", "echo", "fable", "nova", "shimmer", "alloy"];

/// The subset that suits whispered mystery narration; used for random picks.
pub const NARRATION_VOICES: [&str; 3] = ["onyx", "echo", "fable"];

/// Resolve a requested voice name. `None` or `"random"` picks uniformly from
/// [`NARRATION_VOICES`]; anything else is passed through unchanged.
#[must_use]
pub fn pick_voice(requested: Option<&str>) -> String {
    match requested {
        Some(voice) if voice != "random" => voice.to_string(),
        _ => {
            let voice = NARRATION_VOICES
                .choose(&mut rand::rng())
                .copied()
                .unwrap_or("onyx");
            tracing::info!(voice, "randomly selected narration voice");
            voice.to_string()
        }
    }
}

/// Whether `name` is a voice the API accepts (or the `random` sentinel).
#[must_use]
pub fn is_known_voice(name: &str) -> bool {
    name == "random" || VOICES.contains(&name)
}

impl OpenAiClient {
    /// Synthesize `script` to an MP3 at `{output_dir}/story_{story_id}.mp3`.
    ///
    /// Creates `output_dir` when missing and returns the written path.
    ///
    /// # Errors
    ///
    /// - [`OpenAiError::UnexpectedStatus`] / [`OpenAiError::Http`] on API or
    ///   network failure.
    /// - [`OpenAiError::AudioWrite`] if the directory or file cannot be
    ///   written.
    pub async fn synthesize_speech(
        &self,
        output_dir: &Path,
        story_id: i64,
        script: &str,
        voice: &str,
    ) -> Result<PathBuf, OpenAiError> {
        tracing::info!(story_id, voice, "synthesizing audio");

        let endpoint = self.endpoint("v1/audio/speech");
        let body = serde_json::json!({
            "model": TTS_MODEL,
            "voice": voice,
            "input": script,
            "response_format": "mp3",
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

        let audio = response.bytes().await?;

        let mp3_path = output_dir.join(format!("story_{story_id}.mp3"));
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| OpenAiError::AudioWrite {
                path: output_dir.display().to_string(),
                source,
            })?;
        tokio::fs::write(&mp3_path, &audio)
            .await
            .map_err(|source| OpenAiError::AudioWrite {
                path: mp3_path.display().to_string(),
                source,
            })?;

        tracing::info!(story_id, path = %mp3_path.display(), "audio saved");
        Ok(mp3_path)
    }
}
