//! OpenAI collaborators: narration-script generation (chat completions) and
//! audio synthesis (TTS). Both abort only the current candidate on failure.

pub mod client;
pub mod error;
pub mod generator;
pub mod tts;

pub use client::OpenAiClient;
pub use error::OpenAiError;
pub use tts::{is_known_voice, pick_voice, NARRATION_VOICES, VOICES};
