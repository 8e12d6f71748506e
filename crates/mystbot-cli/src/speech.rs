//! The `tts` subcommand: synthesize audio for a stored story on demand.

use anyhow::Context;

use mystbot_core::AppConfig;
use mystbot_notify::DiscordNotifier;
use mystbot_openai::{is_known_voice, pick_voice, OpenAiClient, VOICES};

pub(crate) async fn execute(config: &AppConfig, story_id: i64, voice: &str) -> anyhow::Result<()> {
    if !is_known_voice(voice) {
        anyhow::bail!(
            "unknown voice '{voice}'; valid choices: random, {}",
            VOICES.join(", ")
        );
    }

    let pool = mystbot_db::connect(&config.db_path).await?;
    mystbot_db::run_migrations(&pool).await?;

    let story = mystbot_db::get_story(&pool, story_id)
        .await?
        .with_context(|| format!("story #{story_id} not found"))?;
    let script = story
        .script
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .with_context(|| format!("story #{story_id} has no script to narrate"))?;

    let openai = OpenAiClient::new(&config.openai_api_key, config.request_timeout_secs)?;
    let chosen = pick_voice(Some(voice));
    let mp3_path = openai
        .synthesize_speech(&config.output_dir, story_id, script, &chosen)
        .await?;
    mystbot_db::update_audio_file(&pool, story_id, &mp3_path.to_string_lossy()).await?;

    let notifier = DiscordNotifier::new(&config.discord_webhook_url)?;
    notifier
        .send_audio_file(story_id, &story.title, &mp3_path, &chosen)
        .await;

    tracing::info!(story_id, path = %mp3_path.display(), "audio ready");
    Ok(())
}
