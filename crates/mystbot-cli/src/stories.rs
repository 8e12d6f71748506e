//! The `list` subcommand: print stored stories.

use mystbot_core::AppConfig;

pub(crate) async fn execute(config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let pool = mystbot_db::connect(&config.db_path).await?;
    mystbot_db::run_migrations(&pool).await?;

    let rows = mystbot_db::list_stories(&pool, limit, 0).await?;
    if rows.is_empty() {
        println!("no stories stored yet");
        return Ok(());
    }

    for row in rows {
        let audio = row.audio_file.as_deref().unwrap_or("-");
        let keywords = row.keyword_list().join(", ");
        println!(
            "#{:<4} [r/{}] {} (score {}, audio {}, keywords: {})",
            row.id, row.subreddit, row.title, row.score, audio, keywords
        );
    }
    Ok(())
}
