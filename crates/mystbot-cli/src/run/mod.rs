//! The `run` subcommand: one full pipeline pass.
//!
//! Collect candidates from a sample of subreddits, select a capped batch
//! round-robin, then for each selection generate a script, persist it, notify
//! Discord, and synthesize audio. One candidate failing never aborts the
//! batch, and a failed audio step never undoes a saved story.

mod select;

use anyhow::Context;
use rand::seq::SliceRandom;
use sqlx::SqlitePool;

use mystbot_core::AppConfig;
use mystbot_db::NewStory;
use mystbot_notify::{DiscordNotifier, StoryCard};
use mystbot_openai::OpenAiClient;
use mystbot_scraper::{collect_subreddit, CandidatePost, GatewayClient, ScrapeError};

pub(crate) async fn execute(config: &AppConfig) -> anyhow::Result<()> {
    tracing::info!("pipeline run starting");

    let pool = mystbot_db::connect(&config.db_path).await?;
    mystbot_db::run_migrations(&pool).await?;

    let gateway = GatewayClient::new(
        &config.brightdata_endpoint,
        &config.brightdata_api_key,
        &config.brightdata_zone,
        config.request_timeout_secs,
        config.fetch_max_attempts,
        config.fetch_backoff_base_secs,
    )?;
    let openai = OpenAiClient::new(&config.openai_api_key, config.request_timeout_secs)?;
    let notifier = DiscordNotifier::new(&config.discord_webhook_url)?;

    run_pipeline(config, &pool, &gateway, &openai, &notifier).await
}

async fn run_pipeline(
    config: &AppConfig,
    pool: &SqlitePool,
    gateway: &GatewayClient,
    openai: &OpenAiClient,
    notifier: &DiscordNotifier,
) -> anyhow::Result<()> {
    // Sample a rotating subset so repeated runs cover the whole catalog
    // without querying every subreddit each time.
    let mut active_subs = config.subreddits.clone();
    active_subs.shuffle(&mut rand::rng());
    active_subs.truncate(config.subs_per_run);

    tracing::info!(
        subs = ?active_subs,
        catalog = config.subreddits.len(),
        min_score = config.min_score,
        max_score = config.max_score,
        cap = config.max_stories_per_run,
        "run configuration"
    );

    let mut buckets: Vec<(String, Vec<CandidatePost>)> = Vec::new();
    let mut total_candidates = 0usize;
    for subreddit in &active_subs {
        let exists = |reddit_id: String| {
            let pool = pool.clone();
            async move {
                mystbot_db::story_exists(&pool, &reddit_id)
                    .await
                    .map_err(|e| ScrapeError::Store(e.to_string()))
            }
        };

        match collect_subreddit(
            gateway,
            subreddit,
            config.min_score,
            config.max_score,
            exists,
        )
        .await
        {
            Ok(mut posts) => {
                // Shuffle within the bucket; round-robin handles cross-bucket
                // fairness.
                posts.shuffle(&mut rand::rng());
                total_candidates += posts.len();
                buckets.push((subreddit.clone(), posts));
            }
            Err(e) => {
                tracing::error!(subreddit = %subreddit, error = %e, "collection failed, skipping subreddit");
            }
        }
    }

    if total_candidates == 0 {
        tracing::info!("no new candidates found, run complete");
        return Ok(());
    }

    let sources = buckets.len();
    let selected = select::round_robin_select(buckets, config.max_stories_per_run);
    tracing::info!(
        total_candidates,
        selected = selected.len(),
        cap = config.max_stories_per_run,
        sources,
        "candidates selected"
    );

    let mut processed = 0usize;
    let mut errors = 0usize;
    for post in &selected {
        match process_candidate(pool, openai, notifier, config, post).await {
            Ok(()) => processed += 1,
            Err(e) => {
                errors += 1;
                tracing::error!(
                    reddit_id = %post.reddit_id,
                    title = %title_snippet(&post.title),
                    error = format!("{e:#}"),
                    "candidate failed"
                );
            }
        }
    }

    tracing::info!(processed, errors, total_candidates, "run complete");
    Ok(())
}

/// Take one candidate through generation, persistence, and notification.
///
/// Audio synthesis happens last and is caught separately: a story that is
/// generated, saved, and announced counts as processed even if its audio
/// step fails.
async fn process_candidate(
    pool: &SqlitePool,
    openai: &OpenAiClient,
    notifier: &DiscordNotifier,
    config: &AppConfig,
    post: &CandidatePost,
) -> anyhow::Result<()> {
    let (script, keywords) = openai
        .generate_script(&post.title, &post.selftext)
        .await
        .context("script generation failed")?;

    let story = NewStory {
        reddit_id: post.reddit_id.clone(),
        subreddit: post.subreddit.clone(),
        title: post.title.clone(),
        url: post.url.clone(),
        score: post.score,
        selftext: post.selftext.clone(),
        script: script.clone(),
        keywords: keywords.clone(),
        reddit_created: post.created_at,
    };
    let story_id = mystbot_db::insert_story(pool, &story)
        .await
        .context("story insert failed")?;
    tracing::info!(story_id, title = %title_snippet(&post.title), "story saved");

    notifier
        .send_story_card(&StoryCard {
            story_id,
            title: &post.title,
            url: &post.url,
            script: &script,
            keywords: &keywords,
            score: post.score,
            subreddit: &post.subreddit,
        })
        .await;

    if let Err(e) = deliver_audio(pool, openai, notifier, config, story_id, &post.title, &script).await
    {
        tracing::error!(story_id, error = format!("{e:#}"), "audio step failed");
    }

    Ok(())
}

async fn deliver_audio(
    pool: &SqlitePool,
    openai: &OpenAiClient,
    notifier: &DiscordNotifier,
    config: &AppConfig,
    story_id: i64,
    title: &str,
    script: &str,
) -> anyhow::Result<()> {
    let voice = mystbot_openai::pick_voice(None);
    let mp3_path = openai
        .synthesize_speech(&config.output_dir, story_id, script, &voice)
        .await?;
    mystbot_db::update_audio_file(pool, story_id, &mp3_path.to_string_lossy()).await?;
    notifier
        .send_audio_file(story_id, title, &mp3_path, &voice)
        .await;
    Ok(())
}

fn title_snippet(title: &str) -> String {
    title.chars().take(60).collect()
}
