//! `mystbot` command-line entry point.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod run;
mod speech;
mod stories;

#[derive(Debug, Parser)]
#[command(name = "mystbot")]
#[command(about = "Reddit mystery-story pipeline: collect, generate, notify", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full pipeline once: collect candidates, generate scripts,
    /// persist and notify
    Run,
    /// Synthesize audio for an already-stored story
    Tts {
        /// Internal id of the story to narrate
        #[arg(long)]
        id: i64,
        /// Voice name, or "random" to pick a narration voice
        #[arg(long, default_value = "random")]
        voice: String,
    },
    /// List stored stories, newest first
    List {
        /// Maximum number of rows to print
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = mystbot_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run => run::execute(&config).await,
        Commands::Tts { id, voice } => speech::execute(&config, id, &voice).await,
        Commands::List { limit } => stories::execute(&config, limit).await,
    }
}
