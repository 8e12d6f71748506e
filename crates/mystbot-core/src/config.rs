use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Default subreddit catalog: mystery / unexplained / dark-history communities
/// with a steady supply of long-form self-posts.
const DEFAULT_SUBREDDITS: &str = "UnresolvedMysteries,HighStrangeness,TheGrittyPast,\
OddlyTerrifying,LetsNotMeet,TrueCrimeDiscussion,Paranormal,Glitch_in_the_Matrix,\
CreepyWikipedia,Thetruthishere,RBI,Humanoidencounters";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup, no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    // Credentials are required up front: a run must never start scraping and
    // then discover halfway through that it cannot generate or notify.
    let openai_api_key = require("OPENAI_API_KEY")?;
    let brightdata_api_key = require("BRIGHTDATA_API_KEY")?;
    let brightdata_zone = require("BRIGHTDATA_ZONE")?;
    let discord_webhook_url = require("DISCORD_WEBHOOK_URL")?;

    let brightdata_endpoint = or_default(
        "BRIGHTDATA_ENDPOINT",
        "https://api.brightdata.com/request",
    );
    let db_path = PathBuf::from(or_default("MYSTBOT_DB_PATH", "data/stories.db"));
    let output_dir = PathBuf::from(or_default("MYSTBOT_OUTPUT_DIR", "output"));
    let subreddits = split_subreddits(&or_default("SUBREDDITS", DEFAULT_SUBREDDITS));

    let subs_per_run = parse_usize("SUBS_PER_RUN", "4")?;
    let min_score = parse_i64("MIN_SCORE", "30")?;
    let max_score = parse_i64("MAX_SCORE", "200")?;
    let max_stories_per_run = parse_usize("MAX_STORIES_PER_RUN", "5")?;

    let fetch_max_attempts = parse_u32("MYSTBOT_FETCH_MAX_ATTEMPTS", "3")?;
    let fetch_backoff_base_secs = parse_u64("MYSTBOT_FETCH_BACKOFF_BASE_SECS", "2")?;
    let request_timeout_secs = parse_u64("MYSTBOT_REQUEST_TIMEOUT_SECS", "60")?;
    let log_level = or_default("MYSTBOT_LOG_LEVEL", "info");

    Ok(AppConfig {
        openai_api_key,
        brightdata_api_key,
        brightdata_zone,
        brightdata_endpoint,
        discord_webhook_url,
        db_path,
        output_dir,
        subreddits,
        subs_per_run,
        min_score,
        max_score,
        max_stories_per_run,
        fetch_max_attempts,
        fetch_backoff_base_secs,
        request_timeout_secs,
        log_level,
    })
}

/// Split a comma-separated subreddit list, trimming whitespace and dropping
/// empty entries.
fn split_subreddits(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("OPENAI_API_KEY", "sk-test");
        m.insert("BRIGHTDATA_API_KEY", "bd-test");
        m.insert("BRIGHTDATA_ZONE", "web_unlocker1");
        m.insert("DISCORD_WEBHOOK_URL", "https://discord.com/api/webhooks/1/x");
        m
    }

    #[test]
    fn fails_without_openai_api_key() {
        let mut map = full_env();
        map.remove("OPENAI_API_KEY");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "OPENAI_API_KEY"),
            "expected MissingEnvVar(OPENAI_API_KEY), got: {result:?}"
        );
    }

    #[test]
    fn fails_without_brightdata_api_key() {
        let mut map = full_env();
        map.remove("BRIGHTDATA_API_KEY");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "BRIGHTDATA_API_KEY"),
            "expected MissingEnvVar(BRIGHTDATA_API_KEY), got: {result:?}"
        );
    }

    #[test]
    fn fails_without_brightdata_zone() {
        let mut map = full_env();
        map.remove("BRIGHTDATA_ZONE");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "BRIGHTDATA_ZONE"),
            "expected MissingEnvVar(BRIGHTDATA_ZONE), got: {result:?}"
        );
    }

    #[test]
    fn fails_without_discord_webhook_url() {
        let mut map = full_env();
        map.remove("DISCORD_WEBHOOK_URL");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "DISCORD_WEBHOOK_URL"),
            "expected MissingEnvVar(DISCORD_WEBHOOK_URL), got: {result:?}"
        );
    }

    #[test]
    fn succeeds_with_all_required_vars_and_applies_defaults() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("data/stories.db"));
        assert_eq!(cfg.output_dir, PathBuf::from("output"));
        assert_eq!(cfg.brightdata_endpoint, "https://api.brightdata.com/request");
        assert_eq!(cfg.subreddits.len(), 12);
        assert_eq!(cfg.subs_per_run, 4);
        assert_eq!(cfg.min_score, 30);
        assert_eq!(cfg.max_score, 200);
        assert_eq!(cfg.max_stories_per_run, 5);
        assert_eq!(cfg.fetch_max_attempts, 3);
        assert_eq!(cfg.fetch_backoff_base_secs, 2);
        assert_eq!(cfg.request_timeout_secs, 60);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn score_bounds_override() {
        let mut map = full_env();
        map.insert("MIN_SCORE", "10");
        map.insert("MAX_SCORE", "500");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.min_score, 10);
        assert_eq!(cfg.max_score, 500);
    }

    #[test]
    fn invalid_min_score_is_rejected() {
        let mut map = full_env();
        map.insert("MIN_SCORE", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MIN_SCORE"),
            "expected InvalidEnvVar(MIN_SCORE), got: {result:?}"
        );
    }

    #[test]
    fn invalid_subs_per_run_is_rejected() {
        let mut map = full_env();
        map.insert("SUBS_PER_RUN", "-1");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SUBS_PER_RUN"),
            "expected InvalidEnvVar(SUBS_PER_RUN), got: {result:?}"
        );
    }

    #[test]
    fn subreddit_list_override_is_split_and_trimmed() {
        let mut map = full_env();
        map.insert("SUBREDDITS", " UnresolvedMysteries , RBI ,, Paranormal ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.subreddits, vec!["UnresolvedMysteries", "RBI", "Paranormal"]);
    }

    #[test]
    fn split_subreddits_drops_empty_entries() {
        assert!(split_subreddits(",, ,").is_empty());
        assert_eq!(split_subreddits("a,b"), vec!["a", "b"]);
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("sk-test"));
        assert!(!rendered.contains("bd-test"));
        assert!(!rendered.contains("webhooks"));
    }
}
