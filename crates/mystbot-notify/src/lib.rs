//! Discord webhook notifications: story production cards and audio uploads.
//!
//! Delivery is best-effort by contract: every public send method returns a
//! `bool` and logs its own failures, so callers never abort a run over a
//! missed notification.

pub mod discord;

pub use discord::{DiscordNotifier, StoryCard};
