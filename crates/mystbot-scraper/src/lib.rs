//! Reddit acquisition pipeline: gateway fetch client with retry/backoff,
//! listing parsing, filtering/dedup, and per-subreddit collection.
//!
//! All outbound retrieval goes through the Bright Data Web Unlocker gateway;
//! the crate never talks to Reddit directly.

pub mod client;
pub mod collect;
pub mod error;
pub mod filter;
pub mod parse;
pub mod types;

pub use client::GatewayClient;
pub use collect::collect_subreddit;
pub use error::ScrapeError;
pub use filter::filter_posts;
pub use parse::parse_listing;
pub use types::CandidatePost;
