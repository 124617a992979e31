//! # Fest Tracker
//!
//! A festival competition tracker: team and candidate rosters, programme
//! registration, result review, and leaderboard standings.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (teams, candidates, programmes,
//!   registrations, results)
//! - **storage**: Filesystem JSONL store
//! - **snapshot**: Concurrent point-in-time load of the full data set
//! - **scoring**: Aggregation and ranking engine
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod models;
pub mod scoring;
pub mod snapshot;
pub mod storage;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "6h", "30m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.parse().ok()?;
    Some(Duration::from_secs(num * multiplier))
}
