use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod aggregator;
pub mod scoring;

pub use aggregator::Aggregator;
pub use scoring::{rank, score};

/// Merged pull requests count for more than closed issues: shipping is
/// weighted above triage.
pub const PR_WEIGHT: f64 = 1.5;
pub const ISSUE_WEIGHT: f64 = 1.0;

/// Number of places on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

pub const BOT_MARKER: &str = "[bot]";

/// Per-author counts for one item kind.
pub type Tally = HashMap<String, u32>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorTally {
    pub pull_requests: Tally,
    pub issues: Tally,
}

impl AuthorTally {
    pub fn is_empty(&self) -> bool {
        self.pull_requests.is_empty() && self.issues.is_empty()
    }

    pub fn pull_requests_for(&self, login: &str) -> u32 {
        self.pull_requests.get(login).copied().unwrap_or(0)
    }

    pub fn issues_for(&self, login: &str) -> u32 {
        self.issues.get(login).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAuthor {
    pub login: String,
    pub pull_requests: u32,
    pub issues: u32,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub login: String,
    pub pull_requests: u32,
    pub issues: u32,
    pub score: f64,
}

pub fn impact_score(pull_requests: u32, issues: u32) -> f64 {
    PR_WEIGHT * pull_requests as f64 + ISSUE_WEIGHT * issues as f64
}

/// Everything a presenter needs for one refresh of the leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub repo: String,
    pub window_days: i64,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<RankedEntry>,
    pub alerts: Vec<String>,
    pub pull_requests_counted: u32,
    pub issues_counted: u32,
    pub contributors: usize,
}

impl Dashboard {
    pub fn new(
        repo: &str,
        window_days: i64,
        tally: &AuthorTally,
        top_n: usize,
        alerts: Vec<String>,
    ) -> Self {
        let scored = score(tally);
        let contributors = scored.len();

        Self {
            repo: repo.to_string(),
            window_days,
            generated_at: Utc::now(),
            entries: rank(scored, top_n),
            alerts,
            pull_requests_counted: tally.pull_requests.values().sum(),
            issues_counted: tally.issues.values().sum(),
            contributors,
        }
    }

    /// False when neither search produced a single countable item, in which
    /// case only a warning is rendered.
    pub fn has_data(&self) -> bool {
        !self.entries.is_empty()
    }
}
