use crate::analysis::{Aggregator, Dashboard};
use crate::config::Config;
use crate::github::{Fetcher, ItemKind, SearchQuery, SearchTransport};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::{info, warn};

/// The parts of the configuration one leaderboard run depends on.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub repo: String,
    pub window_days: i64,
    pub top_n: usize,
    pub bot_marker: String,
}

impl From<&Config> for PipelineSettings {
    fn from(config: &Config) -> Self {
        Self {
            repo: config.github.repo.clone(),
            window_days: config.analysis.window_days,
            top_n: config.analysis.top_n,
            bot_marker: config.analysis.bot_marker.clone(),
        }
    }
}

/// Fetch both item kinds one after the other, then tally, score and rank.
/// A failed search only costs its own half of the data.
pub async fn run<T: SearchTransport>(
    fetcher: &mut Fetcher<T>,
    settings: &PipelineSettings,
) -> Dashboard {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message(format!("Fetching data from {} repository...", settings.repo));

    let mut alerts = Vec::new();
    let mut results = Vec::with_capacity(2);

    // Merged PRs first, then closed issues
    for kind in [ItemKind::MergedPullRequest, ItemKind::ClosedIssue] {
        let query = SearchQuery::new(&settings.repo, kind, settings.window_days);
        let outcome = fetcher.fetch(&query).await;

        if let Some(error) = outcome.error {
            pb.suspend(|| eprintln!("{}", error.bright_red().bold()));
            alerts.push(error);
        }

        info!(
            "{} {} in the last {} days{}",
            outcome.items.len(),
            kind.label(),
            settings.window_days,
            if outcome.from_cache { " (cached)" } else { "" }
        );
        results.push(outcome.items);
    }

    pb.finish_and_clear();

    // Tally, score and rank
    let issues = results.pop().unwrap_or_default();
    let pull_requests = results.pop().unwrap_or_default();

    let tally = Aggregator::new(&settings.bot_marker).aggregate(&pull_requests, &issues);
    if tally.is_empty() {
        warn!("Neither search returned a countable item");
    }
    Dashboard::new(
        &settings.repo,
        settings.window_days,
        &tally,
        settings.top_n,
        alerts,
    )
}
