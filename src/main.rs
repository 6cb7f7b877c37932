use anyhow::Result;
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod analysis;
mod config;
mod github;
mod output;
mod pipeline;

use crate::config::Config;
use github::{Fetcher, HttpTransport};
use output::{OutputFormat, Reporter};
use pipeline::PipelineSettings;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository to rank, as owner/name
    #[arg(short, long)]
    repo: Option<String>,

    /// Trailing window in days
    #[arg(short, long, allow_negative_numbers = true)]
    days: Option<i64>,

    /// Output format (html, json, console)
    #[arg(short, long)]
    output: Option<String>,

    /// Output file (impact_dashboard.html|json)
    #[arg(long, default_value = "impact_dashboard")]
    output_file: String,

    /// Configuration file (defaults to ./impactboard.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// GitHub API token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Re-run every N seconds until interrupted (0 = run once)
    #[arg(long, default_value = "0")]
    refresh: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(repo) = &self.repo {
            config.github.repo = repo.clone();
        }
        if let Some(days) = self.days {
            config.analysis.window_days = days;
        }
        if let Some(output) = &self.output {
            config.output.default_format = output.clone();
        }
        if self.token.is_some() {
            config.github.token = self.token.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    // Load configuration, CLI flags win
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    if !config.output.color_output {
        colored::control::set_override(false);
    }

    println!(
        "{}",
        "ImpactBoard - Contributor Impact Leaderboard"
            .bright_cyan()
            .bold()
    );
    println!("Repository: {}", config.github.repo.bright_white());

    // One fetcher for the whole session so refreshes share the cache
    let transport = HttpTransport::new(
        &config.github.api_url,
        config.token(),
        config.request_timeout(),
    )?;
    let mut fetcher = Fetcher::new(transport, config.cache_ttl());
    let settings = PipelineSettings::from(&config);
    let mut reporter = Reporter::new(&config.output.default_format, &cli.output_file)?;

    loop {
        info!("Building leaderboard...");
        let dashboard = pipeline::run(&mut fetcher, &settings).await;
        debug!(
            "{} contributors scored, {} on the board",
            dashboard.contributors,
            dashboard.entries.len()
        );

        // Generate output
        reporter.generate_report(&dashboard).await?;
        if reporter.format() != OutputFormat::Console {
            println!("Dashboard written to {}", reporter.output_path().bright_white());
        }

        if cli.refresh == 0 {
            break;
        }

        info!("Next refresh in {}s (Ctrl-C to stop)", cli.refresh);
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(cli.refresh)) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping refresh loop");
                break;
            }
        }
    }

    println!("\n{}", "Done!".bright_green().bold());

    Ok(())
}
