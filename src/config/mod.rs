use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::analysis::{BOT_MARKER, LEADERBOARD_SIZE};

pub const DEFAULT_CONFIG_FILE: &str = "impactboard.toml";
pub const ENV_PREFIX: &str = "IMPACTBOARD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub analysis: AnalysisConfig,
    pub cache: CacheConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub repo: String,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub window_days: i64,
    pub top_n: usize,
    pub bot_marker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_format: String,
    pub color_output: bool,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            repo: "PostHog/posthog".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            top_n: LEADERBOARD_SIZE,
            bot_marker: BOT_MARKER.to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 3600 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: "html".to_string(),
            color_output: true,
        }
    }
}

impl Config {
    /// Layers, lowest first: built-in defaults, the TOML file (optional unless
    /// named explicitly), then `IMPACTBOARD_<SECTION>__<KEY>` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        builder = match path {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                builder.add_source(::config::File::from(path).required(true))
            }
            None => builder.add_source(::config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Invalid configuration")?;

        debug!(
            "Configuration: repo={} window={}d top_n={} cache_ttl={}s",
            config.github.repo,
            config.analysis.window_days,
            config.analysis.top_n,
            config.cache.ttl_secs
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_repo(&self.github.repo)?;
        if self.analysis.top_n == 0 {
            anyhow::bail!("analysis.top_n must be at least 1");
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.github.timeout_secs)
    }

    pub fn token(&self) -> Option<&str> {
        self.github.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

pub fn validate_repo(repo: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?/[A-Za-z0-9._-]+$")?;
    if re.is_match(repo) {
        Ok(())
    } else {
        anyhow::bail!("Repository must look like `owner/name`, got `{}`", repo)
    }
}
