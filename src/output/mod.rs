use anyhow::Result;

pub mod console;
pub mod html;
pub mod reporter;

pub use reporter::Reporter;

use crate::analysis::Dashboard;

pub const NO_DATA_WARNING: &str = "No data fetched. Check your rate limits or API token.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Html,
    Console,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "html" => OutputFormat::Html,
            "console" | "text" | "terminal" => OutputFormat::Console,
            _ => OutputFormat::Html,
        }
    }
}

pub fn add_file_extension(path: &str, format: &OutputFormat) -> String {
    let extension = match format {
        OutputFormat::Html => ".html",
        OutputFormat::Json => ".json",
        OutputFormat::Console => return path.to_string(),
    };

    if path.ends_with(extension) {
        path.to_string()
    } else {
        format!("{}{}", path, extension)
    }
}

pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

pub fn format_points(score: f64) -> String {
    format!("{} pts", format_score(score))
}

pub trait OutputGenerator {
    async fn generate(&mut self, dashboard: &Dashboard) -> Result<String>;
}
