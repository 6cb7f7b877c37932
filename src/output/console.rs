use super::*;
use crate::analysis::{Dashboard, ISSUE_WEIGHT, PR_WEIGHT};
use anyhow::Result;
use colored::*;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

/// Plain-terminal rendering of the leaderboard: metrics, a text bar chart
/// and the raw table.
#[derive(Default)]
pub struct ConsoleGenerator;

impl ConsoleGenerator {
    pub fn new() -> Self {
        Self
    }

    fn write_header(&self, out: &mut String, dashboard: &Dashboard) -> std::fmt::Result {
        writeln!(
            out,
            "{}",
            format!("{} Engineering Impact Dashboard", dashboard.repo)
                .bright_cyan()
                .bold()
        )?;
        writeln!(
            out,
            "Impact over the last {} days: merged PRs x{:.1} + closed issues x{:.1}",
            dashboard.window_days, PR_WEIGHT, ISSUE_WEIGHT
        )?;
        writeln!(out)
    }

    fn write_metrics(&self, out: &mut String, dashboard: &Dashboard) -> std::fmt::Result {
        writeln!(
            out,
            "{}",
            format!(
                "Top {} Most Impactful Engineers (Last {} Days)",
                dashboard.entries.len(),
                dashboard.window_days
            )
            .bold()
        )?;
        for entry in &dashboard.entries {
            writeln!(
                out,
                "  {:<28} {}",
                format!("#{} {}", entry.rank, entry.login),
                format_points(entry.score).bright_green().bold()
            )?;
        }
        writeln!(out)
    }

    fn write_chart(&self, out: &mut String, dashboard: &Dashboard) -> std::fmt::Result {
        let max_count = dashboard
            .entries
            .iter()
            .flat_map(|e| [e.pull_requests, e.issues])
            .max()
            .unwrap_or(0)
            .max(1) as usize;
        let width = dashboard
            .entries
            .iter()
            .map(|e| e.login.len())
            .max()
            .unwrap_or(0);

        writeln!(out, "{}", "Impact Breakdown".bold())?;
        for entry in &dashboard.entries {
            let pr_bar = "█".repeat(entry.pull_requests as usize * BAR_WIDTH / max_count);
            let issue_bar = "█".repeat(entry.issues as usize * BAR_WIDTH / max_count);
            writeln!(
                out,
                "  {:<width$}  PRs    {} {}",
                entry.login,
                pr_bar.blue(),
                entry.pull_requests,
                width = width
            )?;
            writeln!(
                out,
                "  {:<width$}  Issues {} {}",
                "",
                issue_bar.yellow(),
                entry.issues,
                width = width
            )?;
        }
        writeln!(out)
    }

    fn write_table(&self, out: &mut String, dashboard: &Dashboard) -> std::fmt::Result {
        let width = dashboard
            .entries
            .iter()
            .map(|e| e.login.len())
            .max()
            .unwrap_or(0)
            .max("Engineer".len());

        writeln!(out, "{}", "Raw Data".bold())?;
        writeln!(
            out,
            "  {:<4} {:<width$} {:>10} {:>13} {:>12}",
            "Rank",
            "Engineer",
            "Merged PRs",
            "Closed Issues",
            "Impact Score",
            width = width
        )?;
        writeln!(out, "  {}", "-".repeat(4 + width + 10 + 13 + 12 + 4))?;
        for entry in &dashboard.entries {
            writeln!(
                out,
                "  {:<4} {:<width$} {:>10} {:>13} {:>12.1}",
                entry.rank,
                entry.login,
                entry.pull_requests,
                entry.issues,
                entry.score,
                width = width
            )?;
        }
        Ok(())
    }
}

impl OutputGenerator for ConsoleGenerator {
    async fn generate(&mut self, dashboard: &Dashboard) -> Result<String> {
        let mut out = String::new();
        self.write_header(&mut out, dashboard)?;

        for alert in &dashboard.alerts {
            writeln!(out, "{}", alert.bright_red())?;
        }

        if !dashboard.has_data() {
            writeln!(out, "{}", NO_DATA_WARNING.yellow().bold())?;
            return Ok(out);
        }

        self.write_metrics(&mut out, dashboard)?;
        self.write_chart(&mut out, dashboard)?;
        self.write_table(&mut out, dashboard)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::dashboard;

    async fn render(dashboard: &Dashboard) -> String {
        colored::control::set_override(false);
        ConsoleGenerator::new().generate(dashboard).await.unwrap()
    }

    #[tokio::test]
    async fn prints_ranked_metrics_and_table() {
        let out = render(&dashboard(&["alice", "alice", "bob"], &["bob"], &[])).await;

        assert!(out.contains("#1 alice"));
        assert!(out.contains("3.0 pts"));
        assert!(out.contains("#2 bob"));
        assert!(out.contains("2.5 pts"));
        assert!(out.contains("Impact Breakdown"));
        assert!(out.contains("Raw Data"));
        assert!(!out.contains(NO_DATA_WARNING));
    }

    #[tokio::test]
    async fn no_data_prints_warning_only() {
        let out = render(&dashboard(&[], &[], &["API Error: 403. You may need a GitHub Token."])).await;

        assert!(out.contains("API Error: 403."));
        assert!(out.contains(NO_DATA_WARNING));
        assert!(!out.contains("Impact Breakdown"));
        assert!(!out.contains("Raw Data"));
        assert!(!out.contains("#1"));
    }
}
