use super::*;
use crate::analysis::{Dashboard, ISSUE_WEIGHT, PR_WEIGHT};
use anyhow::Result;
use rust_embed::RustEmbed;
use serde_json::{json, Value};
use std::collections::HashMap;
use tera::{Context, Tera};

#[derive(RustEmbed)]
#[folder = "src/output/templates/"]
#[include = "*.html"]
struct Templates;

#[derive(RustEmbed)]
#[folder = "src/output/assets/"]
#[include = "*.css"]
struct Assets;

pub struct HtmlGenerator {
    tera: Tera,
}

impl HtmlGenerator {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Load templates from embedded resources
        for file in Templates::iter() {
            let template_name = file.as_ref();
            let template_content = Templates::get(template_name)
                .ok_or_else(|| anyhow::anyhow!("Template {} not found", template_name))?;
            let template_str = std::str::from_utf8(&template_content.data)
                .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in template {}: {}", template_name, e))?;

            tera.add_raw_template(template_name, template_str)
                .map_err(|e| anyhow::anyhow!("Failed to add template {}: {}", template_name, e))?;
        }

        tera.register_filter("points", Self::points_filter);
        tera.register_filter("score", Self::score_filter);

        Ok(Self { tera })
    }

    fn load_asset(&self, filename: &str) -> Result<String> {
        let asset = Assets::get(filename)
            .ok_or_else(|| anyhow::anyhow!("Asset {} not found", filename))?;
        let content = std::str::from_utf8(&asset.data)
            .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in asset {}: {}", filename, e))?;
        Ok(content.to_string())
    }

    fn points_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
        let score = value
            .as_f64()
            .ok_or_else(|| tera::Error::msg("points filter expects a number"))?;
        Ok(Value::String(format_points(score)))
    }

    fn score_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
        let score = value
            .as_f64()
            .ok_or_else(|| tera::Error::msg("score filter expects a number"))?;
        Ok(Value::String(format_score(score)))
    }

    fn prepare_template_context(&self, dashboard: &Dashboard) -> Result<Context> {
        let mut context = Context::new();

        context.insert("css_content", &self.load_asset("styles.css")?);
        context.insert("repo", &dashboard.repo);
        context.insert("owner", &repo_owner(&dashboard.repo));
        context.insert("window_days", &dashboard.window_days);
        context.insert(
            "generated_date",
            &dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        context.insert("alerts", &dashboard.alerts);
        context.insert("has_data", &dashboard.has_data());
        context.insert("no_data_warning", NO_DATA_WARNING);
        context.insert("pr_weight", &PR_WEIGHT);
        context.insert("issue_weight", &ISSUE_WEIGHT);
        context.insert("entries", &dashboard.entries);
        context.insert("chart_bars", &self.prepare_chart_data(dashboard));
        context.insert("pull_requests_counted", &dashboard.pull_requests_counted);
        context.insert("issues_counted", &dashboard.issues_counted);
        context.insert("contributors", &dashboard.contributors);

        Ok(context)
    }

    /// Bar heights as a percentage of the largest single count on the board,
    /// so both series share one axis.
    fn prepare_chart_data(&self, dashboard: &Dashboard) -> Vec<Value> {
        let max_count = dashboard
            .entries
            .iter()
            .flat_map(|e| [e.pull_requests, e.issues])
            .max()
            .unwrap_or(0)
            .max(1) as f64;

        dashboard
            .entries
            .iter()
            .map(|entry| {
                json!({
                    "login": entry.login,
                    "pull_requests": entry.pull_requests,
                    "issues": entry.issues,
                    "pr_height": (entry.pull_requests as f64 / max_count * 100.0).round(),
                    "issue_height": (entry.issues as f64 / max_count * 100.0).round(),
                })
            })
            .collect()
    }
}

fn repo_owner(repo: &str) -> &str {
    repo.split('/').next().unwrap_or(repo)
}

impl OutputGenerator for HtmlGenerator {
    async fn generate(&mut self, dashboard: &Dashboard) -> Result<String> {
        let context = self.prepare_template_context(dashboard)?;
        let html = self.tera.render("dashboard.html", &context)?;
        Ok(html)
    }
}
