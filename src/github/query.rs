use super::ItemKind;
use chrono::{Duration, NaiveDate, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub repo: String,
    pub kind: ItemKind,
    pub window_days: i64,
}

impl SearchQuery {
    pub fn new(repo: &str, kind: ItemKind, window_days: i64) -> Self {
        Self {
            repo: repo.to_string(),
            kind,
            window_days,
        }
    }

    /// First day that still counts. A window of zero or less puts the cutoff
    /// today or later, which simply matches nothing. The result stays within
    /// four-digit years so the search qualifier remains well formed.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        let earliest = NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN);
        let latest = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX);

        let cutoff = Duration::try_days(self.window_days)
            .and_then(|window| today.checked_sub_signed(window))
            .unwrap_or(if self.window_days > 0 { earliest } else { latest });
        cutoff.clamp(earliest, latest)
    }

    pub fn build_at(&self, today: NaiveDate) -> String {
        format!(
            "repo:{} {} updated:>{}",
            self.repo,
            self.kind.filter(),
            self.cutoff(today).format("%Y-%m-%d")
        )
    }

    pub fn build(&self) -> String {
        self.build_at(Utc::now().date_naive())
    }

    /// Cache identity: the kind filter and the window, not the rendered
    /// string, so a cached entry survives the cutoff date rolling over.
    pub fn cache_key(&self) -> (String, i64) {
        (
            format!("repo:{} {}", self.repo, self.kind.filter()),
            self.window_days,
        )
    }
}
