use serde::Deserialize;

pub mod cache;
pub mod client;
pub mod query;
#[cfg(test)]
pub mod testing;

pub use cache::{CachedSearch, ResponseCache};
pub use client::{Fetcher, HttpTransport, SearchTransport, TransportResponse};
pub use query::SearchQuery;

/// Page size requested from the search endpoint. Anything past the first
/// page is dropped.
pub const PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    MergedPullRequest,
    ClosedIssue,
}

impl ItemKind {
    pub fn filter(&self) -> &'static str {
        match self {
            ItemKind::MergedPullRequest => "is:pr is:merged",
            ItemKind::ClosedIssue => "is:issue is:closed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::MergedPullRequest => "merged pull requests",
            ItemKind::ClosedIssue => "closed issues",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SearchUser {
    #[serde(default)]
    pub login: Option<String>,
}

/// One record from the `items` array of a search response.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SearchItem {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub user: Option<SearchUser>,
}

impl SearchItem {
    pub fn author(&self) -> Option<&str> {
        self.user.as_ref()?.login.as_deref()
    }

    #[cfg(test)]
    pub fn by(login: &str) -> Self {
        Self {
            user: Some(SearchUser {
                login: Some(login.to_string()),
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}
