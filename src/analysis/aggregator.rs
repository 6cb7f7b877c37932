use super::*;
use crate::github::SearchItem;
use tracing::{debug, warn};

pub struct Aggregator {
    bot_marker: String,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(BOT_MARKER)
    }
}

impl Aggregator {
    pub fn new(bot_marker: &str) -> Self {
        Self {
            bot_marker: bot_marker.to_string(),
        }
    }

    pub fn is_bot(&self, login: &str) -> bool {
        !self.bot_marker.is_empty() && login.contains(&self.bot_marker)
    }

    /// Count items per author. Bots are dropped, and so are items without an
    /// author login.
    pub fn tally(&self, items: &[SearchItem]) -> Tally {
        let mut counts = Tally::new();
        let mut bots = 0usize;

        for item in items {
            let Some(login) = item.author() else {
                warn!(
                    "Skipping search item {} without an author login",
                    item.number
                        .map(|n| format!("#{}", n))
                        .unwrap_or_else(|| "(no number)".to_string())
                );
                continue;
            };

            if self.is_bot(login) {
                bots += 1;
                continue;
            }

            *counts.entry(login.to_string()).or_insert(0) += 1;
        }

        debug!(
            "Tallied {} items across {} authors, ignored {} bot items",
            items.len(),
            counts.len(),
            bots
        );
        counts
    }

    pub fn aggregate(&self, pull_requests: &[SearchItem], issues: &[SearchItem]) -> AuthorTally {
        AuthorTally {
            pull_requests: self.tally(pull_requests),
            issues: self.tally(issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::SearchUser;

    #[test]
    fn counts_items_per_author() {
        let items = vec![
            SearchItem::by("alice"),
            SearchItem::by("alice"),
            SearchItem::by("bob"),
        ];

        let tally = Aggregator::default().tally(&items);

        assert_eq!(tally.get("alice"), Some(&2));
        assert_eq!(tally.get("bob"), Some(&1));
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn drops_bot_accounts() {
        let items = vec![
            SearchItem::by("dependabot[bot]"),
            SearchItem::by("dependabot[bot]"),
            SearchItem::by("posthog-bot[bot]"),
            SearchItem::by("carol"),
        ];

        let tally = Aggregator::default().tally(&items);

        assert_eq!(tally.len(), 1);
        assert!(tally.keys().all(|login| !login.contains("[bot]")));
    }

    #[test]
    fn bot_marker_is_a_literal_substring() {
        let aggregator = Aggregator::default();
        assert!(aggregator.is_bot("renovate[bot]"));
        assert!(!aggregator.is_bot("robot"));
        assert!(!aggregator.is_bot("bot"));
    }

    #[test]
    fn skips_items_without_author() {
        let items = vec![
            SearchItem {
                number: Some(7),
                user: None,
                ..Default::default()
            },
            SearchItem {
                number: Some(8),
                user: Some(SearchUser { login: None }),
                ..Default::default()
            },
            SearchItem::by("dave"),
        ];

        let tally = Aggregator::default().tally(&items);

        assert_eq!(tally.len(), 1);
        assert_eq!(tally.get("dave"), Some(&1));
    }

    #[test]
    fn aggregates_both_kinds_separately() {
        let prs = vec![SearchItem::by("alice"), SearchItem::by("bob")];
        let issues = vec![SearchItem::by("bob")];

        let tally = Aggregator::default().aggregate(&prs, &issues);

        assert_eq!(tally.pull_requests_for("alice"), 1);
        assert_eq!(tally.issues_for("alice"), 0);
        assert_eq!(tally.issues_for("bob"), 1);
        assert!(!tally.is_empty());
    }

    #[test]
    fn only_bots_leaves_tally_empty() {
        let prs = vec![SearchItem::by("github-actions[bot]")];

        let tally = Aggregator::default().aggregate(&prs, &[]);

        assert!(tally.is_empty());
    }
}
