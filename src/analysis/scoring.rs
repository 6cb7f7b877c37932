use super::*;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// One record per login seen in either tally.
pub fn score(tally: &AuthorTally) -> Vec<ScoredAuthor> {
    let logins: BTreeSet<&String> = tally
        .pull_requests
        .keys()
        .chain(tally.issues.keys())
        .collect();

    logins
        .into_iter()
        .map(|login| {
            let pull_requests = tally.pull_requests_for(login);
            let issues = tally.issues_for(login);
            ScoredAuthor {
                login: login.clone(),
                pull_requests,
                issues,
                score: impact_score(pull_requests, issues),
            }
        })
        .filter(|author| author.pull_requests + author.issues > 0)
        .collect()
}

/// Highest score first, login ascending on ties, truncated to `limit`.
pub fn rank(mut scored: Vec<ScoredAuthor>, limit: usize) -> Vec<RankedEntry> {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.login.cmp(&b.login))
    });

    scored
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, author)| RankedEntry {
            rank: i + 1,
            login: author.login,
            pull_requests: author.pull_requests,
            issues: author.issues,
            score: author.score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tally(prs: &[(&str, u32)], issues: &[(&str, u32)]) -> AuthorTally {
        AuthorTally {
            pull_requests: prs.iter().map(|(l, c)| (l.to_string(), *c)).collect(),
            issues: issues.iter().map(|(l, c)| (l.to_string(), *c)).collect(),
        }
    }

    #[test]
    fn alice_outranks_bob() {
        let scored = score(&tally(&[("alice", 2), ("bob", 1)], &[("bob", 1)]));
        let ranked = rank(scored, LEADERBOARD_SIZE);

        assert_eq!(
            ranked,
            vec![
                RankedEntry {
                    rank: 1,
                    login: "alice".into(),
                    pull_requests: 2,
                    issues: 0,
                    score: 3.0,
                },
                RankedEntry {
                    rank: 2,
                    login: "bob".into(),
                    pull_requests: 1,
                    issues: 1,
                    score: 2.5,
                },
            ]
        );
    }

    #[test]
    fn issue_only_authors_are_scored() {
        let scored = score(&tally(&[], &[("erin", 3)]));
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].pull_requests, 0);
        assert_eq!(scored[0].score, 3.0);
    }

    #[test]
    fn zero_count_entries_are_dropped() {
        let scored = score(&tally(&[("ghost", 0)], &[("ghost", 0), ("frank", 1)]));
        let logins: Vec<_> = scored.iter().map(|s| s.login.as_str()).collect();
        assert_eq!(logins, vec!["frank"]);
    }

    #[test]
    fn keeps_only_the_top_five() {
        let prs: Vec<(String, u32)> = (1..=8).map(|n| (format!("dev{}", n), n)).collect();
        let prs: Vec<(&str, u32)> = prs.iter().map(|(l, c)| (l.as_str(), *c)).collect();

        let ranked = rank(score(&tally(&prs, &[])), LEADERBOARD_SIZE);

        let logins: Vec<_> = ranked.iter().map(|r| r.login.as_str()).collect();
        assert_eq!(logins, vec!["dev8", "dev7", "dev6", "dev5", "dev4"]);
    }

    #[test]
    fn ties_break_on_login() {
        let ranked = rank(
            score(&tally(&[("zed", 2)], &[("amy", 3)])),
            LEADERBOARD_SIZE,
        );

        assert_eq!(ranked[0].login, "amy");
        assert_eq!(ranked[1].login, "zed");
        assert_eq!(ranked[0].score, ranked[1].score);
    }

    #[test]
    fn empty_tally_ranks_nothing() {
        assert!(rank(score(&AuthorTally::default()), LEADERBOARD_SIZE).is_empty());
    }

    proptest! {
        #[test]
        fn score_is_weighted_sum(p in 0u32..100_000, i in 0u32..100_000) {
            prop_assert_eq!(impact_score(p, i), 1.5 * p as f64 + i as f64);
        }

        #[test]
        fn ranks_are_contiguous_and_capped(
            prs in proptest::collection::hash_map("[a-z]{1,6}", 0u32..20, 0..12),
            issues in proptest::collection::hash_map("[a-z]{1,6}", 0u32..20, 0..12),
        ) {
            let tally = AuthorTally { pull_requests: prs, issues };
            let scored = score(&tally);
            let authors = scored.len();
            let ranked = rank(scored, LEADERBOARD_SIZE);

            prop_assert_eq!(ranked.len(), authors.min(LEADERBOARD_SIZE));
            for (i, entry) in ranked.iter().enumerate() {
                prop_assert_eq!(entry.rank, i + 1);
                prop_assert!(entry.pull_requests + entry.issues > 0);
                prop_assert!(entry.score >= 0.0);
            }
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }
}
