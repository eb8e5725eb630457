use crate::scoring::{POINTS_EXACT, POINTS_MISS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub username: String,
    pub total_points: i64,
    pub exact_count: u32,
    pub outcome_count: u32,
}

/// Accumulates per-prediction point values into per-user standings.
/// Rebuilt from scratch on every read; holds no state between requests.
#[derive(Debug, Default)]
pub struct StandingsBuilder {
    entries: HashMap<i64, LeaderboardEntry>,
}

impl StandingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one prediction row. `points` is `None` while the match result
    /// is pending; the user still appears in the table with zero totals.
    pub fn add(&mut self, user_id: i64, username: &str, points: Option<i32>) {
        let entry = self
            .entries
            .entry(user_id)
            .or_insert_with(|| LeaderboardEntry {
                user_id,
                username: username.to_string(),
                total_points: 0,
                exact_count: 0,
                outcome_count: 0,
            });
        let Some(points) = points else {
            return;
        };
        entry.total_points += points as i64;
        if points == POINTS_EXACT {
            entry.exact_count += 1;
        }
        if points > POINTS_MISS {
            entry.outcome_count += 1;
        }
    }

    pub fn into_ranked(self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self.entries.into_values().collect();
        rank(&mut entries);
        entries
    }
}

/// Orders by total, then exact-score count, then correct-outcome count,
/// with username as a final key so equal records rank deterministically.
pub fn rank(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then(b.exact_count.cmp(&a.exact_count))
            .then(b.outcome_count.cmp(&a.outcome_count))
            .then(a.username.cmp(&b.username))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(entries: &[LeaderboardEntry]) -> Vec<i64> {
        entries.iter().map(|e| e.user_id).collect()
    }

    #[test]
    fn totals_sum_across_predictions() {
        let mut builder = StandingsBuilder::new();
        builder.add(1, "ada", Some(3));
        builder.add(1, "ada", Some(1));
        builder.add(1, "ada", Some(0));
        builder.add(1, "ada", None);

        let entries = builder.into_ranked();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total_points, 4);
        assert_eq!(entries[0].exact_count, 1);
        assert_eq!(entries[0].outcome_count, 2);
    }

    #[test]
    fn pending_points_count_as_zero() {
        let mut builder = StandingsBuilder::new();
        builder.add(1, "ada", None);
        builder.add(2, "bob", Some(1));

        let entries = builder.into_ranked();
        assert_eq!(ids(&entries), vec![2, 1]);
        assert_eq!(entries[1].total_points, 0);
        assert_eq!(entries[1].outcome_count, 0);
    }

    #[test]
    fn higher_total_ranks_first() {
        let mut builder = StandingsBuilder::new();
        builder.add(1, "ada", Some(1));
        builder.add(2, "bob", Some(3));

        assert_eq!(ids(&builder.into_ranked()), vec![2, 1]);
    }

    #[test]
    fn equal_totals_break_on_exact_count() {
        let mut builder = StandingsBuilder::new();
        // ada: 3 = 1 + 1 + 1, bob: 3 = 3 + 0 + 0
        builder.add(1, "ada", Some(1));
        builder.add(1, "ada", Some(1));
        builder.add(1, "ada", Some(1));
        builder.add(2, "bob", Some(3));
        builder.add(2, "bob", Some(0));
        builder.add(2, "bob", Some(0));

        assert_eq!(ids(&builder.into_ranked()), vec![2, 1]);
    }

    #[test]
    fn equal_exact_counts_break_on_outcome_count() {
        let entry = |user_id: i64, username: &str, outcome_count: u32| LeaderboardEntry {
            user_id,
            username: username.to_string(),
            total_points: 10,
            exact_count: 2,
            outcome_count,
        };
        let mut entries = vec![entry(1, "ada", 4), entry(2, "bob", 6)];
        rank(&mut entries);
        assert_eq!(ids(&entries), vec![2, 1]);
    }

    #[test]
    fn identical_records_rank_by_username() {
        let mut builder = StandingsBuilder::new();
        builder.add(7, "zoe", Some(1));
        builder.add(3, "ada", Some(1));

        assert_eq!(ids(&builder.into_ranked()), vec![3, 7]);
    }
}
