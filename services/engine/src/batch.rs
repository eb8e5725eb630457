use serde::{Deserialize, Serialize};

/// Outcome of a bulk point recomputation. Per-record write failures are
/// collected here instead of aborting the batch; a systemic failure never
/// produces a report at all.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RecomputeReport {
    pub matches_processed: u32,
    pub predictions_updated: u32,
    pub failures: Vec<RecomputeFailure>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RecomputeFailure {
    pub user_id: i64,
    pub match_id: i64,
    pub reason: String,
}

impl RecomputeReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_match(&mut self) {
        self.matches_processed += 1;
    }

    pub fn record_update(&mut self) {
        self.predictions_updated += 1;
    }

    pub fn record_failure(&mut self, user_id: i64, match_id: i64, reason: impl Into<String>) {
        self.failures.push(RecomputeFailure {
            user_id,
            match_id,
            reason: reason.into(),
        });
    }

    pub fn merge(&mut self, other: RecomputeReport) {
        self.matches_processed += other.matches_processed;
        self.predictions_updated += other.predictions_updated;
        self.failures.extend(other.failures);
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_report_is_clean_and_empty() {
        let report = RecomputeReport::new();
        assert!(report.is_clean());
        assert_eq!(report.matches_processed, 0);
        assert_eq!(report.predictions_updated, 0);
    }

    #[test]
    fn merge_accumulates_counts_and_failures() {
        let mut total = RecomputeReport::new();
        total.record_match();
        total.record_update();

        let mut partial = RecomputeReport::new();
        partial.record_match();
        partial.record_update();
        partial.record_update();
        partial.record_failure(4, 9, "connection reset");

        total.merge(partial);
        assert_eq!(total.matches_processed, 2);
        assert_eq!(total.predictions_updated, 3);
        assert_eq!(total.failures.len(), 1);
        assert_eq!(total.failures[0].user_id, 4);
        assert_eq!(total.failures[0].match_id, 9);
        assert!(!total.is_clean());
    }
}
