use serde::{Deserialize, Serialize};

pub const POINTS_EXACT: i32 = 3;
pub const POINTS_OUTCOME: i32 = 1;
pub const POINTS_MISS: i32 = 0;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    pub home: u32,
    pub away: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

impl MatchScore {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    pub fn outcome(&self) -> Outcome {
        if self.home > self.away {
            Outcome::HomeWin
        } else if self.home < self.away {
            Outcome::AwayWin
        } else {
            Outcome::Draw
        }
    }
}

/// Points for one prediction against a finalized result. Exact scoreline
/// beats matching the outcome category; the categories are mutually
/// exclusive so evaluation order only matters for the exact case.
pub fn score_prediction(predicted: MatchScore, actual: MatchScore) -> i32 {
    if predicted == actual {
        return POINTS_EXACT;
    }
    if predicted.outcome() == actual.outcome() {
        return POINTS_OUTCOME;
    }
    POINTS_MISS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_score_wins_three_points() {
        assert_eq!(
            score_prediction(MatchScore::new(2, 1), MatchScore::new(2, 1)),
            POINTS_EXACT
        );
        assert_eq!(
            score_prediction(MatchScore::new(0, 0), MatchScore::new(0, 0)),
            POINTS_EXACT
        );
    }

    #[test]
    fn correct_outcome_wins_one_point() {
        assert_eq!(
            score_prediction(MatchScore::new(2, 1), MatchScore::new(3, 1)),
            POINTS_OUTCOME
        );
        assert_eq!(
            score_prediction(MatchScore::new(0, 3), MatchScore::new(1, 2)),
            POINTS_OUTCOME
        );
        assert_eq!(
            score_prediction(MatchScore::new(1, 1), MatchScore::new(4, 4)),
            POINTS_OUTCOME
        );
    }

    #[test]
    fn wrong_outcome_wins_nothing() {
        assert_eq!(
            score_prediction(MatchScore::new(2, 1), MatchScore::new(1, 2)),
            POINTS_MISS
        );
        assert_eq!(
            score_prediction(MatchScore::new(0, 0), MatchScore::new(2, 0)),
            POINTS_MISS
        );
        assert_eq!(
            score_prediction(MatchScore::new(3, 0), MatchScore::new(2, 2)),
            POINTS_MISS
        );
    }

    #[test]
    fn outcome_categories() {
        assert_eq!(MatchScore::new(3, 1).outcome(), Outcome::HomeWin);
        assert_eq!(MatchScore::new(0, 1).outcome(), Outcome::AwayWin);
        assert_eq!(MatchScore::new(2, 2).outcome(), Outcome::Draw);
    }

    #[test]
    fn scoring_is_consistent_over_small_grid() {
        for ph in 0..5u32 {
            for pa in 0..5u32 {
                for ah in 0..5u32 {
                    for aa in 0..5u32 {
                        let predicted = MatchScore::new(ph, pa);
                        let actual = MatchScore::new(ah, aa);
                        let points = score_prediction(predicted, actual);
                        if ph == ah && pa == aa {
                            assert_eq!(points, POINTS_EXACT);
                        } else if predicted.outcome() == actual.outcome() {
                            assert_eq!(points, POINTS_OUTCOME);
                        } else {
                            assert_eq!(points, POINTS_MISS);
                        }
                    }
                }
            }
        }
    }
}
