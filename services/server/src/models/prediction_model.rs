use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct PredictionRow {
    pub user_id: i64,
    pub match_id: i64,
    pub home_score: i32,
    pub away_score: i32,
    pub points: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct StandingRow {
    pub user_id: i64,
    pub username: String,
    pub points: Option<i32>,
}

/// Prediction joined against its match's finalized result, for
/// league-scoped recomputation.
#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct ScoredPredictionRow {
    pub user_id: i64,
    pub match_id: i64,
    pub home_score: i32,
    pub away_score: i32,
    pub result_home: i32,
    pub result_away: i32,
}
