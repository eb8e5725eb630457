use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct TeamRow {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct RoundRow {
    pub id: i64,
    pub description: String,
    pub deadline: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub starts_at: DateTime<Utc>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub round_id: i64,
    pub competition: String,
}
