use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct CreateTeamRequest {
    #[validate(length(min = 2, max = 64))]
    pub name: String,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct CreateRoundRequest {
    #[validate(length(min = 1, max = 128))]
    pub description: String,
    pub deadline: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct CreateMatchRequest {
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub starts_at: DateTime<Utc>,
    pub round_id: i64,
    #[validate(length(min = 1, max = 64))]
    pub competition: String,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct RecordResultRequest {
    pub match_id: i64,
    #[validate(range(max = 99))]
    pub home_score: u32,
    #[validate(range(max = 99))]
    pub away_score: u32,
}
