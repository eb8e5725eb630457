use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct SubmitPredictionRequest {
    pub match_id: i64,
    #[validate(range(max = 99))]
    pub home_score: u32,
    #[validate(range(max = 99))]
    pub away_score: u32,
}
