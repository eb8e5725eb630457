use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct CreateLeagueRequest {
    #[validate(length(min = 3, max = 64))]
    pub name: String,
    #[validate(length(max = 280))]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct JoinLeagueRequest {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
}
