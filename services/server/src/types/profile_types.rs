use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct UpsertProfileRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
}
