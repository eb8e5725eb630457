use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The public league is synthetic: every user belongs to it and it never
/// hits storage.
pub const PUBLIC_LEAGUE_ID: i64 = 0;
pub const PUBLIC_LEAGUE_NAME: &str = "Public league";

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct LeagueRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub owner_id: i64,
    pub invite_code: Option<String>,
    pub invite_issued_at: Option<DateTime<Utc>>,
}
