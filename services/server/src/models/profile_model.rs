use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub username: String,
}

/// Identity lives with the external auth provider; the profile row only
/// carries the display name. First contact gets a placeholder the user can
/// overwrite later.
pub async fn ensure_profile(pool: &PgPool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO profiles (id, username) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
    )
    .bind(user_id)
    .bind(format!("player-{}", user_id))
    .execute(pool)
    .await?;
    Ok(())
}
