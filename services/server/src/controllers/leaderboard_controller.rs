use actix_web::{get, web, HttpResponse, Responder};
use engine::leaderboard::StandingsBuilder;
use serde_json::json;
use sqlx::PgPool;

use crate::models::league_model::{PUBLIC_LEAGUE_ID, PUBLIC_LEAGUE_NAME};
use crate::models::prediction_model::StandingRow;

/// The public league leaderboard: every profile, all predictions. Rebuilt
/// from prediction rows on each request; nothing is kept between calls.
#[get("/leaderboard")]
pub async fn global_leaderboard(db_pool: web::Data<PgPool>) -> impl Responder {
    let rows = match sqlx::query_as::<_, StandingRow>(
        "SELECT pr.id AS user_id, pr.username, p.points
         FROM profiles pr
         LEFT JOIN predictions p ON p.user_id = pr.id",
    )
    .fetch_all(db_pool.get_ref())
    .await
    {
        Ok(rows) => rows,
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to fetch standings"
            }));
        }
    };

    let mut builder = StandingsBuilder::new();
    for row in &rows {
        builder.add(row.user_id, &row.username, row.points);
    }
    let standings = builder.into_ranked();
    let count = standings.len();

    HttpResponse::Ok().json(json!({
        "status": "success",
        "league": {
            "id": PUBLIC_LEAGUE_ID,
            "name": PUBLIC_LEAGUE_NAME
        },
        "standings": standings,
        "count": count
    }))
}
