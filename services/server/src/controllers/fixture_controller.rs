use actix_web::{get, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;

use crate::models::fixture_model::{MatchRow, RoundRow, TeamRow};

#[derive(Deserialize)]
pub struct MatchListQuery {
    pub round_id: Option<i64>,
}

#[get("/teams")]
pub async fn list_teams(db_pool: web::Data<PgPool>) -> impl Responder {
    match sqlx::query_as::<_, TeamRow>("SELECT id, name FROM teams ORDER BY name ASC")
        .fetch_all(db_pool.get_ref())
        .await
    {
        Ok(teams) => {
            let count = teams.len();
            HttpResponse::Ok().json(json!({
                "status": "success",
                "teams": teams,
                "count": count
            }))
        }
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to fetch teams"
        })),
    }
}

#[get("/rounds")]
pub async fn list_rounds(db_pool: web::Data<PgPool>) -> impl Responder {
    match sqlx::query_as::<_, RoundRow>(
        "SELECT id, description, deadline FROM rounds ORDER BY deadline ASC",
    )
    .fetch_all(db_pool.get_ref())
    .await
    {
        Ok(rounds) => {
            let count = rounds.len();
            HttpResponse::Ok().json(json!({
                "status": "success",
                "rounds": rounds,
                "count": count
            }))
        }
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to fetch rounds"
        })),
    }
}

#[get("/matches")]
pub async fn list_matches(
    db_pool: web::Data<PgPool>,
    query: web::Query<MatchListQuery>,
) -> impl Responder {
    let result = match query.round_id {
        Some(round_id) => {
            sqlx::query_as::<_, MatchRow>(
                "SELECT id, home_team_id, away_team_id, starts_at, home_score, away_score,
                        round_id, competition
                 FROM matches WHERE round_id = $1 ORDER BY starts_at ASC",
            )
            .bind(round_id)
            .fetch_all(db_pool.get_ref())
            .await
        }
        None => {
            sqlx::query_as::<_, MatchRow>(
                "SELECT id, home_team_id, away_team_id, starts_at, home_score, away_score,
                        round_id, competition
                 FROM matches ORDER BY starts_at ASC",
            )
            .fetch_all(db_pool.get_ref())
            .await
        }
    };

    match result {
        Ok(matches) => {
            let count = matches.len();
            HttpResponse::Ok().json(json!({
                "status": "success",
                "matches": matches,
                "count": count
            }))
        }
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to fetch matches"
        })),
    }
}
