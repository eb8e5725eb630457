use actix_web::{delete, post, web, HttpResponse, Responder};
use engine::scoring::MatchScore;
use log::error;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::models::fixture_model::{MatchRow, RoundRow, TeamRow};
use crate::services::scoring_service;
use crate::types::fixture_types::{
    CreateMatchRequest, CreateRoundRequest, CreateTeamRequest, RecordResultRequest,
};

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map_or(false, |db| db.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map_or(false, |db| db.is_foreign_key_violation())
}

#[post("/teams")]
pub async fn create_team(
    db_pool: web::Data<PgPool>,
    body: web::Json<CreateTeamRequest>,
) -> impl Responder {
    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": e.to_string()
        }));
    }

    match sqlx::query_as::<_, TeamRow>("INSERT INTO teams (name) VALUES ($1) RETURNING id, name")
        .bind(&body.name)
        .fetch_one(db_pool.get_ref())
        .await
    {
        Ok(team) => HttpResponse::Created().json(json!({
            "status": "success",
            "message": "Team created",
            "team": team
        })),
        Err(e) if is_unique_violation(&e) => HttpResponse::Conflict().json(json!({
            "status": "error",
            "message": "A team with this name already exists"
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to create team"
        })),
    }
}

#[delete("/teams/{team_id}")]
pub async fn delete_team(db_pool: web::Data<PgPool>, path: web::Path<i64>) -> impl Responder {
    let team_id = path.into_inner();

    match sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(team_id)
        .execute(db_pool.get_ref())
        .await
    {
        Ok(done) if done.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "status": "error",
            "message": "Team not found"
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Team deleted"
        })),
        Err(e) if is_foreign_key_violation(&e) => HttpResponse::Conflict().json(json!({
            "status": "error",
            "message": "Team still appears in scheduled matches"
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to delete team"
        })),
    }
}

#[post("/rounds")]
pub async fn create_round(
    db_pool: web::Data<PgPool>,
    body: web::Json<CreateRoundRequest>,
) -> impl Responder {
    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": e.to_string()
        }));
    }

    match sqlx::query_as::<_, RoundRow>(
        "INSERT INTO rounds (description, deadline) VALUES ($1, $2)
         RETURNING id, description, deadline",
    )
    .bind(&body.description)
    .bind(body.deadline)
    .fetch_one(db_pool.get_ref())
    .await
    {
        Ok(round) => HttpResponse::Created().json(json!({
            "status": "success",
            "message": "Round created",
            "round": round
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to create round"
        })),
    }
}

#[delete("/rounds/{round_id}")]
pub async fn delete_round(db_pool: web::Data<PgPool>, path: web::Path<i64>) -> impl Responder {
    let round_id = path.into_inner();

    // a round may only be deleted while it owns zero matches
    let match_count: i64 = match sqlx::query_scalar("SELECT COUNT(*) FROM matches WHERE round_id = $1")
        .bind(round_id)
        .fetch_one(db_pool.get_ref())
        .await
    {
        Ok(count) => count,
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to check round"
            }));
        }
    };

    if match_count > 0 {
        return HttpResponse::Conflict().json(json!({
            "status": "error",
            "message": "Round still owns matches"
        }));
    }

    match sqlx::query("DELETE FROM rounds WHERE id = $1")
        .bind(round_id)
        .execute(db_pool.get_ref())
        .await
    {
        Ok(done) if done.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "status": "error",
            "message": "Round not found"
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Round deleted"
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to delete round"
        })),
    }
}

#[post("/matches")]
pub async fn create_match(
    db_pool: web::Data<PgPool>,
    body: web::Json<CreateMatchRequest>,
) -> impl Responder {
    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": e.to_string()
        }));
    }

    match sqlx::query_as::<_, MatchRow>(
        "INSERT INTO matches (home_team_id, away_team_id, starts_at, round_id, competition)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, home_team_id, away_team_id, starts_at, home_score, away_score,
                   round_id, competition",
    )
    .bind(body.home_team_id)
    .bind(body.away_team_id)
    .bind(body.starts_at)
    .bind(body.round_id)
    .bind(&body.competition)
    .fetch_one(db_pool.get_ref())
    .await
    {
        Ok(row) => HttpResponse::Created().json(json!({
            "status": "success",
            "message": "Match created",
            "match": row
        })),
        Err(e) if is_foreign_key_violation(&e) => HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": "Unknown team or round"
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to create match"
        })),
    }
}

#[delete("/matches/{match_id}")]
pub async fn delete_match(db_pool: web::Data<PgPool>, path: web::Path<i64>) -> impl Responder {
    let match_id = path.into_inner();

    match sqlx::query("DELETE FROM matches WHERE id = $1")
        .bind(match_id)
        .execute(db_pool.get_ref())
        .await
    {
        Ok(done) if done.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "status": "error",
            "message": "Match not found"
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Match deleted"
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to delete match"
        })),
    }
}

#[post("/results")]
pub async fn record_result(
    db_pool: web::Data<PgPool>,
    body: web::Json<RecordResultRequest>,
) -> impl Responder {
    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": e.to_string()
        }));
    }

    let updated = sqlx::query("UPDATE matches SET home_score = $1, away_score = $2 WHERE id = $3")
        .bind(body.home_score as i32)
        .bind(body.away_score as i32)
        .bind(body.match_id)
        .execute(db_pool.get_ref())
        .await;

    match updated {
        Ok(done) if done.rows_affected() == 0 => {
            return HttpResponse::NotFound().json(json!({
                "status": "error",
                "message": "Match not found"
            }));
        }
        Ok(_) => {}
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to record result"
            }));
        }
    }

    let result = MatchScore::new(body.home_score, body.away_score);
    match scoring_service::recompute_match(db_pool.get_ref(), body.match_id, result).await {
        Ok(report) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Result recorded and points recomputed",
            "report": report
        })),
        Err(e) => {
            error!("recomputation after result entry failed: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Result recorded but point recomputation failed",
                "error": e
            }))
        }
    }
}

#[post("/recompute")]
pub async fn recompute_all(db_pool: web::Data<PgPool>) -> impl Responder {
    match scoring_service::recompute_all(db_pool.get_ref()).await {
        Ok(report) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "System-wide recomputation finished",
            "report": report
        })),
        Err(e) => {
            error!("system-wide recomputation failed: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "System-wide recomputation failed",
                "error": e
            }))
        }
    }
}
