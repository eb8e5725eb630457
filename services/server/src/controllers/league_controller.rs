use actix_web::{delete, get, post, web, HttpRequest, HttpResponse, Responder};
use chrono::{Duration, Utc};
use engine::invite;
use engine::leaderboard::StandingsBuilder;
use log::error;
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::models::league_model::{LeagueRow, PUBLIC_LEAGUE_ID, PUBLIC_LEAGUE_NAME};
use crate::models::prediction_model::StandingRow;
use crate::models::profile_model::ensure_profile;
use crate::services::scoring_service;
use crate::types::league_types::{CreateLeagueRequest, JoinLeagueRequest};
use crate::utils::jwt::extract_user;

async fn fetch_league(pool: &PgPool, league_id: i64) -> Result<Option<LeagueRow>, sqlx::Error> {
    sqlx::query_as::<_, LeagueRow>(
        "SELECT id, name, description, is_private, owner_id, invite_code, invite_issued_at
         FROM leagues WHERE id = $1",
    )
    .bind(league_id)
    .fetch_optional(pool)
    .await
}

async fn is_member(pool: &PgPool, league_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM league_members WHERE league_id = $1 AND user_id = $2)",
    )
    .bind(league_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

fn league_json(league: &LeagueRow) -> serde_json::Value {
    // invite code and its timestamp stay out of member-facing payloads
    json!({
        "id": league.id,
        "name": league.name,
        "description": league.description,
        "is_private": league.is_private,
        "owner_id": league.owner_id
    })
}

#[post("/leagues")]
pub async fn create_league(
    req: HttpRequest,
    db_pool: web::Data<PgPool>,
    body: web::Json<CreateLeagueRequest>,
) -> impl Responder {
    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": e.to_string()
        }));
    }

    let user = match extract_user(&req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if ensure_profile(db_pool.get_ref(), user.id).await.is_err() {
        return HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to prepare profile"
        }));
    }

    let mut tx = match db_pool.begin().await {
        Ok(t) => t,
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to start the database transaction"
            }));
        }
    };

    let league = match sqlx::query_as::<_, LeagueRow>(
        "INSERT INTO leagues (name, description, owner_id) VALUES ($1, $2, $3)
         RETURNING id, name, description, is_private, owner_id, invite_code, invite_issued_at",
    )
    .bind(&body.name)
    .bind(&body.description)
    .bind(user.id)
    .fetch_one(&mut *tx)
    .await
    {
        Ok(league) => league,
        Err(e) => {
            let _ = tx.rollback().await;
            if e.as_database_error()
                .map_or(false, |db| db.is_unique_violation())
            {
                return HttpResponse::Conflict().json(json!({
                    "status": "error",
                    "message": "A league with this name already exists"
                }));
            }
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to create league"
            }));
        }
    };

    if sqlx::query("INSERT INTO league_members (league_id, user_id) VALUES ($1, $2)")
        .bind(league.id)
        .bind(user.id)
        .execute(&mut *tx)
        .await
        .is_err()
    {
        let _ = tx.rollback().await;
        return HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to create league"
        }));
    }

    match tx.commit().await {
        Ok(_) => HttpResponse::Created().json(json!({
            "status": "success",
            "message": "League created",
            "league": league_json(&league)
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to create league"
        })),
    }
}

#[get("/leagues/mine")]
pub async fn my_leagues(req: HttpRequest, db_pool: web::Data<PgPool>) -> impl Responder {
    let user = match extract_user(&req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match sqlx::query_as::<_, LeagueRow>(
        "SELECT l.id, l.name, l.description, l.is_private, l.owner_id,
                l.invite_code, l.invite_issued_at
         FROM leagues l
         JOIN league_members lm ON lm.league_id = l.id
         WHERE lm.user_id = $1
         ORDER BY l.name ASC",
    )
    .bind(user.id)
    .fetch_all(db_pool.get_ref())
    .await
    {
        Ok(rows) => {
            // every user belongs to the synthetic public league
            let mut leagues = vec![json!({
                "id": PUBLIC_LEAGUE_ID,
                "name": PUBLIC_LEAGUE_NAME,
                "description": null,
                "is_private": false,
                "owner_id": null
            })];
            leagues.extend(rows.iter().map(league_json));
            let count = leagues.len();
            HttpResponse::Ok().json(json!({
                "status": "success",
                "leagues": leagues,
                "count": count
            }))
        }
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to fetch leagues"
        })),
    }
}

#[get("/leagues/{league_id}")]
pub async fn league_detail(
    req: HttpRequest,
    db_pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> impl Responder {
    let league_id = path.into_inner();
    let user = match extract_user(&req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let league = match fetch_league(db_pool.get_ref(), league_id).await {
        Ok(Some(league)) => league,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "status": "error",
                "message": "League not found"
            }));
        }
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to fetch league"
            }));
        }
    };

    match is_member(db_pool.get_ref(), league_id, user.id).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::Forbidden().json(json!({
                "status": "error",
                "message": "League members only"
            }));
        }
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to check membership"
            }));
        }
    }

    let rows = match sqlx::query_as::<_, StandingRow>(
        "SELECT pr.id AS user_id, pr.username, p.points
         FROM league_members lm
         JOIN profiles pr ON pr.id = lm.user_id
         LEFT JOIN predictions p ON p.user_id = pr.id
         WHERE lm.league_id = $1",
    )
    .bind(league_id)
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
        "league": league_json(&league),
        "is_owner": league.owner_id == user.id,
        "standings": standings,
        "member_count": count
    }))
}

/// Issues a fresh invitation code, replacing any previous one. The old
/// code stops resolving the moment the new one is stored.
#[post("/leagues/{league_id}/invite")]
pub async fn issue_invite(
    req: HttpRequest,
    db_pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> impl Responder {
    let league_id = path.into_inner();
    let user = match extract_user(&req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let league = match fetch_league(db_pool.get_ref(), league_id).await {
        Ok(Some(league)) => league,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "status": "error",
                "message": "League not found"
            }));
        }
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to fetch league"
            }));
        }
    };

    if league.owner_id != user.id {
        return HttpResponse::Forbidden().json(json!({
            "status": "error",
            "message": "Only the league owner can issue invitation codes"
        }));
    }

    let code = invite::generate_code();
    let issued_at = Utc::now();

    match sqlx::query("UPDATE leagues SET invite_code = $1, invite_issued_at = $2 WHERE id = $3")
        .bind(&code)
        .bind(issued_at)
        .bind(league_id)
        .execute(db_pool.get_ref())
        .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Invitation code issued",
            "code": code,
            "issued_at": issued_at,
            "expires_at": issued_at + Duration::seconds(invite::INVITE_TTL_SECS)
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to issue invitation code"
        })),
    }
}

#[get("/leagues/{league_id}/invite")]
pub async fn invite_status(
    req: HttpRequest,
    db_pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> impl Responder {
    let league_id = path.into_inner();
    let user = match extract_user(&req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let league = match fetch_league(db_pool.get_ref(), league_id).await {
        Ok(Some(league)) => league,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "status": "error",
                "message": "League not found"
            }));
        }
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to fetch league"
            }));
        }
    };

    if league.owner_id != user.id {
        return HttpResponse::Forbidden().json(json!({
            "status": "error",
            "message": "Only the league owner can view invitation status"
        }));
    }

    let now = Utc::now();
    match (league.invite_code, league.invite_issued_at) {
        (Some(code), Some(issued_at)) if !invite::is_expired(issued_at, now) => {
            HttpResponse::Ok().json(json!({
                "status": "success",
                "state": "active",
                "code": code,
                "issued_at": issued_at,
                "expires_at": issued_at + Duration::seconds(invite::INVITE_TTL_SECS),
                "remaining": invite::remaining(issued_at, now)
            }))
        }
        (Some(_), Some(issued_at)) => HttpResponse::Ok().json(json!({
            "status": "success",
            "state": "expired",
            "issued_at": issued_at
        })),
        _ => HttpResponse::Ok().json(json!({
            "status": "success",
            "state": "none"
        })),
    }
}

#[post("/leagues/join")]
pub async fn join_league(
    req: HttpRequest,
    db_pool: web::Data<PgPool>,
    body: web::Json<JoinLeagueRequest>,
) -> impl Responder {
    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(json!({
            "status": "error",
            "message": e.to_string()
        }));
    }

    let user = match extract_user(&req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let league = match sqlx::query_as::<_, LeagueRow>(
        "SELECT id, name, description, is_private, owner_id, invite_code, invite_issued_at
         FROM leagues WHERE invite_code = $1",
    )
    .bind(&body.code)
    .fetch_optional(db_pool.get_ref())
    .await
    {
        Ok(Some(league)) => league,
        // a regenerated code no longer resolves at all
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "status": "error",
                "message": "Invitation code not found"
            }));
        }
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to look up invitation code"
            }));
        }
    };

    match invite::check(league.invite_issued_at, Utc::now()) {
        Ok(()) => {}
        Err(invite::InviteError::Expired) => {
            return HttpResponse::Gone().json(json!({
                "status": "error",
                "message": "Invitation code expired"
            }));
        }
        Err(invite::InviteError::NotFound) => {
            return HttpResponse::NotFound().json(json!({
                "status": "error",
                "message": "Invitation code not found"
            }));
        }
    }

    if ensure_profile(db_pool.get_ref(), user.id).await.is_err() {
        return HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to prepare profile"
        }));
    }

    match sqlx::query(
        "INSERT INTO league_members (league_id, user_id) VALUES ($1, $2)
         ON CONFLICT (league_id, user_id) DO NOTHING",
    )
    .bind(league.id)
    .bind(user.id)
    .execute(db_pool.get_ref())
    .await
    {
        Ok(done) => {
            let message = if done.rows_affected() == 0 {
                "Already a member"
            } else {
                "Joined league"
            };
            HttpResponse::Ok().json(json!({
                "status": "success",
                "message": message,
                "league": {
                    "id": league.id,
                    "name": league.name
                }
            }))
        }
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to join league"
        })),
    }
}

#[delete("/leagues/{league_id}/membership")]
pub async fn leave_league(
    req: HttpRequest,
    db_pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> impl Responder {
    let league_id = path.into_inner();
    let user = match extract_user(&req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let league = match fetch_league(db_pool.get_ref(), league_id).await {
        Ok(Some(league)) => league,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "status": "error",
                "message": "League not found"
            }));
        }
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to fetch league"
            }));
        }
    };

    if league.owner_id == user.id {
        return HttpResponse::Conflict().json(json!({
            "status": "error",
            "message": "The owner cannot leave their own league"
        }));
    }

    match sqlx::query("DELETE FROM league_members WHERE league_id = $1 AND user_id = $2")
        .bind(league_id)
        .bind(user.id)
        .execute(db_pool.get_ref())
        .await
    {
        Ok(done) if done.rows_affected() == 0 => HttpResponse::NotFound().json(json!({
            "status": "error",
            "message": "Not a member of this league"
        })),
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Left league"
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to leave league"
        })),
    }
}

#[post("/leagues/{league_id}/recompute")]
pub async fn recompute_league(
    req: HttpRequest,
    db_pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> impl Responder {
    let league_id = path.into_inner();
    let user = match extract_user(&req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let league = match fetch_league(db_pool.get_ref(), league_id).await {
        Ok(Some(league)) => league,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "status": "error",
                "message": "League not found"
            }));
        }
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to fetch league"
            }));
        }
    };

    if league.owner_id != user.id {
        return HttpResponse::Forbidden().json(json!({
            "status": "error",
            "message": "Only the league owner can trigger recalculation"
        }));
    }

    match scoring_service::recompute_league(db_pool.get_ref(), league_id).await {
        Ok(report) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "League recomputation finished",
            "report": report
        })),
        Err(e) => {
            error!("league {} recomputation failed: {}", league_id, e);
            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "League recomputation failed",
                "error": e
            }))
        }
    }
}
