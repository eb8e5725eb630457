use actix_web::{get, put, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::models::profile_model::{ensure_profile, ProfileRow};
use crate::types::profile_types::UpsertProfileRequest;
use crate::utils::jwt::extract_user;

#[get("/profile")]
pub async fn my_profile(req: HttpRequest, db_pool: web::Data<PgPool>) -> impl Responder {
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

    match sqlx::query_as::<_, ProfileRow>("SELECT id, username FROM profiles WHERE id = $1")
        .bind(user.id)
        .fetch_one(db_pool.get_ref())
        .await
    {
        Ok(profile) => HttpResponse::Ok().json(json!({
            "status": "success",
            "profile": profile
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to fetch profile"
        })),
    }
}

#[put("/profile")]
pub async fn upsert_profile(
    req: HttpRequest,
    db_pool: web::Data<PgPool>,
    body: web::Json<UpsertProfileRequest>,
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

    match sqlx::query_as::<_, ProfileRow>(
        "INSERT INTO profiles (id, username) VALUES ($1, $2)
         ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username
         RETURNING id, username",
    )
    .bind(user.id)
    .bind(&body.username)
    .fetch_one(db_pool.get_ref())
    .await
    {
        Ok(profile) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Profile saved",
            "profile": profile
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to save profile"
        })),
    }
}
