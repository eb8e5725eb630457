use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::models::prediction_model::PredictionRow;
use crate::models::profile_model::ensure_profile;
use crate::types::prediction_types::SubmitPredictionRequest;
use crate::utils::jwt::extract_user;

#[post("/predictions")]
pub async fn submit_prediction(
    req: HttpRequest,
    db_pool: web::Data<PgPool>,
    body: web::Json<SubmitPredictionRequest>,
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

    let deadline: Option<DateTime<Utc>> = match sqlx::query_scalar(
        "SELECT r.deadline FROM matches m JOIN rounds r ON r.id = m.round_id WHERE m.id = $1",
    )
    .bind(body.match_id)
    .fetch_optional(db_pool.get_ref())
    .await
    {
        Ok(deadline) => deadline,
        Err(_) => {
            return HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": "Failed to fetch match"
            }));
        }
    };

    let deadline = match deadline {
        Some(deadline) => deadline,
        None => {
            return HttpResponse::NotFound().json(json!({
                "status": "error",
                "message": "Match not found"
            }));
        }
    };

    if Utc::now() >= deadline {
        return HttpResponse::Conflict().json(json!({
            "status": "error",
            "message": "Prediction deadline has passed"
        }));
    }

    if ensure_profile(db_pool.get_ref(), user.id).await.is_err() {
        return HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to prepare profile"
        }));
    }

    // one prediction per (user, match); resubmitting overwrites and clears
    // any previously awarded points
    let upsert = sqlx::query_as::<_, PredictionRow>(
        "INSERT INTO predictions (user_id, match_id, home_score, away_score)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (user_id, match_id)
         DO UPDATE SET home_score = EXCLUDED.home_score,
                       away_score = EXCLUDED.away_score,
                       points = NULL
         RETURNING user_id, match_id, home_score, away_score, points",
    )
    .bind(user.id)
    .bind(body.match_id)
    .bind(body.home_score as i32)
    .bind(body.away_score as i32)
    .fetch_one(db_pool.get_ref())
    .await;

    match upsert {
        Ok(prediction) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "Prediction saved",
            "prediction": prediction
        })),
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to save prediction"
        })),
    }
}

#[get("/predictions/mine")]
pub async fn my_predictions(req: HttpRequest, db_pool: web::Data<PgPool>) -> impl Responder {
    let user = match extract_user(&req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    match sqlx::query_as::<_, PredictionRow>(
        "SELECT user_id, match_id, home_score, away_score, points
         FROM predictions WHERE user_id = $1 ORDER BY match_id ASC",
    )
    .bind(user.id)
    .fetch_all(db_pool.get_ref())
    .await
    {
        Ok(predictions) => {
            let count = predictions.len();
            HttpResponse::Ok().json(json!({
                "status": "success",
                "predictions": predictions,
                "count": count
            }))
        }
        Err(_) => HttpResponse::InternalServerError().json(json!({
            "status": "error",
            "message": "Failed to fetch predictions"
        })),
    }
}
