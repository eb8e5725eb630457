mod controllers;
mod middleware;
mod models;
mod services;
mod types;
mod utils;

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use dotenvy::dotenv;
use log::info;
use sqlx::postgres::PgPoolOptions;
use std::env;

use crate::controllers::admin_fixture_controller::{
    create_match, create_round, create_team, delete_match, delete_round, delete_team,
    recompute_all, record_result,
};
use crate::controllers::fixture_controller::{list_matches, list_rounds, list_teams};
use crate::controllers::leaderboard_controller::global_leaderboard;
use crate::controllers::league_controller::{
    create_league, invite_status, issue_invite, join_league, league_detail, leave_league,
    my_leagues, recompute_league,
};
use crate::controllers::prediction_controller::{my_predictions, submit_prediction};
use crate::controllers::profile_controller::{my_profile, upsert_profile};
use crate::middleware::admin::AdminMiddleware;
use crate::middleware::auth::AuthMiddleware;

async fn health() -> impl Responder {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(r#"{"status": "Ok"}"#)
}

async fn run() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in .env");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to create Postgres pool");

    info!("Connected to Postgres Database");

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".to_string());
    let pool_data = web::Data::new(pool);

    info!("Listening on {}", bind_addr);

    HttpServer::new(move || {
        // /leagues/mine must register before /leagues/{league_id}
        let api_scope = web::scope("/api")
            .wrap(AuthMiddleware)
            .service(my_profile)
            .service(upsert_profile)
            .service(submit_prediction)
            .service(my_predictions)
            .service(create_league)
            .service(my_leagues)
            .service(join_league)
            .service(league_detail)
            .service(issue_invite)
            .service(invite_status)
            .service(leave_league)
            .service(recompute_league);

        let admin_scope = web::scope("/admin")
            .wrap(AdminMiddleware)
            .wrap(AuthMiddleware)
            .service(create_team)
            .service(delete_team)
            .service(create_round)
            .service(delete_round)
            .service(create_match)
            .service(delete_match)
            .service(record_result)
            .service(recompute_all);

        App::new()
            .app_data(pool_data.clone())
            .route("/health", web::get().to(health))
            .service(global_leaderboard)
            .service(list_teams)
            .service(list_rounds)
            .service(list_matches)
            .service(api_scope)
            .service(admin_scope)
    })
    .bind(bind_addr)?
    .run()
    .await
}

fn main() -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime");
    runtime.block_on(run())
}
