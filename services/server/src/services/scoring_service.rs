use engine::batch::RecomputeReport;
use engine::scoring::{score_prediction, MatchScore};
use log::{info, warn};
use sqlx::PgPool;
use std::collections::HashSet;

use crate::models::prediction_model::{PredictionRow, ScoredPredictionRow};

fn forecast_of(row: &PredictionRow) -> MatchScore {
    MatchScore::new(row.home_score as u32, row.away_score as u32)
}

/// Assigns points to every prediction on one finalized match. Tries the
/// stored procedure first and falls back to per-record updates, which
/// tolerate individual write failures and report them.
pub async fn recompute_match(
    pool: &PgPool,
    match_id: i64,
    result: MatchScore,
) -> Result<RecomputeReport, String> {
    match recompute_match_rpc(pool, match_id, result).await {
        Ok(report) => Ok(report),
        Err(e) => {
            warn!(
                "recalculate_match_points unavailable for match {}, using per-record fallback: {}",
                match_id, e
            );
            recompute_match_manual(pool, match_id, result).await
        }
    }
}

async fn recompute_match_rpc(
    pool: &PgPool,
    match_id: i64,
    result: MatchScore,
) -> Result<RecomputeReport, sqlx::Error> {
    let updated: i32 = sqlx::query_scalar("SELECT recalculate_match_points($1, $2, $3)")
        .bind(match_id)
        .bind(result.home as i32)
        .bind(result.away as i32)
        .fetch_one(pool)
        .await?;

    let mut report = RecomputeReport::new();
    report.record_match();
    report.predictions_updated = updated.max(0) as u32;
    Ok(report)
}

pub async fn recompute_match_manual(
    pool: &PgPool,
    match_id: i64,
    result: MatchScore,
) -> Result<RecomputeReport, String> {
    let predictions = sqlx::query_as::<_, PredictionRow>(
        "SELECT user_id, match_id, home_score, away_score, points
         FROM predictions WHERE match_id = $1",
    )
    .bind(match_id)
    .fetch_all(pool)
    .await
    .map_err(|e| format!("failed to fetch predictions for match {}: {}", match_id, e))?;

    let mut report = RecomputeReport::new();
    report.record_match();

    for prediction in predictions {
        let points = score_prediction(forecast_of(&prediction), result);
        let write =
            sqlx::query("UPDATE predictions SET points = $1 WHERE user_id = $2 AND match_id = $3")
                .bind(points)
                .bind(prediction.user_id)
                .bind(prediction.match_id)
                .execute(pool)
                .await;
        match write {
            Ok(_) => report.record_update(),
            Err(e) => {
                warn!(
                    "failed to store points for user {} on match {}: {}",
                    prediction.user_id, prediction.match_id, e
                );
                report.record_failure(prediction.user_id, prediction.match_id, e.to_string());
            }
        }
    }

    Ok(report)
}

/// Rebuilds every point value from scratch: reset all, then recompute per
/// finalized match, so predictions on pending matches end unset rather
/// than stale. Idempotent. When the reset procedure is absent the whole
/// rebuild runs inside one transaction instead.
pub async fn recompute_all(pool: &PgPool) -> Result<RecomputeReport, String> {
    let reset: Result<i32, sqlx::Error> = sqlx::query_scalar("SELECT reset_all_prediction_points()")
        .fetch_one(pool)
        .await;

    if let Err(e) = reset {
        warn!(
            "reset_all_prediction_points unavailable, rebuilding transactionally: {}",
            e
        );
        return recompute_all_manual(pool).await;
    }

    let matches = finalized_matches(pool).await?;

    let mut report = RecomputeReport::new();
    for (match_id, result) in matches {
        let partial = recompute_match(pool, match_id, result).await?;
        report.merge(partial);
    }

    info!(
        "system-wide recomputation finished: {} matches, {} predictions, {} failures",
        report.matches_processed,
        report.predictions_updated,
        report.failures.len()
    );
    Ok(report)
}

/// All-or-nothing rebuild: a failure rolls back, so standings never show a
/// half-updated recomputation.
pub async fn recompute_all_manual(pool: &PgPool) -> Result<RecomputeReport, String> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| format!("failed to start transaction: {}", e))?;

    sqlx::query("UPDATE predictions SET points = NULL")
        .execute(&mut *tx)
        .await
        .map_err(|e| format!("failed to reset prediction points: {}", e))?;

    let matches = sqlx::query_as::<_, (i64, i32, i32)>(
        "SELECT id, home_score, away_score FROM matches
         WHERE home_score IS NOT NULL AND away_score IS NOT NULL",
    )
    .fetch_all(&mut *tx)
    .await
    .map_err(|e| format!("failed to list finalized matches: {}", e))?;

    let mut report = RecomputeReport::new();
    for (match_id, home, away) in matches {
        let result = MatchScore::new(home.max(0) as u32, away.max(0) as u32);
        let predictions = sqlx::query_as::<_, PredictionRow>(
            "SELECT user_id, match_id, home_score, away_score, points
             FROM predictions WHERE match_id = $1",
        )
        .bind(match_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| format!("failed to fetch predictions for match {}: {}", match_id, e))?;

        report.record_match();
        for prediction in predictions {
            let points = score_prediction(forecast_of(&prediction), result);
            sqlx::query("UPDATE predictions SET points = $1 WHERE user_id = $2 AND match_id = $3")
                .bind(points)
                .bind(prediction.user_id)
                .bind(prediction.match_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    format!(
                        "failed to store points for user {} on match {}: {}",
                        prediction.user_id, prediction.match_id, e
                    )
                })?;
            report.record_update();
        }
    }

    tx.commit()
        .await
        .map_err(|e| format!("failed to commit recomputation: {}", e))?;
    Ok(report)
}

/// Recomputes points for one league's members across finalized matches.
/// Best-effort per record, like the per-match path.
pub async fn recompute_league(pool: &PgPool, league_id: i64) -> Result<RecomputeReport, String> {
    let rows = sqlx::query_as::<_, ScoredPredictionRow>(
        "SELECT p.user_id, p.match_id, p.home_score, p.away_score,
                m.home_score AS result_home, m.away_score AS result_away
         FROM predictions p
         JOIN matches m ON m.id = p.match_id
         JOIN league_members lm ON lm.user_id = p.user_id
         WHERE lm.league_id = $1
           AND m.home_score IS NOT NULL AND m.away_score IS NOT NULL",
    )
    .bind(league_id)
    .fetch_all(pool)
    .await
    .map_err(|e| format!("failed to fetch predictions for league {}: {}", league_id, e))?;

    let mut report = RecomputeReport::new();
    let mut seen_matches = HashSet::new();

    for row in rows {
        if seen_matches.insert(row.match_id) {
            report.record_match();
        }
        let forecast = MatchScore::new(row.home_score as u32, row.away_score as u32);
        let result = MatchScore::new(row.result_home.max(0) as u32, row.result_away.max(0) as u32);
        let points = score_prediction(forecast, result);
        let write =
            sqlx::query("UPDATE predictions SET points = $1 WHERE user_id = $2 AND match_id = $3")
                .bind(points)
                .bind(row.user_id)
                .bind(row.match_id)
                .execute(pool)
                .await;
        match write {
            Ok(_) => report.record_update(),
            Err(e) => {
                warn!(
                    "failed to store points for user {} on match {}: {}",
                    row.user_id, row.match_id, e
                );
                report.record_failure(row.user_id, row.match_id, e.to_string());
            }
        }
    }

    Ok(report)
}

async fn finalized_matches(pool: &PgPool) -> Result<Vec<(i64, MatchScore)>, String> {
    let rows = sqlx::query_as::<_, (i64, i32, i32)>(
        "SELECT id, home_score, away_score FROM matches
         WHERE home_score IS NOT NULL AND away_score IS NOT NULL",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| format!("failed to list finalized matches: {}", e))?;

    Ok(rows
        .into_iter()
        .map(|(id, home, away)| (id, MatchScore::new(home.max(0) as u32, away.max(0) as u32)))
        .collect())
}
