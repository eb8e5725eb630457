use engine::leaderboard::StandingsBuilder;
use engine::scoring::{score_prediction, MatchScore};

struct Prediction {
    user_id: i64,
    username: &'static str,
    match_id: i64,
    forecast: MatchScore,
    points: Option<i32>,
}

fn fixtures() -> (Vec<Prediction>, Vec<(i64, Option<MatchScore>)>) {
    let predictions = vec![
        Prediction {
            user_id: 1,
            username: "ada",
            match_id: 10,
            forecast: MatchScore::new(2, 1),
            points: None,
        },
        Prediction {
            user_id: 1,
            username: "ada",
            match_id: 11,
            forecast: MatchScore::new(0, 0),
            points: None,
        },
        Prediction {
            user_id: 2,
            username: "bob",
            match_id: 10,
            forecast: MatchScore::new(3, 1),
            points: None,
        },
        Prediction {
            user_id: 2,
            username: "bob",
            match_id: 12,
            forecast: MatchScore::new(1, 2),
            points: None,
        },
    ];
    // match 12 has no result yet
    let matches = vec![
        (10, Some(MatchScore::new(2, 1))),
        (11, Some(MatchScore::new(1, 1))),
        (12, None),
    ];
    (predictions, matches)
}

fn recompute(predictions: &mut [Prediction], matches: &[(i64, Option<MatchScore>)]) {
    for prediction in predictions.iter_mut() {
        prediction.points = None;
    }
    for (match_id, result) in matches {
        let Some(result) = result else { continue };
        for prediction in predictions.iter_mut().filter(|p| p.match_id == *match_id) {
            prediction.points = Some(score_prediction(prediction.forecast, *result));
        }
    }
}

fn standings(predictions: &[Prediction]) -> Vec<engine::leaderboard::LeaderboardEntry> {
    let mut builder = StandingsBuilder::new();
    for p in predictions {
        builder.add(p.user_id, p.username, p.points);
    }
    builder.into_ranked()
}

#[test]
fn recompute_scores_only_finalized_matches() {
    let (mut predictions, matches) = fixtures();
    recompute(&mut predictions, &matches);

    assert_eq!(predictions[0].points, Some(3));
    assert_eq!(predictions[1].points, Some(1));
    assert_eq!(predictions[2].points, Some(1));
    assert_eq!(predictions[3].points, None);
}

#[test]
fn recompute_is_idempotent() {
    let (mut predictions, matches) = fixtures();
    recompute(&mut predictions, &matches);
    let first: Vec<Option<i32>> = predictions.iter().map(|p| p.points).collect();

    recompute(&mut predictions, &matches);
    let second: Vec<Option<i32>> = predictions.iter().map(|p| p.points).collect();
    assert_eq!(first, second);
}

#[test]
fn recompute_clears_stale_points_when_a_result_is_withdrawn() {
    let (mut predictions, mut matches) = fixtures();
    recompute(&mut predictions, &matches);
    assert_eq!(predictions[1].points, Some(1));

    matches[1].1 = None;
    recompute(&mut predictions, &matches);
    assert_eq!(predictions[1].points, None);
}

#[test]
fn standings_reflect_recomputed_points() {
    let (mut predictions, matches) = fixtures();
    recompute(&mut predictions, &matches);

    let table = standings(&predictions);
    assert_eq!(table.len(), 2);
    assert_eq!(table[0].username, "ada");
    assert_eq!(table[0].total_points, 4);
    assert_eq!(table[0].exact_count, 1);
    assert_eq!(table[1].username, "bob");
    assert_eq!(table[1].total_points, 1);
    assert_eq!(table[1].outcome_count, 1);
}
