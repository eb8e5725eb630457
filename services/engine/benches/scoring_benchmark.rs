use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use engine::leaderboard::StandingsBuilder;
use engine::scoring::{score_prediction, MatchScore};

fn generate_pairs(count: usize) -> Vec<(MatchScore, MatchScore)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            (
                MatchScore::new(rng.gen_range(0..8), rng.gen_range(0..8)),
                MatchScore::new(rng.gen_range(0..8), rng.gen_range(0..8)),
            )
        })
        .collect()
}

fn bench_score_prediction(c: &mut Criterion) {
    let pairs = generate_pairs(10_000);
    let mut group = c.benchmark_group("score_prediction");
    group.throughput(Throughput::Elements(pairs.len() as u64));
    group.bench_function("batch_10k", |b| {
        b.iter(|| {
            for (predicted, actual) in &pairs {
                black_box(score_prediction(*predicted, *actual));
            }
        })
    });
    group.finish();
}

fn bench_standings(c: &mut Criterion) {
    let mut group = c.benchmark_group("standings");
    for user_count in [100u64, 1_000, 10_000] {
        let pairs = generate_pairs(user_count as usize * 10);
        group.throughput(Throughput::Elements(pairs.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(user_count),
            &user_count,
            |b, &user_count| {
                b.iter(|| {
                    let mut builder = StandingsBuilder::new();
                    for (i, (predicted, actual)) in pairs.iter().enumerate() {
                        let user_id = (i as u64 % user_count) as i64;
                        let username = format!("user_{}", user_id);
                        builder.add(
                            user_id,
                            &username,
                            Some(score_prediction(*predicted, *actual)),
                        );
                    }
                    black_box(builder.into_ranked())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_score_prediction, bench_standings);
criterion_main!(benches);
