//! Criterion benches for the search hot path.
//!
//! - expand: children of a root and of a mid-board state.
//! - search: one full run per reuse policy, fixed and random start rows.
//! - batch: a small parallel batch.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use trackbot::batch::run_batch;
use trackbot::search::{expand, ReusePolicy, SearchCfg, StartRows, State, StateId, TrackBot};

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand");
    let cfg = SearchCfg::default().with_supplies([4, 2, 6]);
    let bot = TrackBot::new(cfg.clone()).unwrap();
    let root = State::root(4, cfg.waypoints().len());
    group.bench_function(BenchmarkId::new("root", "supplies"), |b| {
        b.iter(|| expand(StateId(0), &root, bot.tracks(), &cfg).count())
    });
    let mut mid = State::root(4, cfg.waypoints().len());
    mid.x = 12;
    mid.pieces = 5;
    mid.recent = vec![1, 4];
    mid.passed = vec![true, false, false];
    group.bench_function(BenchmarkId::new("mid_board", "supplies"), |b| {
        b.iter(|| expand(StateId(0), &mid, bot.tracks(), &cfg).count())
    });
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(20);
    let cases = [
        ("sliding_window_3", SearchCfg::default()),
        (
            "single_recent_after_4",
            SearchCfg {
                reuse_policy: ReusePolicy::SingleRecentAfter { pieces: 4 },
                ..SearchCfg::default()
            },
        ),
        ("resupply_5", SearchCfg::default().with_supplies([4, 4, 4])),
        (
            "all_rows",
            SearchCfg {
                start_rows: StartRows::All,
                ..SearchCfg::default()
            },
        ),
    ];
    for (name, cfg) in cases {
        let bot = TrackBot::new(cfg).unwrap();
        group.bench_with_input(BenchmarkId::new("search", name), &bot, |b, bot| {
            let mut seeds = StdRng::seed_from_u64(2024);
            b.iter_batched(
                || seeds.gen::<u64>(),
                |seed| {
                    let _ = bot.search(seed);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(10);
    let bot = TrackBot::new(SearchCfg::default()).unwrap();
    for runs in [4usize, 16] {
        group.bench_with_input(BenchmarkId::new("run_batch", runs), &runs, |b, &runs| {
            b.iter(|| run_batch(&bot, runs, 7).successes())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_expand, bench_search, bench_batch);
criterion_main!(benches);
