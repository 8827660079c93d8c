//! Group Formation Performance Benchmark
//!
//! Measures the two dominant stages at cohort scale.
//!
//! **Scale:** 200 respondents (low hundreds expected in practice)
//! **Stages:** O(n²) pairwise scoring, then formation + summarizing

use bandmates_engine::{
    CompatibilityMatrix, EngineParams, FormationEngine, ListeningStyle, RespondentProfile,
    SeedBudget,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const GENRES: [&str; 10] = [
    "Pop", "Rock", "Jazz", "Hip Hop", "Classical", "Electronic", "Indie", "Country", "Folk", "R&B",
];
const ARTISTS: [&str; 10] = [
    "Adele", "Drake", "SZA", "Coldplay", "Miles Davis", "Daft Punk", "Taylor Swift", "Radiohead",
    "Bad Bunny", "Mitski",
];

fn cohort(count: usize) -> Vec<RespondentProfile> {
    let mut rng = StdRng::seed_from_u64(200);
    (0..count)
        .map(|i| {
            let mut vector = [0.0; 6];
            for value in vector.iter_mut() {
                *value = rng.gen_range(0.0..=1.0);
            }
            RespondentProfile {
                id: format!("student{}@example.edu", i),
                name: format!("Student {}", i),
                email: format!("student{}@example.edu", i),
                major: "Undeclared".to_string(),
                year: "Unknown".to_string(),
                preference_vector: vector,
                top_genres: GENRES.choose_multiple(&mut rng, 3).map(|s| s.to_string()).collect(),
                top_artists: ARTISTS.choose_multiple(&mut rng, 2).map(|s| s.to_string()).collect(),
                listening_style: ListeningStyle::derive(&vector),
            }
        })
        .collect()
}

fn bench_scoring(c: &mut Criterion) {
    let profiles = cohort(200);
    let params = EngineParams::default();

    c.bench_function("score_200", |b| {
        b.iter(|| black_box(CompatibilityMatrix::score(black_box(&profiles), &params)));
    });
}

fn bench_formation(c: &mut Criterion) {
    let mut group = c.benchmark_group("formation");
    let profiles = cohort(200);

    let budgets = [
        ("all_disjoint_pairs", SeedBudget::AllDisjointPairs),
        ("per_target_size", SeedBudget::PerTargetSize),
    ];

    for (name, seed_budget) in budgets {
        let params = EngineParams {
            seed_budget,
            ..EngineParams::default()
        };
        let matrix = CompatibilityMatrix::score(&profiles, &params);
        let mut engine = FormationEngine::seeded(params, 1);

        group.bench_function(BenchmarkId::new("form_200", name), |b| {
            b.iter(|| black_box(engine.form(black_box(&profiles), &matrix, 4)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scoring, bench_formation);
criterion_main!(benches);
