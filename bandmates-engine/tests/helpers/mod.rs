//! Test helpers for bandmates-engine integration tests
//!
//! Provides cohort builders:
//! - `profile`: one hand-written profile
//! - `random_cohort`: reproducible varied cohort from a seed
//! - `survey_records`: raw records as the CLI would read them

#![allow(dead_code)]

use bandmates_engine::{ListeningStyle, RawRecord, RespondentProfile};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;

pub const GENRES: [&str; 8] = ["Pop", "Rock", "Jazz", "Hip Hop", "Classical", "Electronic", "Indie", "Country"];
pub const ARTISTS: [&str; 8] = ["Adele", "Drake", "SZA", "Coldplay", "Miles Davis", "Daft Punk", "Taylor Swift", "Radiohead"];
pub const MAJORS: [&str; 4] = ["Biology", "Computer Science", "History", "Music"];

pub fn profile(id: &str, vector: [f64; 6], genres: &[&str], artists: &[&str]) -> RespondentProfile {
    RespondentProfile {
        id: id.to_string(),
        name: format!("Student {}", id),
        email: format!("{}@example.edu", id),
        major: "Undeclared".to_string(),
        year: "Unknown".to_string(),
        preference_vector: vector,
        top_genres: genres.iter().map(|s| s.to_string()).collect(),
        top_artists: artists.iter().map(|s| s.to_string()).collect(),
        listening_style: ListeningStyle::derive(&vector),
    }
}

/// `count` varied profiles, identical for the same seed
pub fn random_cohort(count: usize, seed: u64) -> Vec<RespondentProfile> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let mut vector = [0.0; 6];
            for value in vector.iter_mut() {
                *value = rng.gen_range(0.0..=1.0);
            }
            let genre_count = rng.gen_range(1..=3);
            let genres: Vec<&str> = GENRES.choose_multiple(&mut rng, genre_count).copied().collect();
            let artist_count = rng.gen_range(0..=3);
            let artists: Vec<&str> = ARTISTS.choose_multiple(&mut rng, artist_count).copied().collect();

            let mut p = profile(&format!("s{:03}", i), vector, &genres, &artists);
            p.major = MAJORS[i % MAJORS.len()].to_string();
            p
        })
        .collect()
}

/// Raw survey rows in the shape a form export produces
pub fn survey_records(count: usize) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            let value = json!({
                "Name": format!("Student {}", i),
                "Email": format!("student{}@example.edu", i),
                "Major": MAJORS[i % MAJORS.len()],
                "Genres": format!("{}, {}", GENRES[i % GENRES.len()], GENRES[(i + 3) % GENRES.len()]),
                "Artists": ARTISTS[i % ARTISTS.len()],
                "energy": (i % 10) as f64 / 10.0,
                "valence": 0.5,
                "danceability": ((i * 3) % 10) as f64 / 10.0,
                "acousticness": 0.3,
                "tempo": 90 + (i % 5) * 20,
            });
            serde_json::from_value(value).unwrap()
        })
        .collect()
}
