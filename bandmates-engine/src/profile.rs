//! Feature Vector Builder
//!
//! Turns raw survey records into [`RespondentProfile`]s: a fixed six-dimension
//! preference vector plus genre, artist and listening-style labels.
//!
//! # Preference Vector
//! `[energy, valence, danceability, acousticness, tempo_normalized, genre_diversity]`
//!
//! - The four audio features are read as-is when inside [0, 1]; missing,
//!   unparseable or out-of-range values become 0.5.
//! - Tempo defaults to 120 BPM, is divided by 200 and clipped to [0, 1].
//! - Genre diversity is `min(1, genre_count / 10)`, or 0.3 when the
//!   respondent listed no genres at all.
//!
//! # Single Row vs. Aggregated Submissions
//! A single row counts *raw* genre tokens for diversity, while aggregation
//! over several submissions counts *distinct* genres.

use crate::records::RawRecord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Number of dimensions in a preference vector
pub const PREFERENCE_DIMENSIONS: usize = 6;

/// Fixed-length preference vector
pub type PreferenceVector = [f64; PREFERENCE_DIMENSIONS];

pub const ENERGY: usize = 0;
pub const VALENCE: usize = 1;
pub const DANCEABILITY: usize = 2;
pub const ACOUSTICNESS: usize = 3;
pub const TEMPO: usize = 4;
pub const GENRE_DIVERSITY: usize = 5;

/// Raw fields feeding the first four vector components, in vector order
const AUDIO_FIELDS: [&str; 4] = ["energy", "valence", "danceability", "acousticness"];

const DEFAULT_FEATURE: f64 = 0.5;
const DEFAULT_TEMPO_BPM: f64 = 120.0;
const TEMPO_SCALE_BPM: f64 = 200.0;
const DEFAULT_GENRE_DIVERSITY: f64 = 0.3;
const GENRE_DIVERSITY_SCALE: f64 = 10.0;

/// A feature above this value defines the listening style
pub const STYLE_THRESHOLD: f64 = 0.7;

/// Maximum number of genres kept when aggregating submissions
pub const TOP_GENRE_LIMIT: usize = 5;

pub const DEFAULT_MAJOR: &str = "Undeclared";
pub const DEFAULT_YEAR: &str = "Unknown";
pub const DEFAULT_GENRES: [&str; 2] = ["Pop", "Rock"];

/// Dominant listening style label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListeningStyle {
    HighEnergy,
    Upbeat,
    DanceFocused,
    Acoustic,
    Balanced,
}

impl ListeningStyle {
    /// First of energy → valence → danceability → acousticness above 0.7
    pub fn derive(vector: &PreferenceVector) -> Self {
        if vector[ENERGY] > STYLE_THRESHOLD {
            ListeningStyle::HighEnergy
        } else if vector[VALENCE] > STYLE_THRESHOLD {
            ListeningStyle::Upbeat
        } else if vector[DANCEABILITY] > STYLE_THRESHOLD {
            ListeningStyle::DanceFocused
        } else if vector[ACOUSTICNESS] > STYLE_THRESHOLD {
            ListeningStyle::Acoustic
        } else {
            ListeningStyle::Balanced
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListeningStyle::HighEnergy => "High Energy",
            ListeningStyle::Upbeat => "Upbeat",
            ListeningStyle::DanceFocused => "Dance-Focused",
            ListeningStyle::Acoustic => "Acoustic",
            ListeningStyle::Balanced => "Balanced",
        }
    }
}

impl fmt::Display for ListeningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One respondent, ready for scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondentProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub major: String,
    pub year: String,
    pub preference_vector: PreferenceVector,
    pub top_genres: Vec<String>,
    pub top_artists: Vec<String>,
    pub listening_style: ListeningStyle,
}

impl RespondentProfile {
    /// Distinct genres as a set
    pub fn genre_set(&self) -> HashSet<&str> {
        self.top_genres.iter().map(String::as_str).collect()
    }

    /// Distinct artists as a set
    pub fn artist_set(&self) -> HashSet<&str> {
        self.top_artists.iter().map(String::as_str).collect()
    }
}

/// Builds profiles from raw records
///
/// Never fails: every malformed input has a documented default.
#[derive(Debug, Default)]
pub struct ProfileBuilder;

impl ProfileBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a profile from a single survey row
    pub fn from_record(&self, record: &RawRecord) -> RespondentProfile {
        let mut vector = [0.0; PREFERENCE_DIMENSIONS];
        for (slot, field) in vector.iter_mut().zip(AUDIO_FIELDS) {
            *slot = read_feature(record, field);
        }
        vector[TEMPO] = normalize_tempo(read_tempo(record));

        let parsed_genres = record.list("genres");
        vector[GENRE_DIVERSITY] = if parsed_genres.is_empty() {
            DEFAULT_GENRE_DIVERSITY
        } else {
            // Raw token count, duplicates included
            genre_diversity(parsed_genres.len())
        };
        let top_genres = if parsed_genres.is_empty() {
            default_genres()
        } else {
            parsed_genres
        };

        let email = record.text("email").unwrap_or_default();
        RespondentProfile {
            id: profile_id(&email),
            name: record.text("name").unwrap_or_default(),
            email,
            major: record.text("major").unwrap_or_else(|| DEFAULT_MAJOR.to_string()),
            year: record.text("year").unwrap_or_else(|| DEFAULT_YEAR.to_string()),
            listening_style: ListeningStyle::derive(&vector),
            preference_vector: vector,
            top_genres,
            top_artists: dedup_preserving_order(record.list("favorite_artists")),
        }
    }

    /// Build one profile from several stored submissions by the same person
    ///
    /// Numeric fields are averaged after per-field default substitution;
    /// metadata comes from the most recent submission that supplies it.
    /// An empty slice yields the same profile as an empty record.
    pub fn from_submissions(&self, submissions: &[&RawRecord]) -> RespondentProfile {
        if submissions.len() <= 1 {
            let empty = RawRecord::default();
            return self.from_record(submissions.first().copied().unwrap_or(&empty));
        }

        let count = submissions.len() as f64;
        let mut vector = [0.0; PREFERENCE_DIMENSIONS];
        for (slot, field) in vector.iter_mut().zip(AUDIO_FIELDS) {
            *slot = submissions.iter().map(|r| read_feature(r, field)).sum::<f64>() / count;
        }
        let mean_tempo = submissions.iter().map(|r| read_tempo(r)).sum::<f64>() / count;
        vector[TEMPO] = normalize_tempo(mean_tempo);

        let all_genres: Vec<String> = submissions.iter().flat_map(|r| r.list("genres")).collect();
        let distinct = all_genres.iter().collect::<HashSet<_>>().len();
        let top_genres: Vec<String> = rank_by_frequency(all_genres.iter().map(String::as_str))
            .into_iter()
            .take(TOP_GENRE_LIMIT)
            .map(|(genre, _)| genre)
            .collect();

        vector[GENRE_DIVERSITY] = if distinct == 0 {
            DEFAULT_GENRE_DIVERSITY
        } else {
            genre_diversity(distinct)
        };

        let latest = |key: &str| submissions.iter().rev().find_map(|r| r.text(key));
        let email = latest("email").unwrap_or_default();

        debug!(
            email = %email,
            submissions = submissions.len(),
            distinct_genres = distinct,
            "Aggregated submissions into one profile"
        );

        RespondentProfile {
            id: profile_id(&email),
            name: latest("name").unwrap_or_default(),
            email,
            major: latest("major").unwrap_or_else(|| DEFAULT_MAJOR.to_string()),
            year: latest("year").unwrap_or_else(|| DEFAULT_YEAR.to_string()),
            listening_style: ListeningStyle::derive(&vector),
            preference_vector: vector,
            top_genres: if top_genres.is_empty() {
                default_genres()
            } else {
                top_genres
            },
            top_artists: dedup_preserving_order(
                submissions.iter().flat_map(|r| r.list("favorite_artists")).collect(),
            ),
        }
    }

    /// Build one profile per respondent from a flat record list
    ///
    /// Records sharing an email (case-insensitive) are aggregated; records
    /// without an email each stand alone. Output follows first-seen order.
    /// Unnamed respondents become `"Anonymous {n}"`.
    pub fn build_cohort(&self, records: &[RawRecord]) -> Vec<RespondentProfile> {
        let mut buckets: Vec<Vec<&RawRecord>> = Vec::new();
        let mut by_email: HashMap<String, usize> = HashMap::new();

        for record in records {
            match record.text("email").map(|e| e.to_lowercase()) {
                Some(email) => {
                    if let Some(&slot) = by_email.get(&email) {
                        buckets[slot].push(record);
                    } else {
                        by_email.insert(email, buckets.len());
                        buckets.push(vec![record]);
                    }
                }
                None => buckets.push(vec![record]),
            }
        }

        let profiles: Vec<RespondentProfile> = buckets
            .iter()
            .enumerate()
            .map(|(index, bucket)| {
                let mut profile = self.from_submissions(bucket);
                if profile.name.is_empty() {
                    profile.name = format!("Anonymous {}", index + 1);
                }
                profile
            })
            .collect();

        debug!(
            records = records.len(),
            respondents = profiles.len(),
            "Built cohort profiles"
        );
        profiles
    }
}

/// Count occurrences, ordered by count descending then first appearance
pub fn rank_by_frequency<'a, I>(items: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, item) in items.into_iter().enumerate() {
        counts.entry(item).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0).then(a.1 .1.cmp(&b.1 .1)));
    ranked
        .into_iter()
        .map(|(item, (count, _))| (item.to_string(), count))
        .collect()
}

fn read_feature(record: &RawRecord, field: &str) -> f64 {
    record
        .number(field)
        .filter(|v| (0.0..=1.0).contains(v))
        .unwrap_or(DEFAULT_FEATURE)
}

fn read_tempo(record: &RawRecord) -> f64 {
    record
        .number("tempo")
        .filter(|bpm| *bpm >= 0.0)
        .unwrap_or(DEFAULT_TEMPO_BPM)
}

fn normalize_tempo(bpm: f64) -> f64 {
    (bpm / TEMPO_SCALE_BPM).clamp(0.0, 1.0)
}

fn genre_diversity(genre_count: usize) -> f64 {
    (genre_count as f64 / GENRE_DIVERSITY_SCALE).min(1.0)
}

fn default_genres() -> Vec<String> {
    DEFAULT_GENRES.iter().map(|g| g.to_string()).collect()
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn profile_id(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    if normalized.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        normalized
    }
}
