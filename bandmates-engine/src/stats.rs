//! Cohort-wide statistics

use crate::profile::{rank_by_frequency, RespondentProfile, PREFERENCE_DIMENSIONS};
use crate::similarity::{centroid, euclidean};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Default |z| above which a value counts as an outlier
pub const OUTLIER_Z_THRESHOLD: f64 = 3.0;

/// Preference-vector dimension names, in vector order
pub const DIMENSION_NAMES: [&str; PREFERENCE_DIMENSIONS] = [
    "energy",
    "valence",
    "danceability",
    "acousticness",
    "tempo",
    "genre_diversity",
];

/// Mean preference vector of the respondents sharing one major
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MajorPreferences {
    pub major: String,
    pub respondents: usize,
    pub mean_vector: Vec<f64>,
}

/// One respondent whose value on a dimension lies far from the cohort mean
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlier {
    pub id: String,
    pub dimension: &'static str,
    pub value: f64,
    pub z_score: f64,
}

/// Aggregate view of a whole cohort
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortStats {
    pub respondents: usize,

    /// Genre → number of respondents listing it, most common first
    ///
    /// A respondent who lists a genre twice is counted once.
    pub genre_distribution: Vec<(String, usize)>,

    /// Major → number of respondents, most common first
    pub major_distribution: Vec<(String, usize)>,

    /// Mean preference vector per major, in `major_distribution` order
    pub major_preferences: Vec<MajorPreferences>,

    /// Per-dimension mean preference vector (empty for an empty cohort)
    pub mean_vector: Vec<f64>,

    /// Mean pairwise Euclidean distance scaled into [0, 1]
    ///
    /// The distance is divided by √6, the largest distance two vectors in
    /// the unit hypercube can have.
    pub taste_spread: f64,

    /// Outliers on every dimension at [`OUTLIER_Z_THRESHOLD`]
    pub outliers: Vec<Outlier>,
}

impl CohortStats {
    pub fn compute(profiles: &[RespondentProfile]) -> Self {
        let genre_mentions = profiles.iter().flat_map(|p| {
            let mut seen = HashSet::new();
            p.top_genres
                .iter()
                .map(String::as_str)
                .filter(move |g| seen.insert(*g))
        });
        let genre_distribution = rank_by_frequency(genre_mentions);
        let major_distribution = rank_by_frequency(profiles.iter().map(|p| p.major.as_str()));
        let major_preferences = major_preferences(profiles, &major_distribution);
        let mean_vector = centroid(profiles.iter().map(|p| &p.preference_vector[..]));

        let outliers = (0..PREFERENCE_DIMENSIONS)
            .flat_map(|dimension| Self::find_outliers(profiles, dimension, OUTLIER_Z_THRESHOLD))
            .collect();

        Self {
            respondents: profiles.len(),
            genre_distribution,
            major_distribution,
            major_preferences,
            mean_vector,
            taste_spread: taste_spread(profiles),
            outliers,
        }
    }

    /// Respondents whose value on `dimension` has |z| above `threshold`
    ///
    /// z uses the sample standard deviation. Fewer than two respondents, a
    /// constant dimension or an out-of-range dimension yield no outliers.
    pub fn find_outliers(profiles: &[RespondentProfile], dimension: usize, threshold: f64) -> Vec<Outlier> {
        if dimension >= PREFERENCE_DIMENSIONS || profiles.len() < 2 {
            return Vec::new();
        }

        let values: Vec<f64> = profiles.iter().map(|p| p.preference_vector[dimension]).collect();
        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0);
        let std_dev = variance.sqrt();
        if std_dev == 0.0 {
            return Vec::new();
        }

        profiles
            .iter()
            .zip(values)
            .filter_map(|(p, value)| {
                let z_score = (value - mean) / std_dev;
                (z_score.abs() > threshold).then(|| Outlier {
                    id: p.id.clone(),
                    dimension: DIMENSION_NAMES[dimension],
                    value,
                    z_score,
                })
            })
            .collect()
    }
}

fn major_preferences(
    profiles: &[RespondentProfile],
    major_distribution: &[(String, usize)],
) -> Vec<MajorPreferences> {
    let mut by_major: HashMap<&str, Vec<&[f64]>> = HashMap::new();
    for p in profiles {
        by_major
            .entry(p.major.as_str())
            .or_default()
            .push(&p.preference_vector[..]);
    }

    major_distribution
        .iter()
        .map(|(major, respondents)| MajorPreferences {
            major: major.clone(),
            respondents: *respondents,
            mean_vector: by_major
                .get(major.as_str())
                .map(|vectors| centroid(vectors.iter().copied()))
                .unwrap_or_default(),
        })
        .collect()
}

fn taste_spread(profiles: &[RespondentProfile]) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in profiles.iter().enumerate() {
        for b in &profiles[i + 1..] {
            total += euclidean(&a.preference_vector, &b.preference_vector);
            pairs += 1;
        }
    }
    if pairs == 0 {
        return 0.0;
    }

    let max_distance = (PREFERENCE_DIMENSIONS as f64).sqrt();
    (total / pairs as f64 / max_distance).min(1.0)
}
