//! Pairwise Compatibility Calculator
//!
//! Scores every unordered pair of respondents and stores the result in a
//! dense symmetric matrix. The matrix is owned by the caller of
//! [`CompatibilityMatrix::score`] and borrowed by the formation engine and
//! the summarizer; profiles themselves are never mutated.
//!
//! # Scoring
//! ```text
//! compatibility = 0.5 × cosine(vector_a, vector_b)
//!               + 0.3 × jaccard(genres_a, genres_b)
//!               + 0.2 × |artists_a ∩ artists_b| / max(|artists_a|, |artists_b|)
//! ```
//! Weights come from [`EngineParams`]. The result is clamped to [0, 1].

use crate::profile::RespondentProfile;
use crate::similarity::{cosine, jaccard, overlap_of_larger};
use bandmates_common::EngineParams;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// One unordered pair with its compatibility weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredPair {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

/// Mean and population standard deviation of all pair weights
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeightStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Symmetric compatibility scores for one cohort
#[derive(Debug, Clone)]
pub struct CompatibilityMatrix {
    ids: Vec<String>,
    positions: HashMap<String, usize>,
    weights: Vec<f64>,
}

/// Compatibility between two profiles under the given weights
pub fn pairwise_compatibility(
    a: &RespondentProfile,
    b: &RespondentProfile,
    params: &EngineParams,
) -> f64 {
    let music = cosine(&a.preference_vector, &b.preference_vector);
    let genre = jaccard(&a.genre_set(), &b.genre_set());
    let artist = overlap_of_larger(&a.artist_set(), &b.artist_set());

    let score = params.music_weight * music + params.genre_weight * genre + params.artist_weight * artist;
    score.clamp(0.0, 1.0)
}

impl CompatibilityMatrix {
    /// Score every pair of `profiles`
    ///
    /// O(n²) in the cohort size.
    pub fn score(profiles: &[RespondentProfile], params: &EngineParams) -> Self {
        let n = profiles.len();
        let mut matrix = Self {
            ids: profiles.iter().map(|p| p.id.clone()).collect(),
            positions: profiles
                .iter()
                .enumerate()
                .map(|(i, p)| (p.id.clone(), i))
                .collect(),
            weights: vec![0.0; n * n],
        };

        for i in 0..n {
            for j in (i + 1)..n {
                let weight = pairwise_compatibility(&profiles[i], &profiles[j], params);
                matrix.set(i, j, weight);
            }
        }

        debug!(profiles = n, pairs = n * n.saturating_sub(1) / 2, "Scored pairwise compatibility");
        matrix
    }

    /// Store a weight under both orientations
    fn set(&mut self, i: usize, j: usize, weight: f64) {
        let n = self.ids.len();
        self.weights[i * n + j] = weight;
        self.weights[j * n + i] = weight;
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Weight between two cohort positions (0.0 on the diagonal)
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 0.0;
        }
        self.weights[i * self.ids.len() + j]
    }

    /// Cohort position of a profile id
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Weight between two profile ids
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.get(self.position(a)?, self.position(b)?))
    }

    /// Compatibility map for one profile: other id → score
    pub fn scores_for(&self, id: &str) -> Option<HashMap<String, f64>> {
        let i = self.position(id)?;
        Some(
            (0..self.len())
                .filter(|&j| j != i)
                .map(|j| (self.ids[j].clone(), self.get(i, j)))
                .collect(),
        )
    }

    /// All unordered pairs in (a, b) index order with a < b
    pub fn pairs(&self) -> Vec<ScoredPair> {
        let n = self.len();
        let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for a in 0..n {
            for b in (a + 1)..n {
                pairs.push(ScoredPair {
                    a,
                    b,
                    weight: self.get(a, b),
                });
            }
        }
        pairs
    }

    /// Pairs sorted by weight descending; equal weights keep index order
    pub fn ranked_pairs(&self) -> Vec<ScoredPair> {
        let mut pairs = self.pairs();
        pairs.sort_by(|x, y| y.weight.partial_cmp(&x.weight).unwrap_or(Ordering::Equal));
        pairs
    }

    /// Mean and population standard deviation over every pair
    pub fn weight_stats(&self) -> WeightStats {
        let pairs = self.pairs();
        if pairs.is_empty() {
            return WeightStats::default();
        }

        let count = pairs.len() as f64;
        let mean = pairs.iter().map(|p| p.weight).sum::<f64>() / count;
        let variance = pairs.iter().map(|p| (p.weight - mean).powi(2)).sum::<f64>() / count;

        WeightStats {
            mean,
            std_dev: variance.sqrt(),
        }
    }

    /// Average weight from `index` to every other respondent
    pub fn average_for(&self, index: usize) -> f64 {
        let others = self.len().saturating_sub(1);
        if others == 0 {
            return 0.0;
        }
        (0..self.len()).map(|j| self.get(index, j)).sum::<f64>() / others as f64
    }

    /// Average weight from `index` to each of `members` (0.0 for no members)
    pub fn average_to(&self, index: usize, members: &[usize]) -> f64 {
        if members.is_empty() {
            return 0.0;
        }
        members.iter().map(|&m| self.get(index, m)).sum::<f64>() / members.len() as f64
    }

    /// Mean weight over all pairs within `members` (0.0 below two members)
    pub fn mean_within(&self, members: &[usize]) -> f64 {
        let mut total = 0.0;
        let mut count = 0usize;
        for (k, &a) in members.iter().enumerate() {
            for &b in &members[k + 1..] {
                total += self.get(a, b);
                count += 1;
            }
        }
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }

    /// Most compatible other respondents ("music twins")
    ///
    /// Returns up to `top_k` respondents scoring at least `min_similarity`,
    /// best first. When nobody reaches the threshold, the best `top_k` of
    /// everyone else are returned instead.
    pub fn find_twins(&self, index: usize, top_k: usize, min_similarity: f64) -> Vec<(usize, f64)> {
        if index >= self.len() {
            return Vec::new();
        }

        let others: Vec<(usize, f64)> = (0..self.len())
            .filter(|&j| j != index)
            .map(|j| (j, self.get(index, j)))
            .collect();

        let mut candidates: Vec<(usize, f64)> = others
            .iter()
            .copied()
            .filter(|(_, score)| *score >= min_similarity)
            .collect();
        if candidates.is_empty() {
            candidates = others;
        }

        candidates.sort_by(|x, y| y.1.partial_cmp(&x.1).unwrap_or(Ordering::Equal));
        candidates.truncate(top_k);
        candidates
    }
}
