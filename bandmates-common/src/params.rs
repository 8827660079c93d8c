//! Engine tuning parameters
//!
//! All weighting constants and thresholds used by compatibility scoring and
//! group formation live in a single `EngineParams` struct. The defaults are
//! empirical tuning values; they are reproduced exactly and only change when
//! a configuration file overrides them.
//!
//! # Usage
//!
//! ```rust
//! use bandmates_common::EngineParams;
//!
//! let params = EngineParams::default();
//! assert_eq!(params.music_weight, 0.5);
//! params.validate().unwrap();
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// How many top-compatibility pairs the seeding phase may turn into groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedBudget {
    /// Seed every disjoint pair the sorted pair list yields
    #[default]
    AllDisjointPairs,

    /// Stop after `ceil(n / target_size)` seeds so growth has candidates left
    PerTargetSize,
}

impl SeedBudget {
    /// Maximum number of seed groups for a cohort of `profile_count`
    pub fn max_seeds(&self, profile_count: usize, target_size: usize) -> usize {
        match self {
            SeedBudget::AllDisjointPairs => profile_count / 2,
            SeedBudget::PerTargetSize => {
                let target = target_size.max(1);
                profile_count.div_ceil(target)
            }
        }
    }
}

/// Tuning parameters for the compatibility and formation stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// Weight of preference-vector cosine similarity in pairwise compatibility
    ///
    /// Default: 0.5
    pub music_weight: f64,

    /// Weight of genre-set Jaccard similarity in pairwise compatibility
    ///
    /// Default: 0.3
    pub genre_weight: f64,

    /// Weight of artist overlap in pairwise compatibility
    ///
    /// Default: 0.2
    pub artist_weight: f64,

    /// Growth score weight: average compatibility with current members
    ///
    /// Default: 0.6
    pub growth_compat_weight: f64,

    /// Growth score weight: cosine similarity to the group centroid
    ///
    /// Default: 0.25
    pub growth_centroid_weight: f64,

    /// Growth score weight: genre overlap with the group's genre union
    ///
    /// Default: 0.15
    pub growth_genre_weight: f64,

    /// Multiplier on the cohort standard deviation in the acceptance threshold
    ///
    /// threshold = mean + factor × std (before relaxation)
    /// Default: 0.25
    pub threshold_std_factor: f64,

    /// Threshold relaxation per member beyond the second
    ///
    /// Default: 0.08
    pub threshold_relaxation: f64,

    /// Lowest value the relaxed acceptance threshold may reach
    ///
    /// Default: 0.2
    pub threshold_floor: f64,

    /// Seeding budget, see [`SeedBudget`]
    ///
    /// Default: `all_disjoint_pairs`
    pub seed_budget: SeedBudget,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            music_weight: 0.5,
            genre_weight: 0.3,
            artist_weight: 0.2,
            growth_compat_weight: 0.6,
            growth_centroid_weight: 0.25,
            growth_genre_weight: 0.15,
            threshold_std_factor: 0.25,
            threshold_relaxation: 0.08,
            threshold_floor: 0.2,
            seed_budget: SeedBudget::AllDisjointPairs,
        }
    }
}

impl EngineParams {
    /// Reject negative or non-finite tuning values
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("music_weight", self.music_weight),
            ("genre_weight", self.genre_weight),
            ("artist_weight", self.artist_weight),
            ("growth_compat_weight", self.growth_compat_weight),
            ("growth_centroid_weight", self.growth_centroid_weight),
            ("growth_genre_weight", self.growth_genre_weight),
            ("threshold_std_factor", self.threshold_std_factor),
            ("threshold_relaxation", self.threshold_relaxation),
            ("threshold_floor", self.threshold_floor),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// Acceptance threshold for a group currently holding `current_size` members
    ///
    /// `max(floor, (mean + factor × std) - relaxation × max(0, size - 2))`
    pub fn acceptance_threshold(&self, mean: f64, std_dev: f64, current_size: usize) -> f64 {
        let relaxed_steps = current_size.saturating_sub(2) as f64;
        let base = mean + self.threshold_std_factor * std_dev;
        (base - self.threshold_relaxation * relaxed_steps).max(self.threshold_floor)
    }
}
