//! # Bandmates Engine
//!
//! Music-survey compatibility scoring and group formation.
//!
//! **Pipeline:**
//! raw records → [`ProfileBuilder`] → [`CompatibilityMatrix`] →
//! [`FormationEngine`] → [`Group`]s → [`export::to_table`]
//!
//! Everything between records and groups is synchronous and infallible;
//! only loading records and exporting tables return [`Result`].

pub mod compatibility;
pub mod export;
pub mod formation;
pub mod naming;
pub mod profile;
pub mod records;
pub mod similarity;
pub mod stats;
pub mod summary;

pub use bandmates_common::{EngineParams, Error, Result, SeedBudget};
pub use compatibility::{pairwise_compatibility, CompatibilityMatrix, ScoredPair, WeightStats};
pub use formation::FormationEngine;
pub use naming::GroupNamer;
pub use profile::{ListeningStyle, ProfileBuilder, RespondentProfile};
pub use records::{load_records, RawRecord};
pub use stats::{CohortStats, MajorPreferences, Outlier};
pub use summary::{Group, GroupDynamics, GroupSummarizer, PlaylistTheme, Recommendations};

/// Build profiles, score them and form groups in one call
///
/// `seed` fixes the group-name random source; `None` draws from OS entropy.
pub fn form_groups(
    records: &[RawRecord],
    params: &EngineParams,
    target_size: usize,
    seed: Option<u64>,
) -> Vec<Group> {
    let profiles = ProfileBuilder::new().build_cohort(records);
    let matrix = CompatibilityMatrix::score(&profiles, params);

    let mut engine = match seed {
        Some(seed) => FormationEngine::seeded(params.clone(), seed),
        None => FormationEngine::new(params.clone()),
    };
    engine.form(&profiles, &matrix, target_size)
}
