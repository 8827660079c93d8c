//! Group Formation Engine
//!
//! Partitions a cohort into groups near a target size. Membership is decided
//! on plain index lists first; each finished list is then summarized exactly
//! once, so no group ever carries derived fields from a partial member set.
//!
//! # Phases
//! 1. **Statistics**: mean and population std of every pair weight
//! 2. **Seeding**: disjoint top-weight pairs become 2-member groups
//! 3. **Fallback**: no seed → 1-member group from the best-connected profile
//! 4. **Growth**: add the best blended candidate while it passes the
//!    acceptance threshold, up to the target size
//! 5. **Leftover pairing**: remaining disjoint pairs by global rank
//! 6. **Absorption**: any profile still unplaced joins the group it is most
//!    compatible with (this may push a group past the target size)
//!
//! Phases 1-6 are deterministic for a given input order. Only group names
//! draw on the namer's random source.

use crate::compatibility::{CompatibilityMatrix, WeightStats};
use crate::naming::GroupNamer;
use crate::profile::RespondentProfile;
use crate::similarity::{centroid, cosine, jaccard};
use crate::summary::{Group, GroupSummarizer};
use bandmates_common::EngineParams;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Forms and summarizes groups for one cohort at a time
///
/// Holds no state between [`form`](Self::form) calls apart from the name
/// generator's random source.
pub struct FormationEngine<R: Rng> {
    params: EngineParams,
    summarizer: GroupSummarizer<R>,
}

impl FormationEngine<StdRng> {
    /// Engine whose group names come from OS entropy
    pub fn new(params: EngineParams) -> Self {
        Self::with_namer(params, GroupNamer::from_entropy())
    }

    /// Engine with reproducible group names
    pub fn seeded(params: EngineParams, seed: u64) -> Self {
        Self::with_namer(params, GroupNamer::seeded(seed))
    }
}

impl<R: Rng> FormationEngine<R> {
    pub fn with_namer(params: EngineParams, namer: GroupNamer<R>) -> Self {
        Self {
            params,
            summarizer: GroupSummarizer::new(namer),
        }
    }

    /// Form finished groups
    ///
    /// `matrix` must have been scored from `profiles` in the same order.
    /// `target_size` is expected to be clamped by the caller; it is not
    /// validated here. An empty cohort yields no groups.
    ///
    /// # Panics
    /// If `matrix` covers a different number of profiles than `profiles`.
    pub fn form(
        &mut self,
        profiles: &[RespondentProfile],
        matrix: &CompatibilityMatrix,
        target_size: usize,
    ) -> Vec<Group> {
        assert_eq!(
            matrix.len(),
            profiles.len(),
            "compatibility matrix was scored from a different cohort"
        );
        let member_lists = self.assign_members(profiles, matrix, target_size);

        let groups: Vec<Group> = member_lists
            .iter()
            .enumerate()
            .map(|(index, members)| self.summarizer.summarize(members, profiles, matrix, index))
            .collect();

        info!(
            respondents = profiles.len(),
            groups = groups.len(),
            target_size,
            "Group formation complete"
        );
        groups
    }

    /// Decide group membership as lists of cohort positions
    ///
    /// Pure function of its inputs; [`form`](Self::form) only adds summaries.
    ///
    /// # Panics
    /// If `matrix` covers a different number of profiles than `profiles`.
    pub fn assign_members(
        &self,
        profiles: &[RespondentProfile],
        matrix: &CompatibilityMatrix,
        target_size: usize,
    ) -> Vec<Vec<usize>> {
        assert_eq!(
            matrix.len(),
            profiles.len(),
            "compatibility matrix was scored from a different cohort"
        );
        let n = profiles.len();
        if n == 0 {
            debug!("No respondents, nothing to form");
            return Vec::new();
        }

        let stats = matrix.weight_stats();
        let ranked = matrix.ranked_pairs();
        let mut state = Assignment::new(n);

        // Seeding
        let max_seeds = self.params.seed_budget.max_seeds(n, target_size);
        for pair in &ranked {
            if state.groups.len() >= max_seeds || state.all_assigned() {
                break;
            }
            if state.is_free(pair.a) && state.is_free(pair.b) {
                state.open_group(&[pair.a, pair.b]);
            }
        }
        debug!(
            seeds = state.groups.len(),
            max_seeds,
            mean = stats.mean,
            std_dev = stats.std_dev,
            "Seeded groups from top pairs"
        );

        // Degenerate fallback
        if state.groups.is_empty() {
            let averages = (0..n).map(|i| (i, matrix.average_for(i)));
            if let Some((best, _)) = first_max(averages) {
                debug!(profile = best, "No pair seeded, starting from single member");
                state.open_group(&[best]);
            }
        }

        // Growth
        for g in 0..state.groups.len() {
            self.grow(g, &mut state, profiles, matrix, &stats, target_size);
        }

        // Leftover pairing
        let before_pairing = state.groups.len();
        for pair in &ranked {
            if state.free_count() < 2 {
                break;
            }
            if state.is_free(pair.a) && state.is_free(pair.b) {
                state.open_group(&[pair.a, pair.b]);
            }
        }
        if state.groups.len() > before_pairing {
            debug!(
                new_groups = state.groups.len() - before_pairing,
                "Paired leftover respondents"
            );
        }

        // Absorption
        for candidate in 0..n {
            if !state.is_free(candidate) {
                continue;
            }
            let averages = state
                .groups
                .iter()
                .enumerate()
                .map(|(g, members)| (g, matrix.average_to(candidate, members)));
            match first_max(averages) {
                Some((g, average)) => {
                    debug!(profile = candidate, group = g, average, "Absorbed leftover respondent");
                    state.add(g, candidate);
                }
                None => warn!(profile = candidate, "No group available for leftover respondent"),
            }
        }

        state.groups
    }

    /// Grow one group until the target size, no candidate, or a rejection
    fn grow(
        &self,
        g: usize,
        state: &mut Assignment,
        profiles: &[RespondentProfile],
        matrix: &CompatibilityMatrix,
        stats: &WeightStats,
        target_size: usize,
    ) {
        while state.groups[g].len() < target_size {
            let members = &state.groups[g];
            let center = centroid(members.iter().map(|&m| &profiles[m].preference_vector[..]));
            let group_genres: HashSet<&str> =
                members.iter().flat_map(|&m| profiles[m].genre_set()).collect();

            let scored = (0..profiles.len())
                .filter(|&c| state.is_free(c))
                .map(|c| {
                    let average = matrix.average_to(c, members);
                    let blended = self.params.growth_compat_weight * average
                        + self.params.growth_centroid_weight
                            * cosine(&profiles[c].preference_vector, &center)
                        + self.params.growth_genre_weight
                            * jaccard(&profiles[c].genre_set(), &group_genres);
                    ((c, average), blended)
                });

            let Some(((candidate, average), blended)) = first_max(scored) else {
                break;
            };

            let size = members.len();
            let threshold = self
                .params
                .acceptance_threshold(stats.mean, stats.std_dev, size);
            if average < threshold && size >= 2 {
                debug!(
                    group = g,
                    candidate,
                    average,
                    threshold,
                    "Best candidate below threshold, growth stopped"
                );
                break;
            }

            debug!(group = g, candidate, blended, average, "Added member");
            state.add(g, candidate);
        }
    }
}

/// Per-call membership state
struct Assignment {
    assigned: Vec<bool>,
    free: usize,
    groups: Vec<Vec<usize>>,
}

impl Assignment {
    fn new(n: usize) -> Self {
        Self {
            assigned: vec![false; n],
            free: n,
            groups: Vec::new(),
        }
    }

    fn is_free(&self, index: usize) -> bool {
        !self.assigned[index]
    }

    fn free_count(&self) -> usize {
        self.free
    }

    fn all_assigned(&self) -> bool {
        self.free == 0
    }

    fn mark(&mut self, index: usize) {
        if !self.assigned[index] {
            self.assigned[index] = true;
            self.free -= 1;
        }
    }

    fn open_group(&mut self, members: &[usize]) {
        for &m in members {
            self.mark(m);
        }
        self.groups.push(members.to_vec());
    }

    fn add(&mut self, g: usize, index: usize) {
        self.mark(index);
        self.groups[g].push(index);
    }
}

/// Highest value, earliest item on ties
fn first_max<T>(items: impl Iterator<Item = (T, f64)>) -> Option<(T, f64)> {
    let mut best: Option<(T, f64)> = None;
    for (item, score) in items {
        let better = match &best {
            Some((_, best_score)) => score > *best_score,
            None => true,
        };
        if better {
            best = Some((item, score));
        }
    }
    best
}
