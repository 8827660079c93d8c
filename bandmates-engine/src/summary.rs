//! Group Summarizer
//!
//! Derives every descriptive field of a [`Group`] from its final member list.
//! Apart from the generated name, the output is a pure function of the members
//! and the compatibility matrix, so it can be recomputed after any membership
//! change.
//!
//! # Dynamics
//! - **diversity**: `|union of genres| / (members × 3)`, capped at 1
//! - **cohesion**: `1 - Σ|value - centroid| / (members × dimensions)`, floored at 0
//! - **balance**: `1 - most_common_major_count / members`

use crate::compatibility::CompatibilityMatrix;
use crate::naming::GroupNamer;
use crate::profile::{
    rank_by_frequency, RespondentProfile, ACOUSTICNESS, DANCEABILITY, ENERGY,
    PREFERENCE_DIMENSIONS, STYLE_THRESHOLD, VALENCE,
};
use crate::similarity::centroid;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Number of genres reported as common to a group
pub const COMMON_GENRE_LIMIT: usize = 5;

/// Number of common genres quoted in the playlist suggestion
pub const PLAYLIST_GENRE_LIMIT: usize = 3;

/// Number of shared artists reported for a group
pub const SHARED_ARTIST_LIMIT: usize = 5;

/// Assumed average number of genres listed per person
const GENRES_PER_PERSON: f64 = 3.0;

/// A centroid feature above this value triggers the matching activity
const ACTIVITY_THRESHOLD: f64 = 0.6;

const MAX_ACTIVITIES: usize = 4;

const GENERIC_ACTIVITIES: [&str; 3] = [
    "Create a collaborative playlist",
    "Share favorite songs over coffee",
    "Explore a new genre together",
];

/// Canned meeting-time suggestions
pub const MEETING_TIMES: [&str; 2] = [
    "Weekday evenings (6-9 PM)",
    "Weekend afternoons (2-5 PM)",
];

/// Playlist theme chosen from the group centroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaylistTheme {
    HighEnergyWorkout,
    FeelGoodVibes,
    DanceParty,
    AcousticSessions,
    DiverseMix,
}

impl PlaylistTheme {
    /// Same priority order as listening-style derivation
    pub fn from_centroid(centroid: &[f64]) -> Self {
        let above = |dim: usize| centroid.get(dim).is_some_and(|v| *v > STYLE_THRESHOLD);
        if above(ENERGY) {
            PlaylistTheme::HighEnergyWorkout
        } else if above(VALENCE) {
            PlaylistTheme::FeelGoodVibes
        } else if above(DANCEABILITY) {
            PlaylistTheme::DanceParty
        } else if above(ACOUSTICNESS) {
            PlaylistTheme::AcousticSessions
        } else {
            PlaylistTheme::DiverseMix
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlaylistTheme::HighEnergyWorkout => "High-Energy Workout",
            PlaylistTheme::FeelGoodVibes => "Feel-Good Vibes",
            PlaylistTheme::DanceParty => "Dance Party",
            PlaylistTheme::AcousticSessions => "Acoustic Sessions",
            PlaylistTheme::DiverseMix => "Diverse Mix",
        }
    }
}

impl fmt::Display for PlaylistTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Descriptive group metrics, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupDynamics {
    pub diversity: f64,
    pub cohesion: f64,
    pub balance: f64,
}

/// Generated suggestions for the group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub playlist_theme: PlaylistTheme,
    pub playlist: String,
    pub activities: Vec<String>,
    pub meeting_times: Vec<String>,
}

/// A finished group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// 1-based position in the formation result
    pub id: usize,
    pub name: String,
    pub members: Vec<RespondentProfile>,
    pub group_compatibility: f64,
    pub common_genres: Vec<String>,
    pub shared_artists: Vec<String>,
    pub dynamics: GroupDynamics,
    pub recommendations: Recommendations,
}

impl Group {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn member_ids(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.id.as_str()).collect()
    }
}

/// Builds [`Group`]s from member lists
pub struct GroupSummarizer<R: Rng> {
    namer: GroupNamer<R>,
}

impl<R: Rng> GroupSummarizer<R> {
    pub fn new(namer: GroupNamer<R>) -> Self {
        Self { namer }
    }

    /// Summarize one group
    ///
    /// `members` are cohort positions into `profiles` and `matrix`; `index`
    /// is the 0-based position of the group in the result.
    ///
    /// # Panics
    /// If a member position is outside `profiles` or `matrix`, or the two
    /// cover cohorts of different sizes.
    pub fn summarize(
        &mut self,
        members: &[usize],
        profiles: &[RespondentProfile],
        matrix: &CompatibilityMatrix,
        index: usize,
    ) -> Group {
        debug_assert_eq!(matrix.len(), profiles.len());
        let member_profiles: Vec<&RespondentProfile> = members.iter().map(|&m| &profiles[m]).collect();

        let common_genres = common_genres(&member_profiles);
        let center = centroid(member_profiles.iter().map(|p| &p.preference_vector[..]));
        let name = self.namer.name_group(&common_genres, &member_profiles);

        Group {
            id: index + 1,
            name,
            group_compatibility: matrix.mean_within(members),
            shared_artists: shared_artists(&member_profiles),
            dynamics: GroupDynamics {
                diversity: diversity(&member_profiles),
                cohesion: cohesion(&member_profiles, &center),
                balance: balance(&member_profiles),
            },
            recommendations: recommendations(&center, &common_genres),
            common_genres,
            members: member_profiles.into_iter().cloned().collect(),
        }
    }
}

fn common_genres(members: &[&RespondentProfile]) -> Vec<String> {
    rank_by_frequency(members.iter().flat_map(|m| m.top_genres.iter().map(String::as_str)))
        .into_iter()
        .take(COMMON_GENRE_LIMIT)
        .map(|(genre, _)| genre)
        .collect()
}

/// Artists named by at least two members
fn shared_artists(members: &[&RespondentProfile]) -> Vec<String> {
    // Count each member once per artist, in listing order
    let per_member = members.iter().flat_map(|m| {
        let mut seen = HashSet::new();
        m.top_artists
            .iter()
            .map(String::as_str)
            .filter(move |a| seen.insert(*a))
    });
    rank_by_frequency(per_member)
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .take(SHARED_ARTIST_LIMIT)
        .map(|(artist, _)| artist)
        .collect()
}

fn diversity(members: &[&RespondentProfile]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let union: HashSet<&str> = members.iter().flat_map(|m| m.genre_set()).collect();
    (union.len() as f64 / (members.len() as f64 * GENRES_PER_PERSON)).min(1.0)
}

fn cohesion(members: &[&RespondentProfile], center: &[f64]) -> f64 {
    if members.is_empty() || center.len() != PREFERENCE_DIMENSIONS {
        return 0.0;
    }
    let deviation: f64 = members
        .iter()
        .flat_map(|m| m.preference_vector.iter().zip(center).map(|(v, c)| (v - c).abs()))
        .sum();
    (1.0 - deviation / (members.len() * PREFERENCE_DIMENSIONS) as f64).max(0.0)
}

fn balance(members: &[&RespondentProfile]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let most_common = rank_by_frequency(members.iter().map(|m| m.major.as_str()))
        .first()
        .map(|(_, count)| *count)
        .unwrap_or(0);
    1.0 - most_common as f64 / members.len() as f64
}

fn recommendations(center: &[f64], common_genres: &[String]) -> Recommendations {
    let playlist_theme = PlaylistTheme::from_centroid(center);
    let quoted: Vec<&str> = common_genres
        .iter()
        .take(PLAYLIST_GENRE_LIMIT)
        .map(String::as_str)
        .collect();
    let playlist = if quoted.is_empty() {
        format!("{}: Various Genres", playlist_theme)
    } else {
        format!("{}: {}", playlist_theme, quoted.join(", "))
    };

    Recommendations {
        playlist_theme,
        playlist,
        activities: activities(center, common_genres),
        meeting_times: MEETING_TIMES.iter().map(|s| s.to_string()).collect(),
    }
}

fn activities(center: &[f64], common_genres: &[String]) -> Vec<String> {
    let above = |dim: usize| center.get(dim).is_some_and(|v| *v > ACTIVITY_THRESHOLD);
    let has_genre = |genre: &str| common_genres.iter().any(|g| g.eq_ignore_ascii_case(genre));

    let mut activities = Vec::new();
    if above(ENERGY) {
        activities.push("Attend a live concert together");
    }
    if above(DANCEABILITY) {
        activities.push("Check out a dance night or club event");
    }
    if above(ACOUSTICNESS) {
        activities.push("Host an acoustic jam or open-mic session");
    }
    if has_genre("Jazz") {
        activities.push("Visit a local jazz club");
    }
    if has_genre("Classical") {
        activities.push("Attend a symphony or chamber concert");
    }

    if activities.is_empty() {
        return GENERIC_ACTIVITIES.iter().map(|s| s.to_string()).collect();
    }
    activities.truncate(MAX_ACTIVITIES);
    activities.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ListeningStyle;
    use bandmates_common::EngineParams;

    fn profile(id: &str, vector: [f64; 6], genres: &[&str], artists: &[&str], major: &str) -> RespondentProfile {
        RespondentProfile {
            id: id.to_string(),
            name: id.to_uppercase(),
            email: format!("{}@example.com", id),
            major: major.to_string(),
            year: "Unknown".to_string(),
            preference_vector: vector,
            top_genres: genres.iter().map(|s| s.to_string()).collect(),
            top_artists: artists.iter().map(|s| s.to_string()).collect(),
            listening_style: ListeningStyle::derive(&vector),
        }
    }

    fn summarize(profiles: &[RespondentProfile]) -> Group {
        let matrix = CompatibilityMatrix::score(profiles, &EngineParams::default());
        let members: Vec<usize> = (0..profiles.len()).collect();
        GroupSummarizer::new(GroupNamer::seeded(5)).summarize(&members, profiles, &matrix, 0)
    }

    #[test]
    fn test_identical_members() {
        let v = [0.8, 0.8, 0.8, 0.2, 0.6, 0.5];
        let profiles = vec![
            profile("a", v, &["Pop", "Dance"], &["Dua Lipa"], "Biology"),
            profile("b", v, &["Pop", "Dance"], &["Dua Lipa"], "Biology"),
        ];
        let group = summarize(&profiles);

        assert_eq!(group.id, 1);
        assert!((group.group_compatibility - 1.0).abs() < 1e-9);
        assert_eq!(group.common_genres, vec!["Pop", "Dance"]);
        assert_eq!(group.shared_artists, vec!["Dua Lipa"]);
        // 2 distinct genres / (2 × 3)
        assert!((group.dynamics.diversity - 1.0 / 3.0).abs() < 1e-9);
        assert!((group.dynamics.cohesion - 1.0).abs() < 1e-9);
        assert_eq!(group.dynamics.balance, 0.0);
        assert_eq!(group.recommendations.playlist_theme, PlaylistTheme::HighEnergyWorkout);
        assert_eq!(group.recommendations.playlist, "High-Energy Workout: Pop, Dance");
        assert_eq!(
            group.recommendations.activities,
            vec!["Attend a live concert together", "Check out a dance night or club event"]
        );
        assert_eq!(group.recommendations.meeting_times.len(), 2);
        assert!(!group.name.is_empty());
    }

    #[test]
    fn test_single_member_group() {
        let profiles = vec![profile("solo", [0.5; 6], &["Jazz"], &[], "Music")];
        let group = summarize(&profiles);

        assert_eq!(group.size(), 1);
        assert_eq!(group.group_compatibility, 0.0);
        assert_eq!(group.dynamics.balance, 0.0);
        assert!((group.dynamics.cohesion - 1.0).abs() < 1e-9);
        assert!(group
            .recommendations
            .activities
            .contains(&"Visit a local jazz club".to_string()));
    }

    #[test]
    fn test_balance_and_cohesion_spread() {
        let profiles = vec![
            profile("a", [1.0, 0.0, 1.0, 0.0, 1.0, 0.0], &["Rock"], &[], "Math"),
            profile("b", [0.0, 1.0, 0.0, 1.0, 0.0, 1.0], &["Folk"], &[], "Art"),
            profile("c", [1.0, 0.0, 1.0, 0.0, 1.0, 0.0], &["Rock"], &[], "Math"),
            profile("d", [0.0, 1.0, 0.0, 1.0, 0.0, 1.0], &["Folk"], &[], "History"),
        ];
        let group = summarize(&profiles);

        // Majors: Math ×2 of 4
        assert!((group.dynamics.balance - 0.5).abs() < 1e-9);
        // Every value sits 0.5 from the centroid
        assert!((group.dynamics.cohesion - 0.5).abs() < 1e-9);
        assert!((group.dynamics.diversity - 2.0 / 12.0).abs() < 1e-9);
        assert!(group.shared_artists.is_empty());
    }

    #[test]
    fn test_common_genres_capped_at_five() {
        let profiles = vec![
            profile("a", [0.5; 6], &["A", "B", "C", "D"], &[], "X"),
            profile("b", [0.5; 6], &["E", "F", "D", "C"], &[], "Y"),
        ];
        let group = summarize(&profiles);
        assert_eq!(group.common_genres, vec!["C", "D", "A", "B", "E"]);
        assert_eq!(group.recommendations.playlist, "Diverse Mix: C, D, A");
        assert_eq!(group.recommendations.activities.len(), 3);
    }

    #[test]
    fn test_activities_truncated_to_four() {
        let v = [0.9, 0.2, 0.9, 0.9, 0.5, 0.5];
        let profiles = vec![profile("a", v, &["Jazz", "Classical"], &[], "X")];
        let group = summarize(&profiles);
        assert_eq!(group.recommendations.activities.len(), 4);
        assert!(!group
            .recommendations
            .activities
            .contains(&"Attend a symphony or chamber concert".to_string()));
    }

    #[test]
    fn test_playlist_theme_priority() {
        assert_eq!(
            PlaylistTheme::from_centroid(&[0.5, 0.8, 0.9, 0.9, 0.5, 0.5]),
            PlaylistTheme::FeelGoodVibes
        );
        assert_eq!(
            PlaylistTheme::from_centroid(&[0.5, 0.5, 0.5, 0.71, 0.5, 0.5]),
            PlaylistTheme::AcousticSessions
        );
        assert_eq!(PlaylistTheme::from_centroid(&[]), PlaylistTheme::DiverseMix);
    }
}
