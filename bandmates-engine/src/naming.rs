//! Group name generation
//!
//! Names are cosmetic and intentionally non-deterministic. All randomness goes
//! through the `Rng` the namer is constructed with, so tests (and reproducible
//! runs) can pass a seeded `StdRng`.
//!
//! Priority:
//! 1. Primary common genre → "Prefix Name Suffix" from the genre word table
//! 2. All members share a listening style → "The {style} Group"
//! 3. Otherwise → "Music Group {0-99}"

use crate::profile::{ListeningStyle, RespondentProfile};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Word candidates for one genre family
struct NameParts {
    prefixes: &'static [&'static str],
    names: &'static [&'static str],
    suffixes: &'static [&'static str],
}

/// Genre key → word candidates, checked in order (specific keys first)
static GENRE_NAME_PARTS: &[(&str, NameParts)] = &[
    (
        "hip hop",
        NameParts {
            prefixes: &["Golden", "Boom Bap", "Underground"],
            names: &["Cipher", "Verse", "Beat"],
            suffixes: &["Collective", "Crew", "Syndicate"],
        },
    ),
    (
        "r&b",
        NameParts {
            prefixes: &["Smooth", "Velvet", "Midnight"],
            names: &["Soul", "Groove", "Harmony"],
            suffixes: &["Society", "Lounge", "Ensemble"],
        },
    ),
    (
        "metal",
        NameParts {
            prefixes: &["Iron", "Thundering", "Molten"],
            names: &["Riff", "Anvil", "Shred"],
            suffixes: &["Legion", "Horde", "Brigade"],
        },
    ),
    (
        "indie",
        NameParts {
            prefixes: &["Lo-Fi", "Basement", "Cardigan"],
            names: &["Cassette", "Vinyl", "Bedroom"],
            suffixes: &["Club", "Collective", "Society"],
        },
    ),
    (
        "electronic",
        NameParts {
            prefixes: &["Neon", "Pulse", "Digital"],
            names: &["Bass", "Synth", "Drop"],
            suffixes: &["Ravers", "Circuit", "Collective"],
        },
    ),
    (
        "classical",
        NameParts {
            prefixes: &["Grand", "Royal", "Baroque"],
            names: &["Sonata", "Symphony", "Overture"],
            suffixes: &["Society", "Quartet", "Guild"],
        },
    ),
    (
        "jazz",
        NameParts {
            prefixes: &["Blue", "Smoky", "Swinging"],
            names: &["Note", "Bebop", "Improv"],
            suffixes: &["Quintet", "Club", "Cats"],
        },
    ),
    (
        "country",
        NameParts {
            prefixes: &["Dusty", "Honky Tonk", "Backroad"],
            names: &["Boots", "Banjo", "Highway"],
            suffixes: &["Posse", "Ramblers", "Band"],
        },
    ),
    (
        "folk",
        NameParts {
            prefixes: &["Wandering", "Campfire", "Rustic"],
            names: &["Ballad", "Fiddle", "Lantern"],
            suffixes: &["Circle", "Troupe", "Gathering"],
        },
    ),
    (
        "latin",
        NameParts {
            prefixes: &["Caliente", "Tropical", "Fiesta"],
            names: &["Ritmo", "Salsa", "Clave"],
            suffixes: &["Familia", "Orquesta", "Crew"],
        },
    ),
    (
        "rock",
        NameParts {
            prefixes: &["Electric", "Rolling", "Loud"],
            names: &["Riff", "Amp", "Stone"],
            suffixes: &["Rebels", "Crew", "Revival"],
        },
    ),
    (
        "pop",
        NameParts {
            prefixes: &["Sparkling", "Chart-Topping", "Bubblegum"],
            names: &["Hook", "Chorus", "Anthem"],
            suffixes: &["Squad", "Club", "Stars"],
        },
    ),
];

/// Used when the primary genre matches no table entry
static GENERIC_NAME_PARTS: NameParts = NameParts {
    prefixes: &["Eclectic", "Mixed", "Shuffle"],
    names: &["Playlist", "Mixtape", "Jukebox"],
    suffixes: &["Crew", "Collective", "Club"],
};

/// Generates group names from an injected random source
pub struct GroupNamer<R: Rng> {
    rng: R,
}

impl GroupNamer<StdRng> {
    /// Namer seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Namer with a fixed seed (reproducible names)
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GroupNamer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Name a group from its common genres and members
    pub fn name_group(&mut self, common_genres: &[String], members: &[&RespondentProfile]) -> String {
        if let Some(primary) = common_genres.first() {
            let parts = parts_for_genre(primary);
            return format!(
                "{} {} {}",
                self.pick(parts.prefixes),
                self.pick(parts.names),
                self.pick(parts.suffixes)
            );
        }

        if let Some(style) = shared_style(members) {
            return format!("The {} Group", style);
        }

        format!("Music Group {}", self.rng.gen_range(0..100))
    }

    fn pick(&mut self, words: &'static [&'static str]) -> &'static str {
        words.choose(&mut self.rng).copied().unwrap_or("Music")
    }
}

/// Case-insensitive substring lookup in either direction
fn parts_for_genre(genre: &str) -> &'static NameParts {
    let normalized = genre.trim().to_lowercase().replace(['-', '_'], " ");
    if normalized.is_empty() {
        return &GENERIC_NAME_PARTS;
    }

    GENRE_NAME_PARTS
        .iter()
        .find(|(key, _)| normalized.contains(key) || key.contains(normalized.as_str()))
        .map(|(_, parts)| parts)
        .unwrap_or(&GENERIC_NAME_PARTS)
}

/// The single listening style every member shares, if any
fn shared_style(members: &[&RespondentProfile]) -> Option<ListeningStyle> {
    let first = members.first()?.listening_style;
    members
        .iter()
        .all(|m| m.listening_style == first)
        .then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(style_vector: [f64; 6]) -> RespondentProfile {
        RespondentProfile {
            id: "id".to_string(),
            name: "Name".to_string(),
            email: String::new(),
            major: "Undeclared".to_string(),
            year: "Unknown".to_string(),
            preference_vector: style_vector,
            top_genres: Vec::new(),
            top_artists: Vec::new(),
            listening_style: ListeningStyle::derive(&style_vector),
        }
    }

    #[test]
    fn test_genre_name_has_three_table_words() {
        let mut namer = GroupNamer::seeded(7);
        let name = namer.name_group(&["Indie Rock".to_string()], &[]);

        // "Indie Rock" contains "indie", which precedes "rock" in the table
        let words = &GENRE_NAME_PARTS[3].1;
        assert!(words.prefixes.iter().any(|p| name.starts_with(p)), "{}", name);
        assert!(words.suffixes.iter().any(|s| name.ends_with(s)), "{}", name);
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_bidirectional() {
        assert!(std::ptr::eq(parts_for_genre("HIP-HOP"), &GENRE_NAME_PARTS[0].1));
        assert!(std::ptr::eq(parts_for_genre("k-pop"), &GENRE_NAME_PARTS[11].1));
        assert!(std::ptr::eq(parts_for_genre("Jaz"), &GENRE_NAME_PARTS[6].1));
        assert!(std::ptr::eq(parts_for_genre("Polka"), &GENERIC_NAME_PARTS));
    }

    #[test]
    fn test_shared_style_name() {
        let a = member([0.9, 0.2, 0.2, 0.2, 0.5, 0.3]);
        let b = member([0.8, 0.1, 0.3, 0.2, 0.5, 0.3]);
        let mut namer = GroupNamer::seeded(1);
        assert_eq!(namer.name_group(&[], &[&a, &b]), "The High Energy Group");
    }

    #[test]
    fn test_mixed_style_fallback() {
        let a = member([0.9, 0.2, 0.2, 0.2, 0.5, 0.3]);
        let b = member([0.1, 0.1, 0.1, 0.9, 0.5, 0.3]);
        let mut namer = GroupNamer::seeded(3);
        let name = namer.name_group(&[], &[&a, &b]);

        let number: u32 = name.strip_prefix("Music Group ").unwrap().parse().unwrap();
        assert!(number < 100);
    }

    #[test]
    fn test_same_seed_same_name() {
        let genres = vec!["Jazz".to_string()];
        let first = GroupNamer::seeded(99).name_group(&genres, &[]);
        let second = GroupNamer::seeded(99).name_group(&genres, &[]);
        assert_eq!(first, second);
    }
}
