//! Raw survey records
//!
//! A record is whatever the record source hands over: a flat mapping of field
//! name to string or number. Keys are normalized on construction so that
//! spreadsheet headers like `"Favorite Artists"` and `"favorite-artists"`
//! both land on `favorite_artists`, and a handful of common alternate column
//! names are folded onto their canonical field.
//!
//! Nothing here fails on malformed values: accessors return `None` and the
//! profile builder substitutes defaults.

use bandmates_common::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use tracing::debug;

/// Alternate column names folded onto canonical fields (canonical, aliases)
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("favorite_song", &["song", "track", "track_name", "song_title"]),
    ("favorite_artists", &["artists", "artist_name"]),
    ("genres", &["genre", "music_genres"]),
];

/// One survey response as supplied by the record source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    /// Build a record from an arbitrary JSON object, normalizing keys
    pub fn from_map(raw: Map<String, Value>) -> Self {
        let mut fields = Map::new();
        for (key, value) in raw {
            fields.insert(normalize_key(&key), value);
        }

        for (canonical, aliases) in FIELD_ALIASES {
            if fields.contains_key(*canonical) {
                continue;
            }
            if let Some(alias) = aliases.iter().find(|a| fields.contains_key(**a)) {
                if let Some(value) = fields.get(*alias).cloned() {
                    fields.insert((*canonical).to_string(), value);
                }
            }
        }

        Self { fields }
    }

    /// Convenience constructor from `(key, value)` pairs
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<Map<String, Value>>();
        Self::from_map(map)
    }

    /// Trimmed, non-empty text value of a field
    ///
    /// Numbers are rendered as text so that a numeric `year` column still reads.
    pub fn text(&self, key: &str) -> Option<String> {
        let text = match self.fields.get(key)? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some(text)
    }

    /// Finite numeric value of a field, accepting numeric strings
    pub fn number(&self, key: &str) -> Option<f64> {
        let value = match self.fields.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }

    /// Comma-separated list field: tokens trimmed, empties dropped
    ///
    /// JSON arrays of strings are accepted as well.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(Value::String(s)) => split_list(s),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }

}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(RawRecord::from_map(map))
    }
}

/// Normalize a column header: trim, lowercase, spaces and hyphens to `_`
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Split a comma-separated field into trimmed, non-empty tokens
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a JSON array of record objects
pub fn load_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let records: Vec<RawRecord> = serde_json::from_reader(reader)?;
    debug!(count = records.len(), "Loaded raw records");
    Ok(records)
}
