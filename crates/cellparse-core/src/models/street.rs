//! Street catalog entries.

use serde::{Deserialize, Serialize};

/// A recognized street name with its canonical type marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreetEntry {
    /// Street name as it should appear in a formatted address.
    pub name: String,

    /// Canonical type marker ("ул.", "пр.", "наб.", ...).
    #[serde(rename = "type")]
    pub type_marker: String,
}

impl StreetEntry {
    pub fn new(name: impl Into<String>, type_marker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_marker: type_marker.into(),
        }
    }

    /// Key used for case-insensitive comparison of names.
    ///
    /// Lowercases and folds "ё" into "е".
    pub fn lookup_key(name: &str) -> String {
        name.to_lowercase().replace('ё', "е")
    }
}

impl std::fmt::Display for StreetEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.type_marker, self.name)
    }
}
