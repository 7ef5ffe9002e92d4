//! Output record handed to the cell-writing collaborator.

use serde::{Deserialize, Serialize};

/// The three optional fields extracted from one source cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    /// Formatted address, e.g. "ул. Ключевая 14-1А-93".
    pub address: Option<String>,

    /// Phone digits (10 or 11).
    pub phone: Option<String>,

    /// Cleaned leftover text.
    pub other_info: Option<String>,
}

impl RecordFields {
    /// True when no field was populated; the source cell should then be left untouched.
    pub fn is_empty(&self) -> bool {
        self.address.is_none() && self.phone.is_none() && self.other_info.is_none()
    }

    /// Number of populated fields.
    pub fn populated(&self) -> usize {
        [&self.address, &self.phone, &self.other_info]
            .iter()
            .filter(|f| f.is_some())
            .count()
    }
}
