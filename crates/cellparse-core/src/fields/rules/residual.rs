//! Residual "other information" cleanup and the building-letter post-pass.

use regex::Captures;

use super::patterns::*;
use super::FieldExtractor;

/// Cleans what is left of a record after the phone and address are removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResidualCleaner;

impl ResidualCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Strip boilerplate and stray punctuation. Returns `None` when nothing meaningful is left.
    pub fn clean(&self, text: &str) -> Option<String> {
        let text = WHITESPACE.replace_all(text, " ");

        let text = [
            &*REGISTERED_AND_RESIDING,
            &*CITIZENSHIP,
            &*RF_MARKER,
            &*PHONE_LABEL,
            &*CITY_REMNANT,
            &*CITY_ABBREV,
        ]
        .iter()
        .fold(text.into_owned(), |acc, pattern| {
            pattern.replace_all(&acc, "").into_owned()
        });

        // Keep the first separator of a run: ", ," -> ","
        let text = PUNCT_RUN.replace_all(&text, |caps: &Captures| caps[0][..1].to_string());
        let text = WHITESPACE.replace_all(&text, " ");

        let cleaned = text.trim_matches(|c: char| c == ',' || c == '-' || c.is_whitespace());
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned.to_string())
        }
    }
}

impl FieldExtractor for ResidualCleaner {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.clean(text)
    }
}

/// Clean residual text with the default cleaner.
pub fn clean_other_info(text: &str) -> Option<String> {
    ResidualCleaner::new().clean(text)
}

/// Drop building letters А, Б, В and Г from a formatted address.
///
/// `14-1А-93` becomes `14-1-93` and `6А` at a word end becomes `6`. Other
/// letters are left alone.
pub fn strip_building_letters(address: &str) -> String {
    let address = LETTER_BEFORE_DASH.replace_all(address, "${1}-${2}");
    LETTER_AT_WORD_END
        .replace_all(&address, "${1}${2}")
        .into_owned()
}
