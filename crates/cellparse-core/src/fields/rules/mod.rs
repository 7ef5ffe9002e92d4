//! Rule-based field extractors for free-form record cells.

pub mod address;
pub mod catalog;
pub mod house;
pub mod patterns;
pub mod phone;
pub mod residual;

pub use address::{AddressExtractor, FormattedAddress};
pub use catalog::{StreetCatalog, StreetMatch, BUILTIN_STREETS};
pub use house::{Canonical, HouseGrammar, HouseResolver};
pub use phone::PhoneLocator;
pub use residual::{clean_other_info, strip_building_letters, ResidualCleaner};

use serde::{Deserialize, Serialize};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// Half-open byte range into a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The spanned substring of `text`.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Shrink the span so it does not begin or end with whitespace.
    pub fn trim(&self, text: &str) -> Span {
        let slice = self.slice(text);
        let leading = slice.len() - slice.trim_start().len();
        let trailing = slice.len() - slice.trim_end().len();
        if leading == slice.len() {
            return Span::new(self.start, self.start);
        }
        Span::new(self.start + leading, self.end - trailing)
    }
}

/// A matched field with its location in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub span: Span,
    /// Source text that was matched.
    pub source: String,
}

impl<T> FieldMatch<T> {
    /// Build a match for `span` over `text`; the source is copied verbatim.
    pub fn new(value: T, text: &str, span: Span) -> Self {
        Self {
            value,
            span,
            source: span.slice(text).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_trim() {
        let text = "ab  ул. Науки 15  cd";
        let span = Span::new(2, text.len() - 2);
        let trimmed = span.trim(text);
        assert_eq!(trimmed.slice(text), "ул. Науки 15");
    }

    #[test]
    fn test_span_trim_all_whitespace() {
        let text = "a   b";
        let trimmed = Span::new(1, 4).trim(text);
        assert!(trimmed.is_empty());
    }

    #[test]
    fn test_span_overlaps() {
        let a = Span::new(0, 5);
        assert!(a.overlaps(&Span::new(4, 8)));
        assert!(!a.overlaps(&Span::new(5, 8)));
        assert!(!a.overlaps(&Span::new(5, 5)));
    }

    #[test]
    fn test_field_match_copies_source() {
        let text = "тел. 8 901 123-45-67";
        let start = text.find('8').unwrap();
        let m = FieldMatch::new("89011234567".to_string(), text, Span::new(start, text.len()));
        assert_eq!(m.source, "8 901 123-45-67");
    }
}
