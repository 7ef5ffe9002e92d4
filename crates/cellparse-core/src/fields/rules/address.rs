//! Street address extraction: catalog street, preceding prefixes, following house descriptor.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::StreetCatalog;
use super::house::HouseResolver;
use super::patterns::{CITY_PREFIX, STREET_PREFIX};
use super::{FieldExtractor, FieldMatch, Span};

/// A canonical address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedAddress {
    /// Catalog type marker, e.g. "ул.".
    pub type_marker: String,
    /// Catalog street name.
    pub street: String,
    /// Canonical house token, e.g. "14-1А-93".
    pub house: Option<String>,
}

impl FormattedAddress {
    /// `<marker> <street>[ <house>]`.
    pub fn formatted(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FormattedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_marker, self.street)?;
        if let Some(house) = &self.house {
            write!(f, " {}", house)?;
        }
        Ok(())
    }
}

/// Text with em and en dashes replaced by "-", keeping a byte map back to the input.
struct DashNormalized {
    text: String,
    /// Original byte offset for every normalized byte, plus one for the end.
    offsets: Vec<usize>,
}

impl DashNormalized {
    fn new(text: &str) -> Self {
        let mut normalized = String::with_capacity(text.len());
        let mut offsets = Vec::with_capacity(text.len() + 1);

        for (idx, c) in text.char_indices() {
            let c = match c {
                '\u{2014}' | '\u{2013}' => '-',
                other => other,
            };
            offsets.extend(std::iter::repeat_n(idx, c.len_utf8()));
            normalized.push(c);
        }
        offsets.push(text.len());

        Self {
            text: normalized,
            offsets,
        }
    }

    fn to_original(&self, span: Span) -> Span {
        Span::new(self.offsets[span.start], self.offsets[span.end])
    }
}

/// Address field extractor.
#[derive(Debug, Clone)]
pub struct AddressExtractor {
    catalog: StreetCatalog,
    resolver: HouseResolver,
}

impl AddressExtractor {
    /// Create an extractor over the built-in street catalog.
    pub fn new() -> Self {
        Self::with_catalog(StreetCatalog::builtin())
    }

    /// Create an extractor over a custom street catalog.
    pub fn with_catalog(catalog: StreetCatalog) -> Self {
        Self {
            catalog,
            resolver: HouseResolver::new(),
        }
    }

    pub fn catalog(&self) -> &StreetCatalog {
        &self.catalog
    }

    /// Extract an address from `text`.
    ///
    /// The span covers any city and street-type tokens directly before the
    /// street name, the name itself and the house descriptor after it. It is
    /// trimmed and expressed in `text` coordinates.
    pub fn extract(&self, text: &str) -> Option<FieldMatch<FormattedAddress>> {
        let normalized = DashNormalized::new(text);
        let norm = normalized.text.as_str();

        let street = self.catalog.find_longest_match(norm)?;

        let prefix_start = STREET_PREFIX
            .find(&norm[..street.span.start])
            .map(|m| m.start());
        let city_start = CITY_PREFIX
            .find(&norm[..prefix_start.unwrap_or(street.span.start)])
            .map(|m| m.start());
        let start = city_start.or(prefix_start).unwrap_or(street.span.start);

        let house = self.resolver.resolve(&norm[street.span.end..]);
        let end = house
            .as_ref()
            .map_or(street.span.end, |h| street.span.end + h.span.end);

        let span = normalized.to_original(Span::new(start, end).trim(norm));
        let address = FormattedAddress {
            type_marker: street.entry.type_marker.clone(),
            street: street.entry.name.clone(),
            house: house.map(|h| h.value),
        };

        Some(FieldMatch::new(address, text, span))
    }
}

impl Default for AddressExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AddressExtractor {
    type Output = FieldMatch<FormattedAddress>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        AddressExtractor::extract(self, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::street::StreetEntry;

    fn extract(text: &str) -> (String, String) {
        let m = AddressExtractor::new().extract(text).unwrap();
        (m.value.formatted(), m.source)
    }

    #[test]
    fn test_prefix_and_house() {
        let (address, source) =
            extract("Иванов Иван  ул. Ключевая д. 14, корп. 1, лит. А, кв. 93 тел.");
        assert_eq!(address, "ул. Ключевая 14-1А-93");
        assert_eq!(source, "ул. Ключевая д. 14, корп. 1, лит. А, кв. 93");
    }

    #[test]
    fn test_bare_house_number() {
        let (address, source) = extract("пр. Науки 15");
        assert_eq!(address, "пр. Науки 15");
        assert_eq!(source, "пр. Науки 15");
    }

    #[test]
    fn test_city_and_prefix_are_consumed() {
        let (address, source) = extract("г. СПб, ул. Гжатская, д.6, к.1, кв.34");
        assert_eq!(address, "ул. Гжатская 6-1-34");
        assert_eq!(source, "г. СПб, ул. Гжатская, д.6, к.1, кв.34");
    }

    #[test]
    fn test_city_without_street_prefix() {
        let (address, source) = extract("Сидоров СПб Замшина 12 кв. 4");
        assert_eq!(address, "ул. Замшина 12-4");
        assert_eq!(source, "СПб Замшина 12 кв. 4");
    }

    #[test]
    fn test_street_without_house() {
        let (address, source) = extract("Петров 5-2А-2 Замшина");
        assert_eq!(address, "ул. Замшина");
        assert_eq!(source, "Замшина");
    }

    #[test]
    fn test_catalog_spelling_and_marker() {
        let (address, source) = extract("ПИСКАРЕВСКИЙ 25-3-11");
        assert_eq!(address, "пр. Пискарёвский 25-3-11");
        assert_eq!(source, "ПИСКАРЕВСКИЙ 25-3-11");
    }

    #[test]
    fn test_em_dash_maps_back_to_original() {
        let text = "ул. Замшина 14\u{2014}5 Иванов";
        let m = AddressExtractor::new().extract(text).unwrap();
        assert_eq!(m.value.formatted(), "ул. Замшина 14-5");
        assert_eq!(m.source, "ул. Замшина 14\u{2014}5");
        assert_eq!(m.span.slice(text), m.source);
    }

    #[test]
    fn test_no_street() {
        assert!(AddressExtractor::new().extract("Иванов Иван 15").is_none());
        assert!(AddressExtractor::new().extract("").is_none());
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = StreetCatalog::new([StreetEntry::new("Тестовая", "наб.")]).unwrap();
        let extractor = AddressExtractor::with_catalog(catalog);
        let m = extractor.extract("Тестовая д. 3").unwrap();
        assert_eq!(m.value.to_string(), "наб. Тестовая 3");
        assert!(extractor.extract("пр. Науки 15").is_none());
    }
}
