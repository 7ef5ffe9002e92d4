//! Field router: phone, then address, then residual text.

use serde::Serialize;
use tracing::debug;

use crate::models::config::{ExtractionConfig, PhoneScan};
use crate::models::record::RecordFields;

use super::rules::{
    strip_building_letters, AddressExtractor, FieldMatch, FormattedAddress, PhoneLocator,
    ResidualCleaner, Span, StreetCatalog,
};
use super::RecordParser;

/// Result of routing one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    /// Phone digits and their span in the input.
    pub phone: Option<FieldMatch<String>>,
    /// Address, with its span in the input after the phone was removed.
    pub address: Option<FieldMatch<FormattedAddress>>,
    /// Address string as written to the output, after any letter stripping.
    pub formatted_address: Option<String>,
    /// Address span in input coordinates. Two segments when it straddles the phone.
    pub address_segments: Vec<Span>,
    /// Cleaned leftover text.
    pub other_info: Option<String>,
    /// Input with the phone and address removed, before cleaning.
    pub remainder: String,
}

impl ExtractionResult {
    /// The three output fields.
    pub fn fields(&self) -> RecordFields {
        RecordFields {
            address: self.formatted_address.clone(),
            phone: self.phone.as_ref().map(|p| p.value.clone()),
            other_info: self.other_info.clone(),
        }
    }

    /// True when no field was found; the source should be left untouched.
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.address.is_none() && self.other_info.is_none()
    }
}

/// Runs the extractors in their fixed order over one record.
#[derive(Debug, Clone)]
pub struct FieldRouter {
    phone: PhoneLocator,
    address: AddressExtractor,
    cleaner: ResidualCleaner,
    /// Whether to drop building letters from the formatted address.
    strip_letters: bool,
}

impl FieldRouter {
    /// Create a router over the built-in street catalog.
    pub fn new() -> Self {
        Self::with_catalog(StreetCatalog::builtin())
    }

    /// Create a router over a custom street catalog.
    pub fn with_catalog(catalog: StreetCatalog) -> Self {
        Self {
            phone: PhoneLocator::new(),
            address: AddressExtractor::with_catalog(catalog),
            cleaner: ResidualCleaner::new(),
            strip_letters: false,
        }
    }

    /// Create a router from extraction settings.
    pub fn from_config(config: &ExtractionConfig, catalog: StreetCatalog) -> Self {
        let mut router = Self::with_catalog(catalog)
            .with_phone_scan(config.phone_scan)
            .with_letter_stripping(config.strip_building_letters);
        router.phone = router.phone.with_max_gap(config.max_phone_gap);
        router
    }

    /// Set how the phone window is chosen.
    pub fn with_phone_scan(mut self, scan: PhoneScan) -> Self {
        self.phone = self.phone.with_scan(scan);
        self
    }

    /// Set building-letter stripping.
    pub fn with_letter_stripping(mut self, strip: bool) -> Self {
        self.strip_letters = strip;
        self
    }

    pub fn catalog(&self) -> &StreetCatalog {
        self.address.catalog()
    }

    /// Route one record.
    pub fn route(&self, text: Option<&str>) -> ExtractionResult {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            return ExtractionResult::default();
        };

        let phone = self.phone.locate(text);
        let phone_span = phone.as_ref().map(|p| p.span);
        let without_phone = match phone_span {
            Some(span) => remove_span(text, span),
            None => text.to_string(),
        };

        let address = self.address.extract(&without_phone);
        let remainder = match &address {
            Some(a) => remove_span(&without_phone, a.span),
            None => without_phone.clone(),
        };
        let other_info = self.cleaner.clean(&remainder);

        let formatted_address = address.as_ref().map(|a| {
            let formatted = a.value.formatted();
            if self.strip_letters {
                strip_building_letters(&formatted)
            } else {
                formatted
            }
        });
        let address_segments = address
            .as_ref()
            .map(|a| original_segments(a.span, phone_span))
            .unwrap_or_default();

        debug!(
            "Routed record: phone={}, address={}, other_info={}",
            phone.is_some(),
            address.is_some(),
            other_info.is_some()
        );

        ExtractionResult {
            phone,
            address,
            formatted_address,
            address_segments,
            other_info,
            remainder,
        }
    }
}

impl Default for FieldRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordParser for FieldRouter {
    fn parse(&self, text: Option<&str>) -> ExtractionResult {
        self.route(text)
    }
}

fn remove_span(text: &str, span: Span) -> String {
    let mut out = String::with_capacity(text.len() - span.len());
    out.push_str(&text[..span.start]);
    out.push_str(&text[span.end..]);
    out
}

/// Map a span over the phone-stripped text back onto the input.
fn original_segments(span: Span, phone: Option<Span>) -> Vec<Span> {
    let Some(phone) = phone else {
        return vec![span];
    };
    let shift = phone.len();

    let segments = if span.end <= phone.start {
        vec![span]
    } else if span.start >= phone.start {
        vec![Span::new(span.start + shift, span.end + shift)]
    } else {
        vec![
            Span::new(span.start, phone.start),
            Span::new(phone.end, span.end + shift),
        ]
    };

    segments.into_iter().filter(|s| !s.is_empty()).collect()
}
