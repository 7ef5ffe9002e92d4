//! Phone number location by positional digit-run analysis.
//!
//! The locator does not validate numbering plans. It looks for 10 digits
//! that sit close enough to each other to be one number, optionally led by
//! a trunk "8" (kept in the digits) or "+7" (consumed but not kept).

use super::{FieldExtractor, FieldMatch, Span};
use crate::models::config::PhoneScan;

const PHONE_DIGITS: usize = 10;
const TRUNK_PREFIX: char = '8';

/// A digit found in the text.
#[derive(Debug, Clone, Copy)]
struct DigitPos {
    /// Character index, used for the gap rule.
    char_idx: usize,
    /// Byte offset, used for spans.
    byte_idx: usize,
    digit: char,
}

/// Phone field extractor.
#[derive(Debug, Clone)]
pub struct PhoneLocator {
    max_gap: usize,
    scan: PhoneScan,
}

impl PhoneLocator {
    /// Create a new phone locator.
    pub fn new() -> Self {
        Self {
            max_gap: 3,
            scan: PhoneScan::default(),
        }
    }

    /// Set the maximum distance in characters between consecutive digits.
    pub fn with_max_gap(mut self, max_gap: usize) -> Self {
        self.max_gap = max_gap;
        self
    }

    /// Set how the 10-digit window is chosen.
    pub fn with_scan(mut self, scan: PhoneScan) -> Self {
        self.scan = scan;
        self
    }

    fn window_is_contiguous(&self, window: &[DigitPos]) -> bool {
        window
            .windows(2)
            .all(|pair| pair[1].char_idx - pair[0].char_idx <= self.max_gap)
    }

    fn build_match(&self, text: &str, digits: &[DigitPos], end: usize) -> FieldMatch<String> {
        let window = &digits[end - PHONE_DIGITS..end];
        let first = window[0];
        let last = window[PHONE_DIGITS - 1];

        let mut value: String = window.iter().map(|d| d.digit).collect();
        let mut start = first.byte_idx;
        let end_byte = last.byte_idx + last.digit.len_utf8();

        if let Some(lead) = end.checked_sub(PHONE_DIGITS + 1).map(|i| digits[i]) {
            if first.char_idx - lead.char_idx <= self.max_gap {
                if lead.digit == TRUNK_PREFIX {
                    value.insert(0, lead.digit);
                    start = lead.byte_idx;
                } else if lead.digit == '7' && text[..lead.byte_idx].ends_with('+') {
                    start = lead.byte_idx - 1;
                }
            }
        }

        FieldMatch::new(value, text, Span::new(start, end_byte))
    }

    /// Locate a phone number in `text`.
    ///
    /// Returns the digits (10, or 11 with a leading "8") and the exact span
    /// they were read from, separators included.
    pub fn locate(&self, text: &str) -> Option<FieldMatch<String>> {
        let digits: Vec<DigitPos> = text
            .char_indices()
            .enumerate()
            .filter(|(_, (_, c))| c.is_ascii_digit())
            .map(|(char_idx, (byte_idx, digit))| DigitPos {
                char_idx,
                byte_idx,
                digit,
            })
            .collect();

        if digits.len() < PHONE_DIGITS {
            return None;
        }

        let ends: Vec<usize> = match self.scan {
            PhoneScan::Tail => vec![digits.len()],
            PhoneScan::Rightmost => (PHONE_DIGITS..=digits.len()).rev().collect(),
        };

        ends.into_iter()
            .find(|&end| self.window_is_contiguous(&digits[end - PHONE_DIGITS..end]))
            .map(|end| self.build_match(text, &digits, end))
    }
}

impl Default for PhoneLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PhoneLocator {
    type Output = FieldMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.locate(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ten_digits() {
        let m = PhoneLocator::new().locate("Иванов 9011234567").unwrap();
        assert_eq!(m.value, "9011234567");
        assert_eq!(m.source, "9011234567");
    }

    #[test]
    fn test_leading_eight_is_kept() {
        let m = PhoneLocator::new().locate("тел. 8-901-123-45-67").unwrap();
        assert_eq!(m.value, "89011234567");
        assert_eq!(m.source, "8-901-123-45-67");
    }

    #[test]
    fn test_leading_eight_too_far_is_dropped() {
        let m = PhoneLocator::new().locate("8 кв. 9011234567").unwrap();
        assert_eq!(m.value, "9011234567");
        assert_eq!(m.source, "9011234567");
    }

    #[test]
    fn test_plus_seven_is_consumed_not_kept() {
        let m = PhoneLocator::new().locate("Петров +7 (901) 123-45-67").unwrap();
        assert_eq!(m.value, "9011234567");
        assert_eq!(m.source, "+7 (901) 123-45-67");
    }

    #[test]
    fn test_separators_within_gap() {
        let m = PhoneLocator::new().locate("901 -123 -45- 67").unwrap();
        assert_eq!(m.value, "9011234567");
        assert!(PhoneLocator::new().locate("901 - 123 - 45 - 67").is_none());
    }

    #[test]
    fn test_gap_too_large() {
        assert!(PhoneLocator::new().locate("90112 и еще 34567").is_none());
    }

    #[test]
    fn test_nine_digits() {
        assert!(PhoneLocator::new().locate("тел. 901123456").is_none());
        assert!(PhoneLocator::new().locate("").is_none());
    }

    #[test]
    fn test_tail_scan_rejects_trailing_house_digits() {
        let text = "89011234567 ул. Ключевая д. 14, корп. 1, кв. 93";
        let tail = PhoneLocator::new().with_scan(PhoneScan::Tail);
        assert!(tail.locate(text).is_none());

        let m = PhoneLocator::new().locate(text).unwrap();
        assert_eq!(m.value, "89011234567");
        assert_eq!(m.span, Span::new(0, 11));
    }

    #[test]
    fn test_span_is_byte_accurate_after_cyrillic() {
        let text = "Сидоров 89217654321 кв";
        let m = PhoneLocator::new().locate(text).unwrap();
        assert_eq!(m.span.slice(text), "89217654321");
        assert_eq!(m.value, "89217654321");
    }

    #[test]
    fn test_custom_gap() {
        let locator = PhoneLocator::new().with_max_gap(1);
        assert!(locator.locate("901-123-45-67").is_none());
        assert!(locator.locate("9011234567").is_some());
    }
}
