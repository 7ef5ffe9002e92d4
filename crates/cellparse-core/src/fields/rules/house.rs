//! House descriptor resolution: building, block, letter and apartment.
//!
//! Grammars are tried strictly in list order and the first grammar that
//! matches anywhere in the text wins, even if a later grammar would have
//! matched further left. Order runs from the most specific forms (explicit
//! keywords, four components) down to a bare house number.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use super::patterns::{APARTMENT_GUARD, BARE_NUMBER_GUARD, CHAINED_NUMBER_TAIL};
use super::{FieldExtractor, FieldMatch, Span};

lazy_static! {
    static ref HOUSE_GRAMMARS: Vec<HouseGrammar> = house_grammars().unwrap();
}

/// How a grammar's captures are joined into a canonical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canonical {
    /// All captures joined with "-".
    Dashed,
    /// Capture `slot` (1-based) is a building letter: upper-cased and glued
    /// to the preceding capture, e.g. `14-1А-93`.
    LetterSuffix { slot: usize },
}

/// Emulated lookaround, checked against the text around a candidate match.
#[derive(Debug, Clone, Copy)]
enum Guard {
    None,
    /// Reject when the text after the match matches.
    NotFollowedBy(&'static Regex),
    /// Reject when the text before the first capture matches.
    NotPrecededBy(&'static Regex),
}

/// One house descriptor grammar.
#[derive(Debug, Clone)]
pub struct HouseGrammar {
    name: &'static str,
    pattern: Regex,
    canonical: Canonical,
    guard: Guard,
}

impl HouseGrammar {
    /// Compile a grammar. Matching is always case-insensitive.
    pub fn new(name: &'static str, pattern: &str, canonical: Canonical) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(&format!("(?i){}", pattern))?,
            canonical,
            guard: Guard::None,
        })
    }

    fn not_followed_by(mut self, guard: &'static Regex) -> Self {
        self.guard = Guard::NotFollowedBy(guard);
        self
    }

    fn not_preceded_by(mut self, guard: &'static Regex) -> Self {
        self.guard = Guard::NotPrecededBy(guard);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of captured components (1 to 4).
    pub fn arity(&self) -> usize {
        self.pattern.captures_len() - 1
    }

    pub fn canonical(&self) -> Canonical {
        self.canonical
    }

    /// First acceptable match of this grammar in `text`.
    ///
    /// A candidate rejected by the grammar's guard is retried after its
    /// first captured number. Restarting inside that number would accept a
    /// truncated copy of it ("12" read as "2").
    pub fn find(&self, text: &str) -> Option<FieldMatch<String>> {
        let mut from = 0;

        while from <= text.len() {
            let caps = self.pattern.captures_at(text, from)?;
            let whole = caps.get(0)?;
            let first = caps.get(1)?;

            let rejected = match self.guard {
                Guard::None => false,
                Guard::NotFollowedBy(guard) => guard.is_match(&text[whole.end()..]),
                Guard::NotPrecededBy(guard) => guard.is_match(&text[..first.start()]),
            };

            if !rejected {
                let groups: Vec<&str> = caps
                    .iter()
                    .skip(1)
                    .map(|g| g.map_or("", |m| m.as_str()))
                    .collect();
                let span = Span::new(whole.start(), whole.end());
                return Some(FieldMatch::new(self.canonicalize(&groups), text, span));
            }

            from = first.end();
        }

        None
    }

    /// Join captured components into the canonical token.
    pub fn canonicalize(&self, groups: &[&str]) -> String {
        let letter_idx = match self.canonical {
            Canonical::Dashed => None,
            Canonical::LetterSuffix { slot } => slot
                .checked_sub(1)
                .filter(|&idx| groups.get(idx).is_some_and(|g| is_letter(g))),
        };

        let mut token = String::new();
        for (idx, group) in groups.iter().enumerate() {
            if Some(idx) == letter_idx {
                token.push_str(&group.to_uppercase());
            } else {
                if !token.is_empty() {
                    token.push('-');
                }
                token.push_str(group);
            }
        }
        token
    }
}

fn is_letter(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

/// The ordered grammar list, most specific first.
fn house_grammars() -> Result<Vec<HouseGrammar>, regex::Error> {
    use Canonical::{Dashed, LetterSuffix};
    let letter = |slot| LetterSuffix { slot };

    Ok(vec![
        // 54-а-121
        HouseGrammar::new("hyphen_letter_hyphen", r"\s*(\d+)-([а-я])-(\d+)", letter(2))?
            .not_preceded_by(&CHAINED_NUMBER_TAIL),
        // д. 8/3/А кв. 189
        HouseGrammar::new(
            "keyword_slash_block_letter_apartment",
            r"\s*д\.?\s*(\d+)/(\d+)/([а-я])\s+кв\.?\s*(\d+)",
            letter(3),
        )?,
        // 110- А-422
        HouseGrammar::new("hyphen_spaced_letter_hyphen", r"\s*(\d+)-\s*([а-я])-(\d+)", letter(2))?
            .not_preceded_by(&CHAINED_NUMBER_TAIL),
        // 16 лит. А кв. 43
        HouseGrammar::new(
            "letter_keyword_apartment",
            r"\s*(\d+)\s+лит\.?\s+([а-я])\s+кв\.?\s*(\d+)",
            letter(2),
        )?,
        // д. 14, корп. 1, лит. А, кв. 93
        HouseGrammar::new(
            "keyword_building_block_letter_apartment",
            r"\s*д\.?\s*(\d+),\s*корп\.?\s*(\d+),\s*лит\.?\s*([а-я]),\s*кв\.?\s*(\d+)",
            letter(3),
        )?,
        // 27-2-А-17
        HouseGrammar::new(
            "dashed_block_letter_apartment",
            r"\s*(\d+)-(\d+)-([а-я])-(\d+)",
            letter(3),
        )?,
        // 5-2А-2
        HouseGrammar::new(
            "dashed_block_compact_letter_apartment",
            r"\s*(\d+)-(\d+)([а-я])-(\d+)",
            letter(3),
        )?,
        // 34 к.1, лит. А, кв. 64
        HouseGrammar::new(
            "short_block_letter_apartment",
            r"\s*(\d+)\s*к\.?\s*(\d+),\s*лит\.?\s*([а-я]),\s*кв\.?\s*(\d+)",
            letter(3),
        )?,
        // 54А-121
        HouseGrammar::new("compact_letter_apartment", r"\s*(\d+)([а-я])-(\d+)", letter(2))?,
        // пр., д.125, корп.3, кв.30
        HouseGrammar::new(
            "avenue_comma_building_block_apartment",
            r"пр\.,\s*д\.?\s*(\d+),\s*корп\.?\s*(\d+),\s*кв\.?\s*(\d+)",
            Dashed,
        )?,
        // д. 84, корп. 3, кв. 124
        HouseGrammar::new(
            "keyword_building_block_apartment",
            r"\s*д\.?\s*(\d+),\s*корп\.?\s*(\d+),\s*кв\.?\s*(\d+)",
            Dashed,
        )?,
        // д.6, к.1, кв.34
        HouseGrammar::new(
            "keyword_building_short_block_apartment",
            r"\s*д\.?\s*(\d+),\s*к\.?\s*(\d+),\s*кв\.?\s*(\d+)",
            Dashed,
        )?,
        // д. 6А кв. 31
        HouseGrammar::new(
            "keyword_compact_letter_apartment",
            r"\s*д\.?\s*(\d+)([а-я])\s+кв\.?\s*(\d+)",
            letter(2),
        )?,
        // д. 30/А кв. 85
        HouseGrammar::new(
            "keyword_slash_letter_apartment",
            r"\s*д\.?\s*(\d+)/([а-я])\s+кв\.?\s*(\d+)",
            letter(2),
        )?,
        // д. 24-А кв. 50
        HouseGrammar::new(
            "keyword_hyphen_letter_apartment",
            r"\s*д\.?\s*(\d+)-([а-я])\s+кв\.?\s*(\d+)",
            letter(2),
        )?,
        // д. 11/16, кв. 54
        HouseGrammar::new(
            "keyword_fraction_comma_apartment",
            r"\s*д\.?\s*(\d+)/(\d+),\s*кв\.?\s*(\d+)",
            Dashed,
        )?,
        // д. 130, кв. 231
        HouseGrammar::new(
            "keyword_building_comma_apartment",
            r"\s*д\.?\s*(\d+),\s*кв\.?\s*(\d+)",
            Dashed,
        )?,
        // д. 19 корп. 3 кв. 12
        HouseGrammar::new(
            "keyword_spaced_block_apartment",
            r"\s*д\.?\s+(\d+)\s+корп\.?\s+(\d+)\s+кв\.?\s+(\d+)",
            Dashed,
        )?,
        // д. 58 к. 1 кв. 28
        HouseGrammar::new(
            "keyword_spaced_short_block_apartment",
            r"\s*д\.?\s+(\d+)\s+к\.?\s+(\d+)\s+кв\.?\s+(\d+)",
            Dashed,
        )?,
        // д.14 кор.1 кв.204
        HouseGrammar::new(
            "keyword_kor_block_apartment",
            r"\s*д\.?\s*(\d+)\s*кор\.?\s*(\d+)\s*кв\.?\s*(\d+)",
            Dashed,
        )?,
        // д. 48/3 кв. 87
        HouseGrammar::new(
            "keyword_spaced_fraction_apartment",
            r"\s*д\.?\s+(\d+)/(\d+)\s+кв\.?\s+(\d+)",
            Dashed,
        )?,
        // д.19корп.3кв.12
        HouseGrammar::new(
            "keyword_glued_block_apartment",
            r"\s*д\.?(\d+)корп\.?(\d+)кв\.?(\d+)",
            Dashed,
        )?,
        // д.58к.1кв.28
        HouseGrammar::new(
            "keyword_glued_short_block_apartment",
            r"\s*д\.?(\d+)к\.?(\d+)кв\.?(\d+)",
            Dashed,
        )?,
        // 114-4-35
        HouseGrammar::new("dashed_building_block_apartment", r"\s*(\d+)-(\d+)-(\d+)", Dashed)?,
        // 14/3-82
        HouseGrammar::new("fraction_dash_apartment", r"\s*(\d+)/(\d+)-(\d+)", Dashed)?,
        // д. 14 кв. 5
        HouseGrammar::new(
            "keyword_building_apartment",
            r"\s*д\.?\s+(\d+)\s+(?:кв\.?|квартира)\s*(\d+)",
            Dashed,
        )?,
        // 14 кв. 5
        HouseGrammar::new(
            "building_apartment",
            r"\s*(\d+)\s+(?:кв\.?|квартира)\s*(\d+)",
            Dashed,
        )?,
        // 8/4 кв.34
        HouseGrammar::new(
            "fraction_apartment",
            r"\s*(\d+)/(\d+)\s+(?:кв\.?|квартира)\s*(\d+)",
            Dashed,
        )?,
        // , 99-110
        HouseGrammar::new("dashed_building_apartment", r"(?:,\s*)?(\d+)-(\d+)(?:\s|$|,)", Dashed)?,
        // д. 19 корп. 3
        HouseGrammar::new(
            "keyword_building_block",
            r"\s*д\.?\s+(\d+)\s+(?:корп\.?|кор\.?|к\.?)\s*(\d+)",
            Dashed,
        )?
        .not_followed_by(&APARTMENT_GUARD),
        // 19 корп. 3
        HouseGrammar::new(
            "building_block",
            r"\s*(\d+)\s+(?:корп\.?|кор\.?|к\.?)\s*(\d+)",
            Dashed,
        )?
        .not_followed_by(&APARTMENT_GUARD),
        // д. 15
        HouseGrammar::new("keyword_building", r"\s*д\.?\s+(\d+)", Dashed)?
            .not_followed_by(&BARE_NUMBER_GUARD),
        // 15
        HouseGrammar::new("building", r"\s*(\d+)", Dashed)?.not_followed_by(&BARE_NUMBER_GUARD),
    ])
}

/// House descriptor resolver over the shared grammar list.
#[derive(Debug, Clone, Copy)]
pub struct HouseResolver {
    grammars: &'static [HouseGrammar],
}

impl HouseResolver {
    pub fn new() -> Self {
        Self {
            grammars: &HOUSE_GRAMMARS,
        }
    }

    /// Grammars in priority order.
    pub fn grammars(&self) -> &'static [HouseGrammar] {
        self.grammars
    }

    /// Resolve the descriptor following a street name, reporting the winning grammar.
    pub fn resolve_with_grammar(
        &self,
        text: &str,
    ) -> Option<(&'static HouseGrammar, FieldMatch<String>)> {
        self.grammars.iter().find_map(|grammar| {
            grammar.find(text).map(|m| {
                trace!("House grammar {} matched {:?} -> {}", grammar.name(), m.source, m.value);
                (grammar, m)
            })
        })
    }

    /// Resolve the descriptor following a street name.
    ///
    /// `text` is everything after the street name, untrimmed. The returned
    /// span is relative to `text`.
    pub fn resolve(&self, text: &str) -> Option<FieldMatch<String>> {
        self.resolve_with_grammar(text).map(|(_, m)| m)
    }
}

impl Default for HouseResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for HouseResolver {
    type Output = FieldMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.resolve(text)
    }
}
