//! Common regex patterns for record cell extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Street type token right before a street name ("ул.", "пр ", "проспект", ...)
    pub static ref STREET_PREFIX: Regex = Regex::new(
        r"(?i)\b(?:просп(?:ект)?|проезд|пр|улица|ул|аллея|б-р|бульвар|дорога|дор|набережная|наб|переулок|пер|площадь|пл)\.?\s*$"
    ).unwrap();

    // City token right before a street type or street name
    pub static ref CITY_PREFIX: Regex = Regex::new(
        r"(?i)(?:\bг\.\s*)?\b(?:спб|санкт-петербург)[,\s]*$"
    ).unwrap();

    // Rejects a bare house number that is really the head of a longer descriptor
    pub static ref BARE_NUMBER_GUARD: Regex = Regex::new(
        r"(?i)^(?:\s*[-/]\d|\s*к)"
    ).unwrap();

    // Rejects a building-block pair that is followed by an apartment
    pub static ref APARTMENT_GUARD: Regex = Regex::new(
        r"(?i)^\s*кв"
    ).unwrap();

    // Rejects a number that continues a dashed chain ("27-2-А-17")
    pub static ref CHAINED_NUMBER_TAIL: Regex = Regex::new(r"\d\s*-\s*$").unwrap();

    // Residual text cleanup
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    pub static ref REGISTERED_AND_RESIDING: Regex = Regex::new(
        r"(?i)\bзаре?г\.?\s+и\s+прож\.?"
    ).unwrap();

    pub static ref CITIZENSHIP: Regex = Regex::new(r"(?i)\bгражданство\b").unwrap();

    pub static ref RF_MARKER: Regex = Regex::new(r"\bР\s*Ф\b").unwrap();

    pub static ref PHONE_LABEL: Regex = Regex::new(r"(?i)\bтел\b\.?").unwrap();

    pub static ref CITY_REMNANT: Regex = Regex::new(
        r"(?i)(?:\bг\.\s*)?\b(?:спб|санкт-петербург)\b"
    ).unwrap();

    pub static ref CITY_ABBREV: Regex = Regex::new(r"\bг\.\s+").unwrap();

    pub static ref PUNCT_RUN: Regex = Regex::new(r"[,\-](?:\s*[,\-])+").unwrap();

    // Building letter post-pass (А, Б, В, Г only)
    pub static ref LETTER_BEFORE_DASH: Regex = Regex::new(r"(\d+)[АБВГ]-(\d+)").unwrap();

    pub static ref LETTER_AT_WORD_END: Regex = Regex::new(r"(\d+)[АБВГ](\s|$)").unwrap();
}
