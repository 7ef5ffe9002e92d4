//! Record field extraction module.

mod router;
pub mod rules;

pub use router::{ExtractionResult, FieldRouter};

/// Trait for record parsing.
pub trait RecordParser {
    /// Split one free-form record into its fields. Absent or blank input yields no fields.
    fn parse(&self, text: Option<&str>) -> ExtractionResult;
}
