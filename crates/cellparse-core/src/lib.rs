//! Core library for splitting free-form Russian record text into fields.
//!
//! This crate provides:
//! - Phone number location by digit-run analysis
//! - A street catalog with longest-match lookup
//! - An ordered house descriptor grammar cascade
//! - Address extraction and residual text cleanup
//! - A field router tying them together per record

pub mod error;
pub mod fields;
pub mod models;

pub use error::{CatalogError, CellparseError, Result};
pub use fields::rules::{
    AddressExtractor, FieldExtractor, FieldMatch, FormattedAddress, HouseResolver, PhoneLocator,
    ResidualCleaner, Span, StreetCatalog,
};
pub use fields::{ExtractionResult, FieldRouter, RecordParser};
pub use models::config::{CellparseConfig, PhoneScan};
pub use models::record::RecordFields;
pub use models::street::StreetEntry;
