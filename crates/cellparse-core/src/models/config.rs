//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::street::StreetEntry;
use crate::error::CellparseError;

/// Main configuration for cellparse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellparseConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Street catalog configuration.
    pub catalog: CatalogConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,
}

/// How the phone locator chooses its 10-digit window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneScan {
    /// Only the final 10 digits of the text are considered.
    Tail,
    /// The rightmost run of 10 digits that satisfies the gap rule.
    #[default]
    Rightmost,
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Phone window selection.
    pub phone_scan: PhoneScan,

    /// Maximum distance in characters between consecutive phone digits.
    pub max_phone_gap: usize,

    /// Drop building letters (А, Б, В, Г) from formatted addresses.
    pub strip_building_letters: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            phone_scan: PhoneScan::default(),
            max_phone_gap: 3,
            strip_building_letters: false,
        }
    }
}

/// Street catalog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Start from the built-in street table.
    pub use_builtin: bool,

    /// JSON file with additional entries.
    pub file: Option<PathBuf>,

    /// Inline additional entries.
    pub extra_streets: Vec<StreetEntry>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            use_builtin: true,
            file: None,
            extra_streets: Vec::new(),
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// CSV header of the column holding the free-form text.
    pub text_column: String,

    /// Number of parallel workers.
    pub jobs: usize,

    /// Blank the source cell once at least one field was extracted.
    pub clear_source: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            text_column: "text".to_string(),
            jobs: 4,
            clear_source: true,
        }
    }
}

impl CellparseConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> crate::Result<()> {
        if self.extraction.max_phone_gap == 0 {
            return Err(CellparseError::Config(
                "extraction.max_phone_gap must be at least 1".to_string(),
            ));
        }
        if self.batch.jobs == 0 {
            return Err(CellparseError::Config(
                "batch.jobs must be at least 1".to_string(),
            ));
        }
        if self.batch.text_column.trim().is_empty() {
            return Err(CellparseError::Config(
                "batch.text_column must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CellparseConfig::default();
        assert_eq!(config.extraction.phone_scan, PhoneScan::Rightmost);
        assert_eq!(config.extraction.max_phone_gap, 3);
        assert!(!config.extraction.strip_building_letters);
        assert!(config.catalog.use_builtin);
        assert_eq!(config.batch.text_column, "text");
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let json = r#"{"extraction": {"phone_scan": "tail"}}"#;
        let config: CellparseConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.extraction.phone_scan, PhoneScan::Tail);
        assert_eq!(config.extraction.max_phone_gap, 3);
        assert_eq!(config.batch.jobs, 4);
    }

    #[test]
    fn test_validate() {
        assert!(CellparseConfig::default().validate().is_ok());

        let mut config = CellparseConfig::default();
        config.extraction.max_phone_gap = 0;
        assert!(matches!(config.validate(), Err(CellparseError::Config(_))));

        let mut config = CellparseConfig::default();
        config.batch.text_column = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_errors_are_typed() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            CellparseConfig::from_file(&missing),
            Err(CellparseError::Io(_))
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            CellparseConfig::from_file(&broken),
            Err(CellparseError::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CellparseConfig::default();
        config.extraction.strip_building_letters = true;
        config.catalog.extra_streets.push(StreetEntry::new("Тестовая", "ул."));
        config.save(&path).unwrap();

        let loaded = CellparseConfig::from_file(&path).unwrap();
        assert!(loaded.extraction.strip_building_letters);
        assert_eq!(loaded.catalog.extra_streets.len(), 1);
        assert_eq!(loaded.catalog.extra_streets[0].name, "Тестовая");
    }
}
