//! Street catalog with longest-match-first lookup.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info};

use super::Span;
use crate::error::CatalogError;
use crate::models::config::CatalogConfig;
use crate::models::street::StreetEntry;

/// Built-in St Petersburg streets: (name, type marker).
pub const BUILTIN_STREETS: &[(&str, &str)] = &[
    ("Академика Байкова", "ул."),
    ("Академика Глушко", "аллея"),
    ("Академика Константинова", "ул."),
    ("Академика Лебедева", "ул."),
    ("Амурская", "ул."),
    ("Антоновская", "ул."),
    ("Арсенальная", "ул."),
    ("Архитектора Баранова", "ул."),
    ("Бестужевская", "ул."),
    ("Бобруйская", "ул."),
    ("Богословская", "ул."),
    ("Боткинская", "ул."),
    ("Брюсовская", "ул."),
    ("Брянцева", "ул."),
    ("Бутлерова", "ул."),
    ("Вавиловых", "ул."),
    ("Васенко", "ул."),
    ("Ватутина", "ул."),
    ("Веденеева", "ул."),
    ("Верности", "ул."),
    ("Верхняя", "ул."),
    ("Герасимовская", "ул."),
    ("Гжатская", "ул."),
    ("Гидротехников", "ул."),
    ("Гражданский", "пр."),
    ("Демьяна Бедного", "ул."),
    ("Жукова", "ул."),
    ("Замшина", "ул."),
    ("Карпинского", "ул."),
    ("Киришская", "ул."),
    ("Ключевая", "ул."),
    ("Комиссара Смирнова", "ул."),
    ("Комсомола", "ул."),
    ("Кондратьевский", "пр."),
    ("Культуры", "пр."),
    ("Кушелевская", "дор."),
    ("Лабораторная", "ул."),
    ("Лабораторный", "пр."),
    ("Лесной", "пр."),
    ("Литовская", "ул."),
    ("Лужская", "ул."),
    ("Луначарского", "пр."),
    ("Маршала Блюхера", "пр."),
    ("Менделеевская", "ул."),
    ("Меншиковский", "пр."),
    ("Металлистов", "пр."),
    ("Мечникова", "пр."),
    ("Минеральная", "ул."),
    ("Михайлова", "ул."),
    ("Нартовская", "ул."),
    ("Науки", "пр."),
    ("Нейшлотский", "пер."),
    ("Непокорённых", "пр."),
    ("Новороссийская", "ул."),
    ("Обручевых", "ул."),
    ("Ольги Форш", "ул."),
    ("Печорская", "ул."),
    ("Пискарёвский", "пр."),
    ("Политехническая", "ул."),
    ("Полюстровский", "пр."),
    ("Просвещения", "пр."),
    ("Рериха", "ул."),
    ("Руставели", "ул."),
    ("Свердловская", "наб."),
    ("Светлановский", "пр."),
    ("Северный", "пр."),
    ("Сибирская", "ул."),
    ("Софьи Ковалевской", "ул."),
    ("Старо-Муринская", "ул."),
    ("Старцева", "ул."),
    ("Суздальский", "пр."),
    ("Тимуровская", "ул."),
    ("Тихорецкий", "пр."),
    ("Токсовская", "ул."),
    ("Усыскина", "пер."),
    ("Учительская", "ул."),
    ("Ушинского", "ул."),
    ("Фаворского", "ул."),
    ("Федосеенко", "ул."),
    ("Феодосийская", "ул."),
    ("Финский", "пер."),
    ("Хлопина", "ул."),
    ("Черкасова", "ул."),
    ("Чичуринский", "пер."),
    ("Чугунная", "ул."),
];

lazy_static! {
    static ref BUILTIN: StreetCatalog = StreetCatalog::new(
        BUILTIN_STREETS
            .iter()
            .map(|(name, marker)| StreetEntry::new(*name, *marker))
    ).unwrap();
}

/// A street name found in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreetMatch<'a> {
    /// Catalog entry the match resolved to.
    pub entry: &'a StreetEntry,
    /// Position of the name in the searched text.
    pub span: Span,
}

/// Immutable street catalog.
///
/// Names are matched case-insensitively, whole-word, with "е" and "ё"
/// treated as the same letter. Longer names are always preferred over
/// shorter names they contain.
#[derive(Debug, Clone)]
pub struct StreetCatalog {
    /// Entries, longest name first.
    entries: Vec<StreetEntry>,
    by_key: HashMap<String, usize>,
    pattern: Regex,
}

impl StreetCatalog {
    /// Build a catalog from entries. Later entries override earlier ones with the same name.
    pub fn new(entries: impl IntoIterator<Item = StreetEntry>) -> Result<Self, CatalogError> {
        let mut unique: Vec<StreetEntry> = Vec::new();
        let mut seen: HashMap<String, usize> = HashMap::new();

        for entry in entries {
            validate_entry(&entry)?;
            let key = StreetEntry::lookup_key(&entry.name);
            match seen.get(&key).copied() {
                Some(idx) => unique[idx] = entry,
                None => {
                    seen.insert(key, unique.len());
                    unique.push(entry);
                }
            }
        }

        if unique.is_empty() {
            return Err(CatalogError::Empty);
        }

        unique.sort_by(|a, b| {
            b.name
                .chars()
                .count()
                .cmp(&a.name.chars().count())
                .then_with(|| a.name.cmp(&b.name))
        });

        let alternation = unique
            .iter()
            .map(|e| name_pattern(&e.name))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))?;

        let by_key = unique
            .iter()
            .enumerate()
            .map(|(idx, e)| (StreetEntry::lookup_key(&e.name), idx))
            .collect();

        debug!("Built street catalog with {} entries", unique.len());

        Ok(Self {
            entries: unique,
            by_key,
            pattern,
        })
    }

    /// The built-in St Petersburg catalog.
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Build the effective catalog: built-in table, catalog file, inline entries.
    pub fn from_config(config: &CatalogConfig) -> crate::Result<Self> {
        let mut extra: Vec<StreetEntry> = Vec::new();

        if let Some(file) = &config.file {
            let entries = load_entries(file)?;
            info!("Loaded {} streets from {}", entries.len(), file.display());
            extra.extend(entries);
        }
        extra.extend(config.extra_streets.iter().cloned());

        let catalog = if config.use_builtin {
            Self::builtin().with_entries(extra)?
        } else {
            Self::new(extra)?
        };
        Ok(catalog)
    }

    /// A new catalog with `extra` entries added on top of this one.
    pub fn with_entries(
        &self,
        extra: impl IntoIterator<Item = StreetEntry>,
    ) -> Result<Self, CatalogError> {
        Self::new(self.entries.iter().cloned().chain(extra))
    }

    /// Entries, longest name first.
    pub fn entries(&self) -> &[StreetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by name, ignoring case and е/ё.
    pub fn get(&self, name: &str) -> Option<&StreetEntry> {
        self.by_key
            .get(&StreetEntry::lookup_key(name))
            .map(|&idx| &self.entries[idx])
    }

    /// Find the leftmost street name in `text`, preferring the longest name at that position.
    pub fn find_longest_match(&self, text: &str) -> Option<StreetMatch<'_>> {
        self.pattern.find_iter(text).find_map(|m| {
            self.get(m.as_str()).map(|entry| StreetMatch {
                entry,
                span: Span::new(m.start(), m.end()),
            })
        })
    }
}

impl Default for StreetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Read street entries from a JSON array of `{"name", "type"}` objects.
fn load_entries(path: &Path) -> crate::Result<Vec<StreetEntry>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn validate_entry(entry: &StreetEntry) -> Result<(), CatalogError> {
    let invalid = |reason: &str| CatalogError::InvalidEntry {
        name: entry.name.clone(),
        reason: reason.to_string(),
    };

    if entry.name.trim().is_empty() {
        return Err(invalid("empty name"));
    }
    if entry.name.trim() != entry.name {
        return Err(invalid("leading or trailing whitespace"));
    }
    if entry.type_marker.trim().is_empty() {
        return Err(invalid("empty type marker"));
    }
    Ok(())
}

/// Escaped name where every е/ё accepts either spelling.
fn name_pattern(name: &str) -> String {
    regex::escape(name)
        .chars()
        .map(|c| match c {
            'е' | 'ё' | 'Е' | 'Ё' => "[её]".to_string(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CellparseError;

    fn catalog(entries: &[(&str, &str)]) -> StreetCatalog {
        StreetCatalog::new(entries.iter().map(|(n, t)| StreetEntry::new(*n, *t))).unwrap()
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = StreetCatalog::builtin();
        assert_eq!(catalog.len(), BUILTIN_STREETS.len());
        assert_eq!(catalog.get("науки").unwrap().type_marker, "пр.");
        assert_eq!(catalog.get("Кушелевская").unwrap().type_marker, "дор.");
    }

    #[test]
    fn test_entries_sorted_longest_first() {
        let catalog = StreetCatalog::builtin();
        let lengths: Vec<usize> = catalog
            .entries()
            .iter()
            .map(|e| e.name.chars().count())
            .collect();
        assert!(lengths.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_longest_match_wins() {
        let catalog = catalog(&[("Лесной", "пр."), ("Лесной Проезд", "ул.")]);
        let m = catalog.find_longest_match("дом на Лесной Проезд 5").unwrap();
        assert_eq!(m.entry.name, "Лесной Проезд");

        let m = catalog.find_longest_match("пр. Лесной 5").unwrap();
        assert_eq!(m.entry.name, "Лесной");
    }

    #[test]
    fn test_leftmost_match_is_used() {
        let catalog = StreetCatalog::builtin();
        let text = "ул. Замшина 5, пр. Науки 15";
        let m = catalog.find_longest_match(text).unwrap();
        assert_eq!(m.entry.name, "Замшина");
        assert_eq!(m.span.slice(text), "Замшина");
    }

    #[test]
    fn test_case_insensitive_and_yo() {
        let catalog = StreetCatalog::builtin();
        let text = "ПИСКАРЕВСКИЙ пр. 25";
        let m = catalog.find_longest_match(text).unwrap();
        assert_eq!(m.entry.name, "Пискарёвский");
        assert_eq!(m.span.slice(text), "ПИСКАРЕВСКИЙ");
    }

    #[test]
    fn test_whole_words_only() {
        let catalog = StreetCatalog::builtin();
        assert!(catalog.find_longest_match("Наукин Петр").is_none());
    }

    #[test]
    fn test_later_duplicate_overrides() {
        let catalog = catalog(&[("Арсенальная", "наб."), ("арсенальная", "ул.")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("Арсенальная").unwrap().type_marker, "ул.");
    }

    #[test]
    fn test_with_entries_extends() {
        let extended = StreetCatalog::builtin()
            .with_entries([StreetEntry::new("Тестовая", "ул.")])
            .unwrap();
        assert_eq!(extended.len(), BUILTIN_STREETS.len() + 1);
        assert!(extended.find_longest_match("ул. Тестовая 1").is_some());
    }

    #[test]
    fn test_invalid_entries() {
        assert!(matches!(
            StreetCatalog::new(Vec::new()),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            StreetCatalog::new([StreetEntry::new(" ", "ул.")]),
            Err(CatalogError::InvalidEntry { .. })
        ));
        assert!(matches!(
            StreetCatalog::new([StreetEntry::new("Тестовая", "")]),
            Err(CatalogError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn test_from_config_layers_file_and_inline_entries() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("streets.json");
        fs::write(&file, r#"[{"name": "Тестовая", "type": "наб."}]"#).unwrap();

        let config = CatalogConfig {
            use_builtin: false,
            file: Some(file),
            extra_streets: vec![StreetEntry::new("Проверочная", "ул.")],
        };
        let catalog = StreetCatalog::from_config(&config).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("тестовая").unwrap().type_marker, "наб.");

        let catalog = StreetCatalog::from_config(&CatalogConfig::default()).unwrap();
        assert_eq!(catalog.len(), BUILTIN_STREETS.len());
    }

    #[test]
    fn test_from_config_errors() {
        let empty = CatalogConfig {
            use_builtin: false,
            ..Default::default()
        };
        assert!(matches!(
            StreetCatalog::from_config(&empty),
            Err(CellparseError::Catalog(CatalogError::Empty))
        ));

        let missing = CatalogConfig {
            file: Some("/nonexistent/streets.json".into()),
            ..Default::default()
        };
        assert!(matches!(
            StreetCatalog::from_config(&missing),
            Err(CellparseError::Io(_))
        ));
    }
}
