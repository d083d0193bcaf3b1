//! Per-language disease tables with default-language fallback.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{MetadataConfig, MetadataSource};
use crate::error::Result;

use super::builtin::builtin_english_table;

/// Cause, precaution and cure notes for one class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseRecord {
    #[serde(default)]
    pub cause: Vec<String>,
    #[serde(default)]
    pub precaution: Vec<String>,
    #[serde(default)]
    pub cure: Vec<String>,
}

/// Class label -> record, for one language.
pub type DiseaseTable = HashMap<String, DiseaseRecord>;

/// Read-only metadata shared by every request.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    default_language: String,
    tables: HashMap<String, DiseaseTable>,
    enabled: bool,
}

impl MetadataStore {
    /// A store with no metadata at all; predictions carry no details.
    pub fn disabled(default_language: &str) -> Self {
        Self {
            default_language: normalize_language(default_language),
            tables: HashMap::new(),
            enabled: false,
        }
    }

    pub fn from_tables(default_language: &str, tables: HashMap<String, DiseaseTable>) -> Self {
        let tables = tables
            .into_iter()
            .map(|(code, table)| (normalize_language(&code), table))
            .collect();
        Self {
            default_language: normalize_language(default_language),
            tables,
            enabled: true,
        }
    }

    /// The bundled English table registered under `default_language`.
    pub fn builtin(default_language: &str) -> Self {
        let mut tables = HashMap::new();
        tables.insert(default_language.to_string(), builtin_english_table());
        Self::from_tables(default_language, tables)
    }

    /// Load every `<code>.json` file in `dir`, creating the directory if it
    /// does not exist yet.
    ///
    /// Files that fail to parse are skipped with a warning; their language
    /// then resolves through the default language.
    pub fn load_dir(dir: &Path, default_language: &str) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let mut tables = HashMap::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(code) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(normalize_language)
                .filter(|c| !c.is_empty())
            else {
                continue;
            };

            match read_table(&path) {
                Ok(table) => {
                    debug!("Loaded {} metadata entries for '{}'", table.len(), code);
                    tables.insert(code, table);
                }
                Err(e) => warn!("Skipping language file {}: {}", path.display(), e),
            }
        }

        let store = Self::from_tables(default_language, tables);

        if !store.tables.contains_key(&store.default_language) {
            warn!(
                "No metadata file for default language '{}' in {}; unmatched lookups will be empty",
                store.default_language,
                dir.display()
            );
        }
        info!(
            "Metadata loaded from {} ({} languages)",
            dir.display(),
            store.tables.len()
        );

        Ok(store)
    }

    pub fn from_config(config: &MetadataConfig) -> Result<Self> {
        match config.source {
            MetadataSource::Directory => {
                Self::load_dir(&config.languages_dir, &config.default_language)
            }
            MetadataSource::Builtin => Ok(Self::builtin(&config.default_language)),
            MetadataSource::None => Ok(Self::disabled(&config.default_language)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Language codes with a loaded table, sorted.
    pub fn languages(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.tables.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Resolve the record for `label` in `language`.
    ///
    /// Unknown languages fall back to the default language; unknown labels
    /// yield an empty record.
    pub fn resolve(&self, label: &str, language: &str) -> DiseaseRecord {
        let requested = normalize_language(language);
        let table = match self.tables.get(&requested) {
            Some(table) => Some(table),
            None => {
                if self.enabled && requested != self.default_language {
                    info!(
                        "Language file for '{}' not found. Falling back to '{}'.",
                        requested, self.default_language
                    );
                }
                self.tables.get(&self.default_language)
            }
        };

        table
            .and_then(|t| t.get(label))
            .cloned()
            .unwrap_or_default()
    }
}

fn read_table(path: &Path) -> Result<DiseaseTable> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn normalize_language(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn temp_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("leafcheck-{}-{}", tag, Uuid::new_v4()))
    }

    fn write_en(dir: &Path) {
        std::fs::write(
            dir.join("en.json"),
            r#"{
                "Tomato_Bacterial_spot": {
                    "cause": ["Xanthomonas species"],
                    "precaution": ["Crop rotation"],
                    "cure": ["Copper-based bactericides"]
                },
                "Potato___Early_blight": {"cause": ["Alternaria solani"]}
            }"#,
        )
        .unwrap();
    }

    #[test]
    fn unknown_language_falls_back_to_default() {
        let dir = temp_dir("fallback");
        std::fs::create_dir_all(&dir).unwrap();
        write_en(&dir);

        let store = MetadataStore::load_dir(&dir, "en").unwrap();
        let en = store.resolve("Tomato_Bacterial_spot", "en");
        let fr = store.resolve("Tomato_Bacterial_spot", "fr");
        assert_eq!(en, fr);
        assert_eq!(en.cause, vec!["Xanthomonas species".to_string()]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn fallback_is_logged() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        let store = MetadataStore::builtin("en");
        tracing::subscriber::with_default(subscriber, || {
            store.resolve("Tomato_Bacterial_spot", "en");
            assert!(!logs.text().contains("Falling back"));

            store.resolve("Tomato_Bacterial_spot", "fr");
        });

        let text = logs.text();
        assert!(text.contains("INFO"));
        assert!(text.contains("Language file for 'fr' not found. Falling back to 'en'."));
    }

    #[test]
    fn unknown_label_yields_empty_record() {
        let store = MetadataStore::builtin("en");
        let record = store.resolve("Tomato_healthy", "en");
        assert_eq!(record, DiseaseRecord::default());
        assert!(record.cause.is_empty() && record.precaution.is_empty() && record.cure.is_empty());
    }

    #[test]
    fn missing_fields_default_to_empty_lists() {
        let dir = temp_dir("partial");
        std::fs::create_dir_all(&dir).unwrap();
        write_en(&dir);

        let store = MetadataStore::load_dir(&dir, "en").unwrap();
        let record = store.resolve("Potato___Early_blight", "en");
        assert_eq!(record.cause.len(), 1);
        assert!(record.precaution.is_empty());
        assert!(record.cure.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = temp_dir("create");
        assert!(!dir.exists());

        let store = MetadataStore::load_dir(&dir, "en").unwrap();
        assert!(dir.is_dir());
        assert!(store.languages().is_empty());
        assert_eq!(store.resolve("Tomato_Bacterial_spot", "hi"), DiseaseRecord::default());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_is_skipped() {
        let dir = temp_dir("malformed");
        std::fs::create_dir_all(&dir).unwrap();
        write_en(&dir);
        std::fs::write(dir.join("mr.json"), "{ not json").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let store = MetadataStore::load_dir(&dir, "en").unwrap();
        assert_eq!(store.languages(), vec!["en".to_string()]);
        assert_eq!(
            store.resolve("Tomato_Bacterial_spot", "mr"),
            store.resolve("Tomato_Bacterial_spot", "en")
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn localized_table_is_preferred() {
        let mut hi = DiseaseTable::new();
        hi.insert(
            "Tomato_Early_blight".to_string(),
            DiseaseRecord {
                cause: vec!["अल्टरनेरिया सोलानी कवक".to_string()],
                ..Default::default()
            },
        );
        let mut tables = HashMap::new();
        tables.insert("en".to_string(), builtin_english_table());
        tables.insert("HI".to_string(), hi);

        let store = MetadataStore::from_tables("en", tables);
        assert_eq!(store.languages(), vec!["en".to_string(), "hi".to_string()]);
        let record = store.resolve("Tomato_Early_blight", " hi ");
        assert_eq!(record.cause, vec!["अल्टरनेरिया सोलानी कवक".to_string()]);
        assert!(record.cure.is_empty());
    }

    #[test]
    fn disabled_store_resolves_empty() {
        let store = MetadataStore::disabled("en");
        assert!(!store.is_enabled());
        assert_eq!(store.resolve("Tomato_Bacterial_spot", "en"), DiseaseRecord::default());
    }
}
