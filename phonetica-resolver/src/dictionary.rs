//! Local US/UK pronunciation dictionaries
//!
//! Both tables map a normalized word to raw transcription text (no
//! slashes). They are loaded once and never modified afterwards.

use crate::error::{ResolverError, ResolverResult};
use crate::types::{Dialect, Phonetic, PhoneticResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Word → raw transcription
pub type DictionaryTable = HashMap<String, String>;

/// Loaded US and UK tables
#[derive(Debug, Default)]
pub struct DictionaryTables {
    us: DictionaryTable,
    uk: DictionaryTable,
}

impl DictionaryTables {
    pub fn new(us: DictionaryTable, uk: DictionaryTable) -> Self {
        Self { us, uk }
    }

    pub fn len(&self, dialect: Dialect) -> usize {
        self.table(dialect).len()
    }

    fn table(&self, dialect: Dialect) -> &DictionaryTable {
        match dialect {
            Dialect::Us => &self.us,
            Dialect::Uk => &self.uk,
        }
    }

    fn entry(&self, dialect: Dialect, key: &str) -> Phonetic {
        self.table(dialect)
            .get(key)
            .map(|text| Phonetic::from_raw(text))
            .unwrap_or(Phonetic::NotFound)
    }

    /// Result for `key`, or `None` when neither table knows it
    pub fn lookup(&self, key: &str) -> Option<PhoneticResult> {
        let result = PhoneticResult::new(self.entry(Dialect::Us, key), self.entry(Dialect::Uk, key));
        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }
}

/// Where dictionary tables come from
#[async_trait]
pub trait DictionarySource: Send + Sync {
    async fn load(&self, dialect: Dialect) -> ResolverResult<DictionaryTable>;
}

/// JSON files shaped `{ "word": "transcription", ... }`
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    us_path: PathBuf,
    uk_path: PathBuf,
}

impl JsonFileSource {
    pub fn new(us_path: impl Into<PathBuf>, uk_path: impl Into<PathBuf>) -> Self {
        Self {
            us_path: us_path.into(),
            uk_path: uk_path.into(),
        }
    }
}

#[async_trait]
impl DictionarySource for JsonFileSource {
    async fn load(&self, dialect: Dialect) -> ResolverResult<DictionaryTable> {
        let path = match dialect {
            Dialect::Us => &self.us_path,
            Dialect::Uk => &self.uk_path,
        };

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ResolverError::DictionaryLoad {
                dialect,
                reason: format!("{}: {}", path.display(), e),
            })?;

        serde_json::from_str(&content).map_err(|e| ResolverError::DictionaryLoad {
            dialect,
            reason: format!("{}: {}", path.display(), e),
        })
    }
}

/// Tables already held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    us: DictionaryTable,
    uk: DictionaryTable,
}

impl StaticSource {
    pub fn new(us: DictionaryTable, uk: DictionaryTable) -> Self {
        Self { us, uk }
    }
}

#[async_trait]
impl DictionarySource for StaticSource {
    async fn load(&self, dialect: Dialect) -> ResolverResult<DictionaryTable> {
        Ok(match dialect {
            Dialect::Us => self.us.clone(),
            Dialect::Uk => self.uk.clone(),
        })
    }
}

/// Lazily loaded dictionary tables
///
/// Lookups before loading return `None`, exactly like a missing word.
#[derive(Default)]
pub struct LocalDictionary {
    tables: RwLock<Option<Arc<DictionaryTables>>>,
}

impl LocalDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary with tables already in place
    pub fn preloaded(tables: DictionaryTables) -> Self {
        Self {
            tables: RwLock::new(Some(Arc::new(tables))),
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.tables.read().await.is_some()
    }

    /// Load both tables from `source` unless already loaded
    pub async fn ensure_loaded(&self, source: &dyn DictionarySource) -> ResolverResult<()> {
        let mut tables = self.tables.write().await;
        if tables.is_some() {
            return Ok(());
        }

        tracing::info!("Loading local dictionaries");

        let (us, uk) = tokio::try_join!(source.load(Dialect::Us), source.load(Dialect::Uk))
            .inspect_err(|e| tracing::error!(error = %e, "Dictionary load failed"))?;

        tracing::info!(
            us_words = us.len(),
            uk_words = uk.len(),
            "Local dictionaries loaded"
        );

        *tables = Some(Arc::new(DictionaryTables::new(us, uk)));
        Ok(())
    }

    pub async fn lookup(&self, key: &str) -> Option<PhoneticResult> {
        let tables = match self.tables.read().await.as_ref() {
            Some(tables) => Arc::clone(tables),
            None => {
                tracing::warn!(key = %key, "Local dictionary not loaded yet");
                return None;
            }
        };

        let result = tables.lookup(key);
        if result.is_some() {
            tracing::debug!(key = %key, "Local dictionary hit");
        } else {
            tracing::debug!(key = %key, "Local dictionary miss");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> DictionaryTable {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_lookup_wraps_found_entries() {
        let tables = DictionaryTables::new(
            table(&[("hello", "h-eh-l-oh")]),
            table(&[("hello", "həˈləʊ"), ("colour", "ˈkʌlə")]),
        );

        let hello = tables.lookup("hello").unwrap();
        assert_eq!(hello.us, Phonetic::Found("/h-eh-l-oh/".into()));
        assert_eq!(hello.uk, Phonetic::Found("/həˈləʊ/".into()));

        let colour = tables.lookup("colour").unwrap();
        assert_eq!(colour.us, Phonetic::NotFound);
        assert_eq!(colour.uk, Phonetic::Found("/ˈkʌlə/".into()));
    }

    #[test]
    fn test_lookup_absent_when_neither_table_has_word() {
        let tables = DictionaryTables::new(table(&[("a", "ə")]), DictionaryTable::new());
        assert_eq!(tables.lookup("zzz"), None);
    }

    #[test]
    fn test_blank_entries_count_as_missing() {
        let tables = DictionaryTables::new(table(&[("odd", "")]), DictionaryTable::new());
        assert_eq!(tables.lookup("odd"), None);
    }

    #[tokio::test]
    async fn test_lookup_before_load_is_absent() {
        let dictionary = LocalDictionary::new();
        assert!(!dictionary.is_loaded().await);
        assert_eq!(dictionary.lookup("hello").await, None);
    }

    #[tokio::test]
    async fn test_ensure_loaded_from_static_source() {
        let dictionary = LocalDictionary::new();
        let source = StaticSource::new(table(&[("cat", "kæt")]), table(&[("cat", "kæt")]));

        dictionary.ensure_loaded(&source).await.unwrap();
        assert!(dictionary.is_loaded().await);
        assert!(dictionary.lookup("cat").await.unwrap().is_complete());
    }

    #[tokio::test]
    async fn test_missing_file_is_load_error() {
        let dictionary = LocalDictionary::new();
        let source = JsonFileSource::new("/nonexistent/us.json", "/nonexistent/uk.json");

        let err = dictionary.ensure_loaded(&source).await.unwrap_err();
        assert!(matches!(err, ResolverError::DictionaryLoad { .. }));
        assert!(!dictionary.is_loaded().await);
    }
}
