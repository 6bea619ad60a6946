//! Shared resolution state
//!
//! `ResolutionContext` owns the local dictionaries and the phonetics cache.
//! Each context is independent, so tests build a fresh one instead of
//! sharing process-wide state.

use crate::cache::PhoneticCache;
use crate::dictionary::{DictionarySource, DictionaryTables, LocalDictionary, StaticSource};
use crate::error::ResolverResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct ResolutionContext {
    dictionary: LocalDictionary,
    dictionary_source: Arc<dyn DictionarySource>,
    cache: PhoneticCache,
    cache_restored: AtomicBool,
}

impl ResolutionContext {
    /// Context whose dictionaries load from `source` on first use
    pub fn new(dictionary_source: Arc<dyn DictionarySource>, cache: PhoneticCache) -> Self {
        Self {
            dictionary: LocalDictionary::new(),
            dictionary_source,
            cache,
            cache_restored: AtomicBool::new(false),
        }
    }

    /// Context with dictionaries already loaded
    pub fn with_tables(tables: DictionaryTables, cache: PhoneticCache) -> Self {
        Self {
            dictionary: LocalDictionary::preloaded(tables),
            dictionary_source: Arc::new(StaticSource::default()),
            cache,
            cache_restored: AtomicBool::new(false),
        }
    }

    pub fn dictionary(&self) -> &LocalDictionary {
        &self.dictionary
    }

    pub fn cache(&self) -> &PhoneticCache {
        &self.cache
    }

    /// Load dictionaries (fatal on failure), then restore the persisted
    /// cache (never fatal). Safe to call repeatedly.
    pub async fn initialize(&self) -> ResolverResult<()> {
        self.dictionary
            .ensure_loaded(self.dictionary_source.as_ref())
            .await?;

        if !self.cache_restored.swap(true, Ordering::SeqCst) {
            self.cache.load_persisted().await;
        }

        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        self.dictionary.is_loaded().await && self.cache_restored.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{DurableSlot, MemorySlot, CACHE_SLOT_KEY};
    use crate::dictionary::JsonFileSource;

    #[tokio::test]
    async fn test_initialize_restores_persisted_cache() {
        let slot = Arc::new(MemorySlot::new());
        slot.write(
            CACHE_SLOT_KEY,
            r#"[{"word":"cat","us":"/kæt/","uk":"/kæt/"}]"#,
        )
        .await
        .unwrap();

        let context = ResolutionContext::new(
            Arc::new(StaticSource::default()),
            PhoneticCache::with_slot(10, slot),
        );
        assert!(!context.is_initialized().await);

        context.initialize().await.unwrap();
        context.initialize().await.unwrap();

        assert!(context.is_initialized().await);
        assert_eq!(context.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_dictionary_failure_propagates() {
        let context = ResolutionContext::new(
            Arc::new(JsonFileSource::new("/missing/us.json", "/missing/uk.json")),
            PhoneticCache::new(10),
        );

        assert!(context.initialize().await.is_err());
        assert!(!context.is_initialized().await);
    }
}
