//! Bounded phonetics cache with write-through persistence
//!
//! Entries are evicted in insertion order (FIFO). Every accepted write
//! stores the whole cache in a `DurableSlot`; persistence failures are
//! logged and otherwise ignored.

pub mod slot;

pub use slot::{DurableSlot, MemorySlot, SqliteSlot};

use crate::types::{Phonetic, PhoneticResult};
use phonetica_common::config::DEFAULT_CACHE_MAX_ENTRIES;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Slot key holding the serialized cache
pub const CACHE_SLOT_KEY: &str = "phonetics_cache";

/// Persisted form of one entry; the list keeps insertion order
#[derive(Debug, Serialize, Deserialize)]
struct PersistedEntry {
    word: String,
    us: Phonetic,
    uk: Phonetic,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<String, PhoneticResult>,
    /// Keys, oldest first
    order: VecDeque<String>,
}

impl CacheInner {
    fn snapshot(&self) -> Vec<PersistedEntry> {
        self.order
            .iter()
            .filter_map(|word| {
                self.entries.get(word).map(|result| PersistedEntry {
                    word: word.clone(),
                    us: result.us.clone(),
                    uk: result.uk.clone(),
                })
            })
            .collect()
    }

    fn evict_front(&mut self, count: usize) -> usize {
        let mut evicted = 0;
        while evicted < count {
            match self.order.pop_front() {
                Some(word) => {
                    self.entries.remove(&word);
                    evicted += 1;
                }
                None => break,
            }
        }
        evicted
    }
}

/// Normalized key → phonetic result memo
pub struct PhoneticCache {
    inner: Mutex<CacheInner>,
    max_entries: usize,
    slot: Option<Arc<dyn DurableSlot>>,
}

impl PhoneticCache {
    /// Cache without persistence
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(CacheInner::default()),
            max_entries: max_entries.max(1),
            slot: None,
        }
    }

    /// Cache persisted to `slot` after every write
    pub fn with_slot(max_entries: usize, slot: Arc<dyn DurableSlot>) -> Self {
        Self {
            slot: Some(slot),
            ..Self::new(max_entries)
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Entries removed per overflow: 10% of the bound, at least one
    pub fn eviction_batch(&self) -> usize {
        (self.max_entries / 10).max(1)
    }

    pub async fn get(&self, key: &str) -> Option<PhoneticResult> {
        let inner = self.inner.lock().await;
        let hit = inner.entries.get(key).cloned();
        if hit.is_some() {
            tracing::debug!(key = %key, "Cache hit");
        } else {
            tracing::debug!(key = %key, "Cache miss");
        }
        hit
    }

    /// Store `result` under `key`
    ///
    /// Results with both dialects `NotFound` are rejected so a later remote
    /// lookup can still fill them. Returns whether the entry was stored.
    pub async fn put(&self, key: &str, result: PhoneticResult) -> bool {
        if result.is_empty() {
            tracing::debug!(key = %key, "Not caching empty result");
            return false;
        }

        let mut inner = self.inner.lock().await;

        if inner.entries.insert(key.to_string(), result).is_none() {
            inner.order.push_back(key.to_string());
        }

        if inner.entries.len() > self.max_entries {
            let evicted = inner.evict_front(self.eviction_batch());
            tracing::debug!(
                evicted,
                max_entries = self.max_entries,
                "Cache over capacity, evicted oldest entries"
            );
        }

        tracing::debug!(key = %key, "Saved to cache");

        // Lock stays held so snapshots reach the slot in write order
        if self.slot.is_some() {
            self.persist(inner.snapshot()).await;
        }

        true
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Cached keys, oldest first
    pub async fn keys(&self) -> Vec<String> {
        self.inner.lock().await.order.iter().cloned().collect()
    }

    /// Merge previously persisted entries into the cache
    ///
    /// Entries already present (computed this session) win over persisted
    /// ones. Persisted-only entries are treated as older than everything
    /// in memory. Returns the number of entries taken from the slot.
    pub async fn load_persisted(&self) -> usize {
        let Some(slot) = &self.slot else {
            return 0;
        };

        let raw = match slot.read(CACHE_SLOT_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return 0,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted phonetics cache");
                return 0;
            }
        };

        let persisted: Vec<PersistedEntry> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable persisted phonetics cache");
                return 0;
            }
        };

        let mut inner = self.inner.lock().await;
        let mut seen: HashSet<String> = HashSet::new();
        let mut merged_order = VecDeque::with_capacity(persisted.len() + inner.order.len());
        let mut loaded = 0;

        for entry in persisted {
            let result = PhoneticResult::new(entry.us, entry.uk);
            if result.is_empty()
                || inner.entries.contains_key(&entry.word)
                || !seen.insert(entry.word.clone())
            {
                continue;
            }
            merged_order.push_back(entry.word.clone());
            inner.entries.insert(entry.word, result);
            loaded += 1;
        }

        merged_order.extend(inner.order.drain(..));
        inner.order = merged_order;

        let excess = inner.entries.len().saturating_sub(self.max_entries);
        if excess > 0 {
            inner.evict_front(excess);
        }

        tracing::info!(loaded, total = inner.entries.len(), "Loaded persisted phonetics cache");
        loaded
    }

    async fn persist(&self, snapshot: Vec<PersistedEntry>) {
        let Some(slot) = &self.slot else {
            return;
        };

        let json = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize phonetics cache");
                return;
            }
        };

        if let Err(e) = slot.write(CACHE_SLOT_KEY, &json).await {
            tracing::warn!(error = %e, "Failed to persist phonetics cache");
        }
    }
}

impl Default for PhoneticCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_MAX_ENTRIES)
    }
}
