//! Resolver settings resolution
//!
//! **Priority:** ENV → TOML → compiled defaults
//!
//! - `PHONETICA_REMOTE_ENDPOINTS`: comma-separated endpoint bases
//! - `PHONETICA_CACHE_MAX_ENTRIES`: cache bound

use crate::cache::{DurableSlot, PhoneticCache};
use crate::normalize::TokenizePolicy;
use crate::remote::{EndpointRotation, HttpTransport, RemoteResolver, RetryPolicy};
use phonetica_common::config::{TomlConfig, DEFAULT_CACHE_MAX_ENTRIES};
use phonetica_common::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub const ENDPOINTS_ENV: &str = "PHONETICA_REMOTE_ENDPOINTS";
pub const CACHE_MAX_ENTRIES_ENV: &str = "PHONETICA_CACHE_MAX_ENTRIES";

/// Fully resolved resolver settings
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    pub endpoints: Vec<String>,
    pub rotate_after: u32,
    pub retry: RetryPolicy,
    pub cache_max_entries: usize,
    pub persist_cache: bool,
    pub us_dictionary: PathBuf,
    pub uk_dictionary: PathBuf,
    pub tokenize_policy: TokenizePolicy,
}

impl ResolverSettings {
    /// Combine the TOML configuration with environment overrides
    pub fn resolve(toml_config: &TomlConfig) -> Self {
        let endpoints = match std::env::var(ENDPOINTS_ENV).ok().map(|v| parse_endpoints(&v)) {
            Some(list) if !list.is_empty() => {
                info!(count = list.len(), "Remote endpoints loaded from environment variable");
                list
            }
            Some(_) => {
                warn!("{} is set but lists no endpoints, ignoring", ENDPOINTS_ENV);
                toml_config.remote.endpoints.clone()
            }
            None => toml_config.remote.endpoints.clone(),
        };

        let cache_max_entries = match std::env::var(CACHE_MAX_ENTRIES_ENV) {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(
                        value = %value,
                        "Invalid {}, using configured cache size",
                        CACHE_MAX_ENTRIES_ENV
                    );
                    configured_cache_size(toml_config)
                }
            },
            Err(_) => configured_cache_size(toml_config),
        };

        Self {
            endpoints,
            rotate_after: toml_config.remote.rotate_after,
            retry: RetryPolicy::from_config(&toml_config.remote),
            cache_max_entries,
            persist_cache: toml_config.cache.persist,
            us_dictionary: toml_config.dictionary.us_path.clone(),
            uk_dictionary: toml_config.dictionary.uk_path.clone(),
            tokenize_policy: TokenizePolicy::AlwaysSplit,
        }
    }

    /// Remote resolver over HTTP with the configured rotation and retries
    pub fn remote_resolver(&self) -> Result<RemoteResolver> {
        let endpoints = EndpointRotation::new(self.endpoints.clone(), self.rotate_after)?;
        let transport = HttpTransport::new().map_err(|e| Error::Internal(e.to_string()))?;
        Ok(RemoteResolver::new(
            Arc::new(transport),
            endpoints,
            self.retry.clone(),
        ))
    }

    /// Cache persisted to `slot` when persistence is enabled
    pub fn cache(&self, slot: Option<Arc<dyn DurableSlot>>) -> PhoneticCache {
        match slot {
            Some(slot) if self.persist_cache => PhoneticCache::with_slot(self.cache_max_entries, slot),
            _ => PhoneticCache::new(self.cache_max_entries),
        }
    }
}

fn configured_cache_size(toml_config: &TomlConfig) -> usize {
    if toml_config.cache.max_entries == 0 {
        warn!("cache.max_entries = 0 is invalid, using default");
        DEFAULT_CACHE_MAX_ENTRIES
    } else {
        toml_config.cache.max_entries
    }
}

/// Split a comma-separated endpoint list, dropping blanks
pub fn parse_endpoints(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}
