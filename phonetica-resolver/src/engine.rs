//! Tiered resolution of words and phrases
//!
//! Single tokens go cache → local dictionary → remote. A tier only ends
//! the lookup when it yields a complete (US and UK) result; otherwise the
//! remote service is asked to fill the gaps and the results are merged
//! per dialect.

use crate::context::ResolutionContext;
use crate::normalize::{normalize, Tokenizer};
use crate::remote::RemoteLookup;
use crate::types::{Phonetic, PhoneticResult};
use std::sync::Arc;

pub struct ResolutionEngine {
    tokenizer: Tokenizer,
    remote: Arc<dyn RemoteLookup>,
}

impl ResolutionEngine {
    pub fn new(tokenizer: Tokenizer, remote: Arc<dyn RemoteLookup>) -> Self {
        Self { tokenizer, remote }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Resolve one normalized token
    pub async fn resolve_token(&self, ctx: &ResolutionContext, key: &str) -> PhoneticResult {
        if key.is_empty() {
            return PhoneticResult::not_found();
        }

        // 1. Cache
        let cached = ctx.cache().get(key).await;
        if let Some(result) = &cached {
            if result.is_complete() {
                return result.clone();
            }
        }

        // 2. Local dictionary
        let local = ctx.dictionary().lookup(key).await;
        if let Some(result) = &local {
            if result.is_complete() {
                ctx.cache().put(key, result.clone()).await;
                return result.clone();
            }
        }

        // 3. Remote, filling whatever is still missing
        tracing::debug!(key = %key, "Incomplete local data, querying remote");
        let remote = self.remote.lookup(key).await;

        let local = local.unwrap_or_default();
        let cached = cached.unwrap_or_default();
        let merged = PhoneticResult::new(
            remote.us.or(local.us).or(cached.us),
            remote.uk.or(local.uk).or(cached.uk),
        );

        ctx.cache().put(key, merged.clone()).await;
        merged
    }

    /// Resolve a raw word or phrase
    ///
    /// Multi-word phrases are resolved token by token and the found
    /// transcriptions are joined per dialect: `look after` →
    /// `/lʊk ˈɑːftə/`. A dialect with no contributing token is `NotFound`.
    pub async fn resolve_phrase(&self, ctx: &ResolutionContext, raw: &str) -> PhoneticResult {
        let key = normalize(raw);
        if key.is_empty() {
            return PhoneticResult::not_found();
        }

        tracing::info!(word = %raw, key = %key, "Resolving phonetics");

        let tokens = self.tokenizer.tokenize(&key);
        if tokens.len() == 1 {
            return self.resolve_token(ctx, &tokens[0]).await;
        }

        let mut us_parts: Vec<String> = Vec::new();
        let mut uk_parts: Vec<String> = Vec::new();

        for token in &tokens {
            let result = self.resolve_token(ctx, token).await;
            if let Some(text) = result.us.inner() {
                us_parts.push(text.to_string());
            }
            if let Some(text) = result.uk.inner() {
                uk_parts.push(text.to_string());
            }
        }

        PhoneticResult::new(join_parts(&us_parts), join_parts(&uk_parts))
    }
}

fn join_parts(parts: &[String]) -> Phonetic {
    if parts.is_empty() {
        Phonetic::NotFound
    } else {
        Phonetic::from_raw(&parts.join(" "))
    }
}
