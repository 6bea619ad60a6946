//! Sequential batch resolution with progress reporting
//!
//! Words are resolved strictly one after another: progress counts stay
//! exact and the remote service never sees concurrent requests from us.

use crate::context::ResolutionContext;
use crate::engine::ResolutionEngine;
use crate::error::ResolverResult;
use crate::types::{BatchItem, PhoneticResult};

pub struct BatchCoordinator {
    engine: ResolutionEngine,
}

impl BatchCoordinator {
    pub fn new(engine: ResolutionEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ResolutionEngine {
        &self.engine
    }

    /// Resolve `words` in order, one result per word
    ///
    /// `on_progress(completed, total)` runs after every word. The only
    /// error is a failed dictionary initialization, raised before any word
    /// is processed.
    pub async fn resolve_batch<S, F>(
        &self,
        ctx: &ResolutionContext,
        words: &[S],
        on_progress: F,
    ) -> ResolverResult<Vec<PhoneticResult>>
    where
        S: AsRef<str>,
        F: FnMut(usize, usize),
    {
        let mut items: Vec<BatchItem> = words.iter().map(|w| BatchItem::new(w.as_ref())).collect();
        self.resolve_items(ctx, &mut items, on_progress).await?;

        Ok(items
            .into_iter()
            .map(|item| item.result.unwrap_or_default())
            .collect())
    }

    /// Fill each item's result slot in place
    pub async fn resolve_items<F>(
        &self,
        ctx: &ResolutionContext,
        items: &mut [BatchItem],
        mut on_progress: F,
    ) -> ResolverResult<()>
    where
        F: FnMut(usize, usize),
    {
        let total = items.len();
        tracing::info!(total, "Starting batch phonetics lookup");

        if let Err(e) = ctx.initialize().await {
            tracing::error!(error = %e, "Phonetics initialization failed");
            return Err(e);
        }

        for (index, item) in items.iter_mut().enumerate() {
            item.result = Some(self.engine.resolve_phrase(ctx, &item.word).await);
            on_progress(index + 1, total);
        }

        let found = items
            .iter()
            .filter(|item| item.result.as_ref().is_some_and(|r| !r.is_empty()))
            .count();
        tracing::info!(total, found, "Batch phonetics lookup complete");

        Ok(())
    }
}
