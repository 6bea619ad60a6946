//! Error types for phonetica-resolver
//!
//! Only initialization can fail a batch. Per-word resolution never returns
//! an error; remote and persistence failures degrade to `NotFound` or are
//! logged.

use crate::types::Dialect;
use thiserror::Error;

/// Resolver error type
#[derive(Debug, Error)]
pub enum ResolverError {
    /// Local dictionary could not be loaded (fatal for the batch)
    #[error("Failed to load {dialect} dictionary: {reason}")]
    DictionaryLoad { dialect: Dialect, reason: String },
}

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, ResolverError>;
