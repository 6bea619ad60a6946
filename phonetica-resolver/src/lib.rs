//! phonetica-resolver library interface
//!
//! Resolves US and UK phonetic transcriptions for batches of raw words,
//! consulting an in-memory cache, the local dictionaries and a remote
//! dictionary service in that order.

pub mod batch;
pub mod cache;
pub mod config;
pub mod context;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod remote;
pub mod types;

pub use crate::batch::BatchCoordinator;
pub use crate::context::ResolutionContext;
pub use crate::engine::ResolutionEngine;
pub use crate::error::{ResolverError, ResolverResult};
pub use crate::types::{BatchItem, Dialect, Phonetic, PhoneticResult};
