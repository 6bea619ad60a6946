//! # Phonetica Common Library
//!
//! Shared code for the Phonetica crates including:
//! - Error types
//! - TOML configuration loading and root folder resolution
//! - SQLite key-value settings storage

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
