//! Endpoint rotation for the remote dictionary service
//!
//! Holds an ordered list of base URLs (direct API, proxies, mirrors) and a
//! cursor. After `rotate_after` consecutive failures the cursor moves to the
//! next base, wrapping around.

use phonetica_common::{Error, Result};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

pub struct EndpointRotation {
    endpoints: Vec<String>,
    rotate_after: u32,
    cursor: AtomicUsize,
    consecutive_failures: AtomicU32,
}

impl EndpointRotation {
    pub fn new(endpoints: Vec<String>, rotate_after: u32) -> Result<Self> {
        let endpoints: Vec<String> = endpoints
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();

        if endpoints.is_empty() {
            return Err(Error::InvalidInput(
                "at least one remote endpoint is required".to_string(),
            ));
        }

        Ok(Self {
            endpoints,
            rotate_after: rotate_after.max(1),
            cursor: AtomicUsize::new(0),
            consecutive_failures: AtomicU32::new(0),
        })
    }

    /// Single fixed endpoint
    pub fn single(endpoint: impl Into<String>) -> Result<Self> {
        Self::new(vec![endpoint.into()], 1)
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn current(&self) -> &str {
        &self.endpoints[self.cursor.load(Ordering::Relaxed) % self.endpoints.len()]
    }

    pub fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::Relaxed);
    }

    /// Count a failed attempt; rotates once the threshold is reached
    pub fn record_failure(&self) {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        if failures < self.rotate_after {
            return;
        }

        self.consecutive_failures.store(0, Ordering::Relaxed);
        if self.endpoints.len() < 2 {
            return;
        }

        let next = (self.cursor.load(Ordering::Relaxed) + 1) % self.endpoints.len();
        self.cursor.store(next, Ordering::Relaxed);
        tracing::info!(
            failures,
            endpoint = %self.endpoints[next],
            "Rotating remote dictionary endpoint"
        );
    }
}
