//! Remote dictionary resolver
//!
//! Looks up single words against an external phonetic dictionary with a
//! per-attempt timeout, linear backoff between attempts and endpoint
//! rotation. A 404 is a confirmed negative and is not retried; every other
//! failure is retried until the attempts run out, after which the
//! word degrades to `NotFound`.

pub mod extract;
pub mod http;
pub mod rotation;

pub use extract::{classify_audio, extract_dialects};
pub use http::HttpTransport;
pub use rotation::EndpointRotation;

use crate::types::PhoneticResult;
use async_trait::async_trait;
use phonetica_common::config::RemoteConfig;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Remote lookup errors
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Word not found")]
    NotFound,

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl RemoteError {
    /// Everything except a confirmed 404 is worth another attempt
    pub fn is_retryable(&self) -> bool {
        !matches!(self, RemoteError::NotFound)
    }
}

/// One phonetic entry as returned by the service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemotePhonetic {
    pub text: Option<String>,
    /// Audio clip URL; its file name carries the dialect hint
    pub audio: Option<String>,
}

/// Everything the service knows about one word's pronunciation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteWord {
    /// Word-level transcription without dialect
    pub phonetic: Option<String>,
    pub phonetics: Vec<RemotePhonetic>,
}

/// A single request against one endpoint
#[async_trait]
pub trait PhoneticTransport: Send + Sync {
    async fn fetch(&self, endpoint: &str, word: &str) -> Result<RemoteWord, RemoteError>;
}

/// Word-level remote lookup as seen by the resolution engine
#[async_trait]
pub trait RemoteLookup: Send + Sync {
    /// Never fails; unavailable data is `NotFound`
    async fn lookup(&self, key: &str) -> PhoneticResult;
}

/// Attempt limit and timing
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    /// Delay after failed attempt `n` (1-based) is `n * backoff_step`
    pub backoff_step: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RemoteConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            attempt_timeout: Duration::from_millis(config.attempt_timeout_ms),
            backoff_step: Duration::from_millis(config.backoff_step_ms),
        }
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RemoteConfig::default())
    }
}

pub struct RemoteResolver {
    transport: Arc<dyn PhoneticTransport>,
    endpoints: EndpointRotation,
    policy: RetryPolicy,
}

impl RemoteResolver {
    pub fn new(
        transport: Arc<dyn PhoneticTransport>,
        endpoints: EndpointRotation,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            endpoints,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn endpoints(&self) -> &EndpointRotation {
        &self.endpoints
    }

    /// Look up one word; never fails
    ///
    /// Empty keys and keys containing a space are not sent: phrases are
    /// resolved word by word upstream.
    pub async fn resolve(&self, key: &str) -> PhoneticResult {
        if key.is_empty() || key.contains(' ') {
            return PhoneticResult::not_found();
        }

        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<RemoteError> = None;

        for attempt in 1..=max_attempts {
            let endpoint = self.endpoints.current().to_string();

            let outcome = match tokio::time::timeout(
                self.policy.attempt_timeout,
                self.transport.fetch(&endpoint, key),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => Err(RemoteError::Timeout(self.policy.attempt_timeout)),
            };

            match outcome {
                Ok(word) => {
                    self.endpoints.record_success();
                    let result = extract_dialects(&word);
                    tracing::info!(
                        key = %key,
                        attempt,
                        us = %result.us,
                        uk = %result.uk,
                        "Remote lookup complete"
                    );
                    return result;
                }
                Err(e) if !e.is_retryable() => {
                    self.endpoints.record_success();
                    tracing::debug!(key = %key, attempt, "Remote dictionary has no entry");
                    return PhoneticResult::not_found();
                }
                Err(e) => {
                    self.endpoints.record_failure();

                    if attempt < max_attempts {
                        let backoff = self.policy.backoff(attempt);
                        tracing::warn!(
                            key = %key,
                            attempt,
                            endpoint = %endpoint,
                            backoff_ms = backoff.as_millis() as u64,
                            error = %e,
                            "Remote lookup failed, will retry after backoff"
                        );
                        tokio::time::sleep(backoff).await;
                    }

                    last_error = Some(e);
                }
            }
        }

        let last_error = last_error.map(|e| e.to_string()).unwrap_or_default();
        tracing::error!(
            key = %key,
            attempts = max_attempts,
            error = %last_error,
            "Remote lookup failed: retries exhausted"
        );
        PhoneticResult::not_found()
    }
}

#[async_trait]
impl RemoteLookup for RemoteResolver {
    async fn lookup(&self, key: &str) -> PhoneticResult {
        self.resolve(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phonetic;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::Mutex;

    /// Transport replaying scripted outcomes and recording requests
    struct ScriptedTransport {
        outcomes: Mutex<Vec<Result<RemoteWord, RemoteError>>>,
        calls: AtomicU32,
        endpoints_seen: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(mut outcomes: Vec<Result<RemoteWord, RemoteError>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                calls: AtomicU32::new(0),
                endpoints_seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PhoneticTransport for ScriptedTransport {
        async fn fetch(&self, endpoint: &str, _word: &str) -> Result<RemoteWord, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.endpoints_seen.lock().await.push(endpoint.to_string());
            self.outcomes
                .lock()
                .await
                .pop()
                .unwrap_or_else(|| Err(RemoteError::Network("script exhausted".into())))
        }
    }

    /// Transport that never answers
    struct HangingTransport {
        calls: AtomicU32,
    }

    #[async_trait]
    impl PhoneticTransport for HangingTransport {
        async fn fetch(&self, _endpoint: &str, _word: &str) -> Result<RemoteWord, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 4,
            attempt_timeout: Duration::from_millis(50),
            backoff_step: Duration::from_millis(1),
        }
    }

    fn resolver(transport: Arc<dyn PhoneticTransport>, endpoints: Vec<&str>) -> RemoteResolver {
        let endpoints = EndpointRotation::new(
            endpoints.into_iter().map(str::to_string).collect(),
            1,
        )
        .unwrap();
        RemoteResolver::new(transport, endpoints, fast_policy())
    }

    fn hello() -> RemoteWord {
        RemoteWord {
            phonetic: None,
            phonetics: vec![
                RemotePhonetic {
                    text: Some("/həˈloʊ/".into()),
                    audio: Some("hello-us.mp3".into()),
                },
                RemotePhonetic {
                    text: Some("/həˈləʊ/".into()),
                    audio: Some("hello-uk.mp3".into()),
                },
            ],
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.attempt_timeout, Duration::from_secs(5));
        assert_eq!(policy.backoff(1), Duration::from_millis(500));
        assert_eq!(policy.backoff(3), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(hello())]));
        let result = resolver(transport.clone(), vec!["http://a/"]).resolve("hello").await;

        assert_eq!(result.us, Phonetic::Found("/həˈloʊ/".into()));
        assert_eq!(result.uk, Phonetic::Found("/həˈləʊ/".into()));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_short_circuits() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(RemoteError::NotFound)]));
        let result = resolver(transport.clone(), vec!["http://a/"]).resolve("zzxq").await;

        assert!(result.is_empty());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(RemoteError::Network("connection reset".into())),
            Err(RemoteError::Api(503, "busy".into())),
            Ok(hello()),
        ]));
        let result = resolver(transport.clone(), vec!["http://a/"]).resolve("hello").await;

        assert!(result.is_complete());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_degrades_to_not_found() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let result = resolver(transport.clone(), vec!["http://a/"]).resolve("hello").await;

        assert!(result.is_empty());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_endpoint_rotates_between_attempts() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Err(RemoteError::Network("refused".into())),
            Err(RemoteError::Network("refused".into())),
            Ok(hello()),
        ]));
        resolver(transport.clone(), vec!["http://direct/", "http://proxy/"])
            .resolve("hello")
            .await;

        let seen = transport.endpoints_seen.lock().await.clone();
        assert_eq!(seen, vec!["http://direct/", "http://proxy/", "http://direct/"]);
    }

    #[tokio::test]
    async fn test_each_attempt_times_out() {
        let transport = Arc::new(HangingTransport {
            calls: AtomicU32::new(0),
        });
        let result = resolver(transport.clone(), vec!["http://a/"]).resolve("hello").await;

        assert!(result.is_empty());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_phrases_and_empty_keys_are_not_sent() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(hello())]));
        let resolver = resolver(transport.clone(), vec!["http://a/"]);

        assert!(resolver.resolve("").await.is_empty());
        assert!(resolver.resolve("look after").await.is_empty());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }
}
