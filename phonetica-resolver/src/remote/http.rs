//! reqwest transport for dictionaryapi.dev-style services
//!
//! Response shape (only the fields used here):
//!
//! ```json
//! [
//!   {
//!     "word": "hello",
//!     "phonetic": "həˈləʊ",
//!     "phonetics": [
//!       { "text": "/həˈləʊ/", "audio": "https://.../hello-uk.mp3" },
//!       { "text": "/həˈloʊ/", "audio": "https://.../hello-us.mp3" }
//!     ]
//!   }
//! ]
//! ```

use super::{PhoneticTransport, RemoteError, RemotePhonetic, RemoteWord};
use async_trait::async_trait;
use serde::Deserialize;

const USER_AGENT: &str = concat!("phonetica/", env!("CARGO_PKG_VERSION"));

/// Placeholder replaced by the word in endpoint templates
pub const WORD_PLACEHOLDER: &str = "{word}";

#[derive(Debug, Deserialize)]
struct ApiEntry {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<ApiPhonetic>,
}

#[derive(Debug, Deserialize)]
struct ApiPhonetic {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    audio: Option<String>,
}

/// Build the request URL for `word`
///
/// Endpoints containing `{word}` are treated as templates (useful for
/// proxies that take the target URL as a query parameter); otherwise the
/// word is appended to the base.
pub fn request_url(endpoint: &str, word: &str) -> String {
    if endpoint.contains(WORD_PLACEHOLDER) {
        endpoint.replace(WORD_PLACEHOLDER, word)
    } else {
        format!("{}{}", endpoint, word)
    }
}

/// Flatten all dictionary entries for a word into one `RemoteWord`
fn flatten(entries: Vec<ApiEntry>) -> RemoteWord {
    let mut word = RemoteWord::default();

    for entry in entries {
        if word.phonetic.is_none() {
            word.phonetic = entry.phonetic.filter(|p| !p.trim().is_empty());
        }
        word.phonetics.extend(entry.phonetics.into_iter().map(|p| RemotePhonetic {
            text: p.text,
            audio: p.audio,
        }));
    }

    word
}

pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, RemoteError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl PhoneticTransport for HttpTransport {
    async fn fetch(&self, endpoint: &str, word: &str) -> Result<RemoteWord, RemoteError> {
        let url = request_url(endpoint, word);
        tracing::debug!(word = %word, url = %url, "Querying remote dictionary");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api(status.as_u16(), error_text));
        }

        let entries: Vec<ApiEntry> = response
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        Ok(flatten(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_appends_word() {
        assert_eq!(
            request_url("https://api.dictionaryapi.dev/api/v2/entries/en/", "hello"),
            "https://api.dictionaryapi.dev/api/v2/entries/en/hello"
        );
    }

    #[test]
    fn test_request_url_fills_template() {
        assert_eq!(
            request_url("https://proxy.example/?url=https://api.example/en/{word}&raw=1", "can't"),
            "https://proxy.example/?url=https://api.example/en/can't&raw=1"
        );
    }

    #[test]
    fn test_flatten_merges_entries() {
        let entries: Vec<ApiEntry> = serde_json::from_str(
            r#"[
                {"word": "lead", "phonetics": [{"text": "/liːd/", "audio": ""}]},
                {"word": "lead", "phonetic": "/lɛd/", "phonetics": [{"audio": "x-us.mp3"}],
                 "meanings": []}
            ]"#,
        )
        .unwrap();

        let word = flatten(entries);
        assert_eq!(word.phonetic.as_deref(), Some("/lɛd/"));
        assert_eq!(word.phonetics.len(), 2);
        assert_eq!(word.phonetics[0].text.as_deref(), Some("/liːd/"));
        assert_eq!(word.phonetics[1].text, None);
    }

    #[test]
    fn test_client_creation() {
        assert!(HttpTransport::new().is_ok());
    }
}
