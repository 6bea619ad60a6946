//! Core value types: dialects, phonetic values and batch items

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel text used when a dialect has no transcription
pub const NOT_FOUND: &str = "Not Found";

/// Pronunciation variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Us,
    Uk,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Us => write!(f, "US"),
            Dialect::Uk => write!(f, "UK"),
        }
    }
}

/// One dialect's transcription
///
/// `Found` always holds a slash-wrapped string (`/həˈləʊ/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Phonetic {
    Found(String),
    NotFound,
}

impl Phonetic {
    /// Wrap raw transcription text as `/text/`
    ///
    /// Existing slashes or brackets around the text are dropped first, so
    /// `"həˈləʊ"`, `"/həˈləʊ/"` and `"[həˈləʊ]"` all give `/həˈləʊ/`.
    /// Blank text yields `NotFound`.
    pub fn from_raw(text: &str) -> Self {
        let inner = strip_delimiters(text);
        if inner.is_empty() {
            Phonetic::NotFound
        } else {
            Phonetic::Found(format!("/{}/", inner))
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Phonetic::Found(_))
    }

    /// Transcription without the surrounding slashes
    pub fn inner(&self) -> Option<&str> {
        match self {
            Phonetic::Found(text) => Some(strip_delimiters(text)),
            Phonetic::NotFound => None,
        }
    }

    /// `self` when found, otherwise `fallback`
    pub fn or(self, fallback: Phonetic) -> Phonetic {
        if self.is_found() {
            self
        } else {
            fallback
        }
    }
}

fn strip_delimiters(text: &str) -> &str {
    text.trim()
        .trim_start_matches(['/', '['])
        .trim_end_matches(['/', ']'])
        .trim()
}

impl From<String> for Phonetic {
    fn from(value: String) -> Self {
        if value.trim().is_empty() || value == NOT_FOUND {
            Phonetic::NotFound
        } else {
            Phonetic::from_raw(&value)
        }
    }
}

impl From<Phonetic> for String {
    fn from(value: Phonetic) -> Self {
        match value {
            Phonetic::Found(text) => text,
            Phonetic::NotFound => NOT_FOUND.to_string(),
        }
    }
}

impl fmt::Display for Phonetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phonetic::Found(text) => f.write_str(text),
            Phonetic::NotFound => f.write_str(NOT_FOUND),
        }
    }
}

/// US and UK transcriptions for one word or phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneticResult {
    pub us: Phonetic,
    pub uk: Phonetic,
}

impl PhoneticResult {
    pub fn new(us: Phonetic, uk: Phonetic) -> Self {
        Self { us, uk }
    }

    /// Both dialects `NotFound`
    pub fn not_found() -> Self {
        Self::new(Phonetic::NotFound, Phonetic::NotFound)
    }

    /// Both dialects present
    pub fn is_complete(&self) -> bool {
        self.us.is_found() && self.uk.is_found()
    }

    /// Neither dialect present
    pub fn is_empty(&self) -> bool {
        !self.us.is_found() && !self.uk.is_found()
    }

    pub fn get(&self, dialect: Dialect) -> &Phonetic {
        match dialect {
            Dialect::Us => &self.us,
            Dialect::Uk => &self.uk,
        }
    }
}

impl Default for PhoneticResult {
    fn default() -> Self {
        Self::not_found()
    }
}

/// One input row: the raw word and its result slot
///
/// `result` stays `None` until the batch coordinator reaches the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub word: String,
    pub result: Option<PhoneticResult>,
}

impl BatchItem {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            result: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.result.is_none()
    }
}
