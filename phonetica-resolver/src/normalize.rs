//! Word normalization and phrase tokenization
//!
//! `normalize` turns a raw spreadsheet cell into the key used by every
//! lookup tier. `Tokenizer` decides whether a key is looked up as one unit
//! or word by word.

use std::collections::HashSet;

/// Fixed multi-word expressions kept whole under `TokenizePolicy::KeepIdioms`
pub const DEFAULT_IDIOMS: &[&str] = &[
    "a lot",
    "a little",
    "a few",
    "in order to",
    "as well as",
    "such as",
    "thanks to",
    "so that",
    "used to",
    "would like to",
    "get up",
    "look after",
    "take care",
    "come back",
    "find out",
];

/// Canonical lookup key for a raw word or phrase
///
/// 1. Cut at the first `=` (drops `word=gloss` annotations)
/// 2. Trim and collapse whitespace runs to one space
/// 3. Lowercase
/// 4. Drop everything except ASCII word characters, whitespace and `'`
///
/// Whitespace is collapsed again after step 4 so that removed punctuation
/// never leaves double spaces behind; this keeps the function idempotent.
pub fn normalize(raw: &str) -> String {
    let head = match raw.split_once('=') {
        Some((before, _)) => before,
        None => raw,
    };

    let lowered = collapse_whitespace(head).to_lowercase();

    let filtered: String = lowered
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace() || *c == '\'')
        .collect();

    let key = collapse_whitespace(&filtered);

    if key != raw {
        tracing::trace!(raw = %raw, key = %key, "Normalized word");
    }

    key
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// ASCII letters, digits and `_`
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splitting policy for multi-word keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenizePolicy {
    /// Every multi-word key is resolved word by word
    #[default]
    AlwaysSplit,
    /// Listed idioms are looked up whole; everything else is split
    KeepIdioms(HashSet<String>),
}

impl TokenizePolicy {
    /// `KeepIdioms` with `DEFAULT_IDIOMS`
    pub fn default_idioms() -> Self {
        TokenizePolicy::KeepIdioms(DEFAULT_IDIOMS.iter().map(|s| s.to_string()).collect())
    }
}

/// Splits normalized keys into lookup tokens
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    policy: TokenizePolicy,
}

impl Tokenizer {
    pub fn new(policy: TokenizePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &TokenizePolicy {
        &self.policy
    }

    /// Whether `key` must be resolved token by token
    pub fn needs_splitting(&self, key: &str) -> bool {
        if !key.contains(' ') {
            return false;
        }

        match &self.policy {
            TokenizePolicy::AlwaysSplit => true,
            TokenizePolicy::KeepIdioms(idioms) => {
                if idioms.contains(key) {
                    tracing::debug!(key = %key, "Idiom kept as a single lookup");
                    false
                } else {
                    true
                }
            }
        }
    }

    /// Ordered lookup tokens for `key`
    pub fn tokenize(&self, key: &str) -> Vec<String> {
        if !self.needs_splitting(key) {
            return vec![key.to_string()];
        }

        let tokens: Vec<String> = key
            .split(' ')
            .filter(|fragment| !fragment.trim().is_empty())
            .map(str::to_string)
            .collect();

        tracing::debug!(key = %key, ?tokens, "Split phrase into tokens");
        tokens
    }
}
