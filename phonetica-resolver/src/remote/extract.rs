//! Dialect extraction from remote dictionary responses
//!
//! Each phonetic entry is classified by the file name of its audio clip
//! (`hello-us.mp3`, `hello-uk.mp3`, `hello--_gb_1.mp3`). Entries without a
//! dialect hint fill whatever is still missing, then the word-level
//! `phonetic` field does.

use super::RemoteWord;
use crate::types::{Dialect, Phonetic, PhoneticResult};

/// Dialect suggested by an audio reference, if any
///
/// The file stem is split on `-`, `_` and `.`; a whole segment `us`, `uk`
/// or `gb` is a hint. When several segments hint, the one nearest the end
/// wins (`us-uk.mp3` is the UK clip for the word "us").
pub fn classify_audio(audio: &str) -> Option<Dialect> {
    let lower = audio.trim().to_ascii_lowercase();
    let file_name = lower
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _extension)) => stem,
        None => file_name,
    };

    stem.rsplit(['-', '_', '.']).find_map(|segment| match segment {
        "us" => Some(Dialect::Us),
        "uk" | "gb" => Some(Dialect::Uk),
        _ => None,
    })
}

pub fn extract_dialects(word: &RemoteWord) -> PhoneticResult {
    let mut result = PhoneticResult::not_found();
    let mut unhinted: Option<Phonetic> = None;

    for entry in &word.phonetics {
        let text = Phonetic::from_raw(entry.text.as_deref().unwrap_or_default());
        if !text.is_found() {
            continue;
        }

        match entry.audio.as_deref().and_then(classify_audio) {
            Some(Dialect::Us) if !result.us.is_found() => result.us = text,
            Some(Dialect::Uk) if !result.uk.is_found() => result.uk = text,
            Some(_) => {}
            None => {
                if unhinted.is_none() {
                    unhinted = Some(text);
                }
            }
        }
    }

    if let Some(text) = unhinted {
        fill_missing(&mut result, &text);
    }

    if let Some(generic) = word.phonetic.as_deref().map(Phonetic::from_raw) {
        if generic.is_found() {
            fill_missing(&mut result, &generic);
        }
    }

    result
}

fn fill_missing(result: &mut PhoneticResult, text: &Phonetic) {
    if !result.us.is_found() {
        result.us = text.clone();
    }
    if !result.uk.is_found() {
        result.uk = text.clone();
    }
}
