//! Shared test helpers: dictionary fixtures and remote doubles

#![allow(dead_code)]

use async_trait::async_trait;
use phonetica_resolver::dictionary::{DictionaryTable, DictionaryTables};
use phonetica_resolver::remote::RemoteLookup;
use phonetica_resolver::{Phonetic, PhoneticResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

pub fn table(entries: &[(&str, &str)]) -> DictionaryTable {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn tables(us: &[(&str, &str)], uk: &[(&str, &str)]) -> DictionaryTables {
    DictionaryTables::new(table(us), table(uk))
}

pub fn result(us: &str, uk: &str) -> PhoneticResult {
    PhoneticResult::new(Phonetic::from_raw(us), Phonetic::from_raw(uk))
}

/// Remote double answering from a fixed table and recording every key
#[derive(Default)]
pub struct RecordingRemote {
    answers: HashMap<String, PhoneticResult>,
    calls: AtomicUsize,
    keys: Mutex<Vec<String>>,
}

impl RecordingRemote {
    pub fn new(entries: &[(&str, PhoneticResult)]) -> Self {
        Self {
            answers: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn keys(&self) -> Vec<String> {
        self.keys.lock().await.clone()
    }
}

#[async_trait]
impl RemoteLookup for RecordingRemote {
    async fn lookup(&self, key: &str) -> PhoneticResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.keys.lock().await.push(key.to_string());
        self.answers.get(key).cloned().unwrap_or_default()
    }
}
