use super::{matches, result_id, SourceKind, SuggestionItem, SuggestionSource};
use crate::storage::{load_json, save_json, Storage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const HISTORY_KEY: &str = "browser_history";

/// Upper bound on entries kept in the fallback store.
pub const MAX_ENTRIES: usize = 50;
const MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
}

/// Capability handed to [`HistorySource`] at construction. A browser host
/// backs this with its real history API; [`StoredHistory`] is the bundled
/// fallback over a storage blob.
pub trait HistoryProvider: Send + Sync {
    /// Most-recent-first entries matching `text`, at most `max_results`.
    fn search(&self, text: &str, max_results: usize) -> Vec<HistoryEntry>;
    /// Record a visited url as the newest entry.
    fn add_url(&self, title: &str, url: &str);
}

/// Fallback history over the `browser_history` blob: newest first, capped at
/// [`MAX_ENTRIES`], one entry per url.
pub struct StoredHistory {
    storage: Arc<dyn Storage>,
}

impl StoredHistory {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        load_json(self.storage.as_ref(), HISTORY_KEY)
    }
}

impl HistoryProvider for StoredHistory {
    fn search(&self, text: &str, max_results: usize) -> Vec<HistoryEntry> {
        let needle = text.to_lowercase();
        self.entries()
            .into_iter()
            .filter(|e| matches(&needle, &e.title, &e.url))
            .take(max_results)
            .collect()
    }

    fn add_url(&self, title: &str, url: &str) {
        let mut entries = self.entries();
        entries.retain(|e| e.url != url);
        entries.insert(
            0,
            HistoryEntry {
                title: title.to_string(),
                url: url.to_string(),
                favicon: None,
                timestamp: chrono::Utc::now().timestamp_millis(),
            },
        );
        entries.truncate(MAX_ENTRIES);
        if let Err(e) = save_json(self.storage.as_ref(), HISTORY_KEY, &entries) {
            tracing::warn!("failed to persist history: {e}");
        }
    }
}

pub struct HistorySource {
    provider: Arc<dyn HistoryProvider>,
}

impl HistorySource {
    pub fn new(provider: Arc<dyn HistoryProvider>) -> Self {
        Self { provider }
    }
}

impl SuggestionSource for HistorySource {
    fn search(&self, query: &str) -> Vec<SuggestionItem> {
        self.provider
            .search(query, MAX_RESULTS)
            .into_iter()
            .enumerate()
            .map(|(index, entry)| SuggestionItem {
                id: result_id(SourceKind::History, index),
                title: if entry.title.is_empty() {
                    entry.url.clone()
                } else {
                    entry.title
                },
                url: entry.url,
                favicon: entry.favicon.or_else(|| Some("🌐".into())),
                kind: SourceKind::History,
            })
            .collect()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::History
    }

    fn name(&self) -> &str {
        "history"
    }
}
