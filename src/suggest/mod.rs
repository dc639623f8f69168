use serde::{Deserialize, Serialize};

pub mod bookmarks;
pub mod domains;
pub mod history;

/// Where a suggestion came from. The order of the variants is also the
/// priority order used when sources are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    History,
    Bookmark,
    Domain,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::History => "history",
            SourceKind::Bookmark => "bookmark",
            SourceKind::Domain => "domain",
        }
    }
}

/// A single dropdown entry. Ids are unique within one result set only
/// (`{kind}-{index}`) and are regenerated on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(rename = "type")]
    pub kind: SourceKind,
}

/// A backing store that can answer a query with candidate suggestions.
pub trait SuggestionSource: Send + Sync {
    /// Return matching items for a non-empty query, already capped and
    /// tagged with per-source ids. An unavailable backing store degrades to
    /// an empty result, never an error.
    fn search(&self, query: &str) -> Vec<SuggestionItem>;
    fn kind(&self) -> SourceKind;
    fn name(&self) -> &str;
}

/// Maximum number of entries in one aggregated result set.
pub const MAX_SUGGESTIONS: usize = 8;

/// Ordered collection of sources. Registration order is priority order;
/// [`SourceSet::with_default_sources`] registers history, bookmarks and the
/// static domain catalog in that order.
pub struct SourceSet {
    sources: Vec<Box<dyn SuggestionSource>>,
}

impl SourceSet {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_default_sources(
        history: std::sync::Arc<dyn history::HistoryProvider>,
        bookmarks: std::sync::Arc<dyn bookmarks::BookmarkProvider>,
    ) -> Self {
        let mut set = Self::new();
        set.register(Box::new(history::HistorySource::new(history)));
        set.register(Box::new(bookmarks::BookmarkSource::new(bookmarks)));
        set.register(Box::new(domains::DomainSource));
        set
    }

    pub fn register(&mut self, source: Box<dyn SuggestionSource>) {
        self.sources.push(source);
    }

    /// Aggregate all sources in priority order and truncate to
    /// [`MAX_SUGGESTIONS`]. A blank query short-circuits without touching
    /// any source.
    pub fn suggest(&self, query: &str) -> Vec<SuggestionItem> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let mut out = Vec::new();
        for source in &self.sources {
            out.extend(source.search(query));
        }
        out.truncate(MAX_SUGGESTIONS);
        out
    }
}

impl Default for SourceSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive substring match against a title or url.
pub(crate) fn matches(needle_lc: &str, title: &str, url: &str) -> bool {
    title.to_lowercase().contains(needle_lc) || url.to_lowercase().contains(needle_lc)
}

pub(crate) fn result_id(kind: SourceKind, index: usize) -> String {
    format!("{}-{index}", kind.as_str())
}
