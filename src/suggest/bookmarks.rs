use super::{matches, result_id, SourceKind, SuggestionItem, SuggestionSource};
use crate::storage::{load_json, Storage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const BOOKMARKS_KEY: &str = "browser_bookmarks";
const MAX_RESULTS: usize = 3;

/// One node of a bookmark tree. Nodes without a url are folders and are
/// descended into; their own titles never produce suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookmarkNode {
    #[serde(default)]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BookmarkNode>,
}

/// Capability handed to [`BookmarkSource`] at construction.
pub trait BookmarkProvider: Send + Sync {
    fn tree(&self) -> Vec<BookmarkNode>;
}

/// Bundled provider over the `browser_bookmarks` blob.
pub struct StoredBookmarks {
    storage: Arc<dyn Storage>,
}

impl StoredBookmarks {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl BookmarkProvider for StoredBookmarks {
    fn tree(&self) -> Vec<BookmarkNode> {
        load_json(self.storage.as_ref(), BOOKMARKS_KEY)
    }
}

/// Depth-first flatten of a bookmark tree into (title, url) leaves.
pub fn flatten(nodes: &[BookmarkNode]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for node in nodes {
        if let Some(url) = &node.url {
            let title = if node.title.is_empty() {
                url.clone()
            } else {
                node.title.clone()
            };
            out.push((title, url.clone()));
        }
        out.extend(flatten(&node.children));
    }
    out
}

pub struct BookmarkSource {
    provider: Arc<dyn BookmarkProvider>,
}

impl BookmarkSource {
    pub fn new(provider: Arc<dyn BookmarkProvider>) -> Self {
        Self { provider }
    }
}

impl SuggestionSource for BookmarkSource {
    fn search(&self, query: &str) -> Vec<SuggestionItem> {
        let needle = query.to_lowercase();
        flatten(&self.provider.tree())
            .into_iter()
            .filter(|(title, url)| matches(&needle, title, url))
            .take(MAX_RESULTS)
            .enumerate()
            .map(|(index, (title, url))| SuggestionItem {
                id: result_id(SourceKind::Bookmark, index),
                title,
                url,
                favicon: Some("⭐".into()),
                kind: SourceKind::Bookmark,
            })
            .collect()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Bookmark
    }

    fn name(&self) -> &str {
        "bookmarks"
    }
}

#[cfg(test)]
mod tests {
    use super::{flatten, BookmarkNode};

    fn folder(title: &str, children: Vec<BookmarkNode>) -> BookmarkNode {
        BookmarkNode {
            title: title.into(),
            url: None,
            children,
        }
    }

    fn leaf(title: &str, url: &str) -> BookmarkNode {
        BookmarkNode {
            title: title.into(),
            url: Some(url.into()),
            children: Vec::new(),
        }
    }

    #[test]
    fn flatten_is_depth_first() {
        let tree = vec![
            folder(
                "Dev",
                vec![
                    leaf("GitHub", "https://github.com"),
                    folder("Rust", vec![leaf("Docs", "https://docs.rs")]),
                ],
            ),
            leaf("News", "https://news.ycombinator.com"),
        ];
        let flat = flatten(&tree);
        let urls: Vec<&str> = flat.iter().map(|(_, u)| u.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://github.com",
                "https://docs.rs",
                "https://news.ycombinator.com"
            ]
        );
    }

    #[test]
    fn folders_do_not_become_entries() {
        let tree = vec![folder("Empty", Vec::new())];
        assert!(flatten(&tree).is_empty());
    }
}
