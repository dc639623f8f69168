use quick_tab::completion::{self, CompletionGate};
use quick_tab::storage::{save_json, MemoryStorage, Storage};
use quick_tab::suggest::bookmarks::{BookmarkNode, StoredBookmarks, BOOKMARKS_KEY};
use quick_tab::suggest::history::{HistoryProvider, StoredHistory};
use quick_tab::suggest::{SourceKind, SourceSet, MAX_SUGGESTIONS};
use std::sync::Arc;
use std::time::Instant;

fn bookmark(title: &str, url: &str) -> BookmarkNode {
    BookmarkNode {
        title: title.into(),
        url: Some(url.into()),
        children: Vec::new(),
    }
}

fn set_with(storage: Arc<MemoryStorage>) -> SourceSet {
    SourceSet::with_default_sources(
        Arc::new(StoredHistory::new(storage.clone())),
        Arc::new(StoredBookmarks::new(storage)),
    )
}

#[test]
fn blank_query_returns_nothing() {
    let set = set_with(Arc::new(MemoryStorage::new()));
    assert!(set.suggest("").is_empty());
    assert!(set.suggest("   ").is_empty());
}

#[test]
fn capped_at_eight_in_priority_order() {
    let storage = Arc::new(MemoryStorage::new());
    let history = StoredHistory::new(storage.clone());
    for i in 0..10 {
        history.add_url(&format!("Example {i}"), &format!("https://example.com/{i}"));
    }
    let tree: Vec<BookmarkNode> = (0..5)
        .map(|i| bookmark(&format!("Example bm {i}"), &format!("https://bm.example.com/{i}")))
        .collect();
    save_json(storage.as_ref(), BOOKMARKS_KEY, &tree).unwrap();

    let set = set_with(storage);
    let results = set.suggest("example");
    assert_eq!(results.len(), MAX_SUGGESTIONS);
    // history first (cap 5), then bookmarks (cap 3)
    assert!(results[..5].iter().all(|s| s.kind == SourceKind::History));
    assert!(results[5..].iter().all(|s| s.kind == SourceKind::Bookmark));
}

#[test]
fn ids_are_kind_and_index() {
    let storage = Arc::new(MemoryStorage::new());
    let history = StoredHistory::new(storage.clone());
    history.add_url("GitHub", "https://github.com");

    let set = set_with(storage);
    let results = set.suggest("github");
    assert_eq!(results[0].id, "history-0");
    let domain = results
        .iter()
        .find(|s| s.kind == SourceKind::Domain)
        .expect("domain catalog matches github");
    assert_eq!(domain.id, "domain-0");
}

#[test]
fn no_cross_source_dedup() {
    let storage = Arc::new(MemoryStorage::new());
    let history = StoredHistory::new(storage.clone());
    history.add_url("GitHub", "https://github.com");

    let set = set_with(storage);
    let results = set.suggest("github");
    let github_count = results
        .iter()
        .filter(|s| s.url == "https://github.com")
        .count();
    assert_eq!(github_count, 2, "history and domain copies both survive");
}

#[test]
fn git_scenario_orders_history_before_bookmark() {
    let storage = Arc::new(MemoryStorage::new());
    let history = StoredHistory::new(storage.clone());
    history.add_url("GitHub", "https://github.com");
    save_json(
        storage.as_ref(),
        BOOKMARKS_KEY,
        &vec![bookmark("Gitee", "https://gitee.com")],
    )
    .unwrap();

    let set = set_with(storage);
    let results = set.suggest("git");
    assert_eq!(results[0].title, "GitHub");
    assert_eq!(results[0].kind, SourceKind::History);
    assert_eq!(results[1].title, "Gitee");
    assert_eq!(results[1].kind, SourceKind::Bookmark);

    // the top suggestion also drives the inline completion
    let mut gate = CompletionGate::new();
    let c = completion::compute("git", &results, &mut gate, Instant::now()).expect("completion");
    assert_eq!(c.text, "github.com");
    assert_eq!(c.select_from, 3);
}

#[test]
fn corrupt_bookmark_blob_degrades_to_empty() {
    let storage = Arc::new(MemoryStorage::new());
    storage.write(BOOKMARKS_KEY, "[{]").unwrap();
    let set = set_with(storage);
    let results = set.suggest("git");
    assert!(results.iter().all(|s| s.kind != SourceKind::Bookmark));
}
