use super::{matches, result_id, SourceKind, SuggestionItem, SuggestionSource};

const MAX_RESULTS: usize = 3;

/// Fixed catalog of well-known destinations offered even with no history.
const DOMAINS: &[(&str, &str, &str)] = &[
    ("Google", "https://www.google.com", "🔍"),
    ("GitHub", "https://github.com", "🐙"),
    ("YouTube", "https://www.youtube.com", "📺"),
    ("ChatGPT", "https://chatgpt.com", "🤖"),
    ("Kagi", "https://kagi.com", "🔎"),
];

pub struct DomainSource;

impl SuggestionSource for DomainSource {
    fn search(&self, query: &str) -> Vec<SuggestionItem> {
        let needle = query.to_lowercase();
        DOMAINS
            .iter()
            .filter(|(title, url, _)| matches(&needle, title, url))
            .take(MAX_RESULTS)
            .enumerate()
            .map(|(index, (title, url, favicon))| SuggestionItem {
                id: result_id(SourceKind::Domain, index),
                title: (*title).into(),
                url: (*url).into(),
                favicon: Some((*favicon).into()),
                kind: SourceKind::Domain,
            })
            .collect()
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Domain
    }

    fn name(&self) -> &str {
        "domains"
    }
}
