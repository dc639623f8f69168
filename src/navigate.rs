use crate::engines::SearchEngine;

/// Where a submitted input should go. The actual tab-open hand-off belongs
/// to the host; this crate only resolves the final url string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Navigate straight to this url.
    Url(String),
    /// Open this search-results url on the active engine.
    Search(String),
}

impl Target {
    pub fn url(&self) -> &str {
        match self {
            Target::Url(u) | Target::Search(u) => u,
        }
    }
}

/// A direct navigation target is text that parses as a url (after an
/// optional `http://` prefix), contains a dot and contains no space.
pub fn is_url(text: &str) -> bool {
    let candidate = if text.starts_with("http") {
        text.to_string()
    } else {
        format!("http://{text}")
    };
    url::Url::parse(&candidate).is_ok() && text.contains('.') && !text.contains(' ')
}

/// Resolve submitted text against the active engine. `None` for blank input.
/// Bare hosts are upgraded to `https://`.
pub fn resolve(text: &str, engine: &SearchEngine) -> Option<Target> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_url(trimmed) {
        let url = if trimmed.starts_with("http") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        Some(Target::Url(url))
    } else {
        Some(Target::Search(format!(
            "{}{}",
            engine.url,
            urlencoding::encode(trimmed)
        )))
    }
}
