use crate::suggest::SuggestionItem;
use std::time::{Duration, Instant};

/// How long after a backspace/delete edit inline completion stays off, so a
/// just-deleted character is not immediately re-inserted.
pub const BACKSPACE_COOLDOWN: Duration = Duration::from_millis(300);

/// Ghost-text completion applied to the input. The displayed value becomes
/// `text` with the range `[select_from, text.len())` selected, so the next
/// keystroke overwrites the appended part while a cursor-to-end accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineCompletion {
    pub text: String,
    pub select_from: usize,
}

/// Domain-only completion candidate for a suggestion url: scheme and leading
/// `www.` stripped, truncated at the first path separator.
pub fn candidate(url: &str) -> String {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    match rest.find('/') {
        Some(i) => rest[..i].to_string(),
        None => rest.to_string(),
    }
}

/// Tracks the two conditions that suppress inline completion: an IME
/// composition in progress, and a recent backspace.
#[derive(Debug, Default)]
pub struct CompletionGate {
    suppress_until: Option<Instant>,
    composing: bool,
}

impl CompletionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the suppress-once flag for [`BACKSPACE_COOLDOWN`].
    pub fn note_backspace(&mut self, now: Instant) {
        self.suppress_until = Some(now + BACKSPACE_COOLDOWN);
    }

    pub fn composition_started(&mut self) {
        self.composing = true;
    }

    pub fn composition_ended(&mut self) {
        self.composing = false;
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Whether completion is suppressed right now. The backspace flag is
    /// suppress-once: this check consumes it, whether or not the cool-down
    /// had already run out. Composition state is not consumed.
    pub fn consume_suppression(&mut self, now: Instant) -> bool {
        let armed = self.suppress_until.take().is_some_and(|until| now < until);
        armed || self.composing
    }
}

/// Decide whether to complete `query` from the top suggestion. The result is
/// always a prefix-extension of the literal query: the typed text is kept and
/// only the remainder of the candidate is appended.
pub fn compute(
    query: &str,
    suggestions: &[SuggestionItem],
    gate: &mut CompletionGate,
    now: Instant,
) -> Option<InlineCompletion> {
    if gate.consume_suppression(now) || query.is_empty() {
        return None;
    }
    let first = suggestions.first()?;
    let candidate = candidate(&first.url);
    if candidate.len() <= query.len() {
        return None;
    }
    if !candidate.to_lowercase().starts_with(&query.to_lowercase()) {
        return None;
    }
    // lowercasing can shift byte lengths for some scripts
    if !candidate.is_char_boundary(query.len()) {
        return None;
    }
    Some(InlineCompletion {
        text: format!("{query}{}", &candidate[query.len()..]),
        select_from: query.len(),
    })
}
