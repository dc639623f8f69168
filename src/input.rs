use crate::completion::{self, CompletionGate};
use crate::suggest::SuggestionItem;
use std::time::{Duration, Instant};

/// Debounce window between a keystroke and the suggestion fetch.
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// Lifecycle of the suggestion panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No suggestions shown, nothing scheduled.
    Idle,
    /// A debounce timer is running for the current generation.
    Debouncing,
    /// A fetch for the current generation is in flight.
    Fetching,
    /// The suggestion list is visible.
    Showing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    ArrowRight,
    Enter,
    Escape,
    Tab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insert,
    /// Backspace or delete; arms the completion cool-down.
    Delete,
}

/// Side effects requested from the host. The machine itself never touches
/// timers, stores or the window; it only says what should happen next.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start (or restart) the debounce timer, then call
    /// [`AddressInput::debounce_fired`] with the same generation.
    ScheduleDebounce { generation: u64, delay: Duration },
    /// Run the suggestion fetch, then call [`AddressInput::fetch_done`] with
    /// the same generation.
    Fetch { generation: u64, query: String },
    /// Replace the input's displayed value. When `select_from` is set, the
    /// range `[select_from, text.len())` is highlighted.
    SetValue {
        text: String,
        select_from: Option<usize>,
    },
    /// Collapse the cursor to the end of the current value.
    CursorToEnd,
    /// Resolve `text` as a url or search and navigate.
    Submit { text: String },
    /// Record an accepted suggestion in the history store.
    RecordVisit { title: String, url: String },
}

/// The address-bar interaction state machine.
///
/// Stale-fetch protection works through a generation counter: every edit that
/// schedules a fetch bumps it, and [`debounce_fired`](Self::debounce_fired) /
/// [`fetch_done`](Self::fetch_done) calls carrying an old generation are
/// discarded without touching visible state. Closing the panel (escape, blur,
/// acceptance, blank query) also bumps the generation so an in-flight fetch
/// can never resurrect it.
pub struct AddressInput {
    /// What the user actually typed; restored on escape.
    query: String,
    /// Displayed value, including any applied inline completion.
    shown: String,
    phase: Phase,
    suggestions: Vec<SuggestionItem>,
    selected: Option<usize>,
    generation: u64,
    gate: CompletionGate,
    completion_active: bool,
}

impl AddressInput {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            shown: String::new(),
            phase: Phase::Idle,
            suggestions: Vec::new(),
            selected: None,
            generation: 0,
            gate: CompletionGate::new(),
            completion_active: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn shown(&self) -> &str {
        &self.shown
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn suggestions(&self) -> &[SuggestionItem] {
        &self.suggestions
    }

    /// Index of the keyboard-selected suggestion; `None` is the "-1" row
    /// where Enter submits the raw text.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn showing(&self) -> bool {
        self.phase == Phase::Showing && !self.suggestions.is_empty()
    }

    /// A character-level edit of the input. The query updates synchronously;
    /// the fetch is debounced.
    pub fn edit(&mut self, text: &str, kind: EditKind, now: Instant) -> Vec<Effect> {
        if self.gate.is_composing() {
            return Vec::new();
        }
        if kind == EditKind::Delete {
            self.gate.note_backspace(now);
        }
        self.apply_edit(text)
    }

    fn apply_edit(&mut self, text: &str) -> Vec<Effect> {
        self.query = text.to_string();
        self.shown = text.to_string();
        self.completion_active = false;
        self.selected = None;
        self.generation += 1;

        if self.query.trim().is_empty() {
            self.suggestions.clear();
            self.phase = Phase::Idle;
            return Vec::new();
        }

        self.phase = Phase::Debouncing;
        vec![Effect::ScheduleDebounce {
            generation: self.generation,
            delay: DEBOUNCE,
        }]
    }

    /// The debounce timer for `generation` elapsed.
    pub fn debounce_fired(&mut self, generation: u64) -> Vec<Effect> {
        if generation != self.generation || self.phase != Phase::Debouncing {
            return Vec::new();
        }
        self.phase = Phase::Fetching;
        vec![Effect::Fetch {
            generation,
            query: self.query.clone(),
        }]
    }

    /// A fetch completed. Results from a superseded generation are dropped.
    pub fn fetch_done(
        &mut self,
        generation: u64,
        items: Vec<SuggestionItem>,
        now: Instant,
    ) -> Vec<Effect> {
        if generation != self.generation {
            tracing::debug!("dropping stale fetch (generation {generation})");
            return Vec::new();
        }
        self.selected = None;
        self.suggestions = items;
        self.phase = if self.suggestions.is_empty() {
            Phase::Idle
        } else {
            Phase::Showing
        };

        if let Some(c) = completion::compute(&self.query, &self.suggestions, &mut self.gate, now) {
            self.shown = c.text.clone();
            self.completion_active = true;
            return vec![Effect::SetValue {
                text: c.text,
                select_from: Some(c.select_from),
            }];
        }
        Vec::new()
    }

    pub fn key(&mut self, key: Key, _now: Instant) -> Vec<Effect> {
        if self.gate.is_composing() {
            return Vec::new();
        }

        // Tab / ArrowRight accept a live completion without submitting.
        if matches!(key, Key::Tab | Key::ArrowRight) {
            if self.completion_active {
                self.query = self.shown.clone();
                self.completion_active = false;
                return vec![Effect::CursorToEnd];
            }
            return Vec::new();
        }

        // Enter and Escape work in every phase: both close the panel, which
        // also invalidates any debounce or fetch still in flight.
        match key {
            Key::Enter => {
                if let Some(index) = self.selected.filter(|_| self.showing()) {
                    return self.accept(index);
                }
                let text = self.shown.clone();
                let mut effects = self.close();
                effects.push(Effect::Submit { text });
                effects
            }
            Key::Escape => {
                let mut effects = self.close();
                if self.shown != self.query {
                    // roll back an applied completion to the typed text
                    self.shown = self.query.clone();
                    effects.push(Effect::SetValue {
                        text: self.query.clone(),
                        select_from: None,
                    });
                }
                effects
            }
            Key::ArrowDown if self.showing() => {
                self.selected = match self.selected {
                    None => Some(0),
                    Some(i) => Some((i + 1).min(self.suggestions.len() - 1)),
                };
                Vec::new()
            }
            Key::ArrowUp if self.showing() => {
                self.selected = match self.selected {
                    None | Some(0) => None,
                    Some(i) => Some(i - 1),
                };
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Accept the suggestion at `index`, by click or Enter.
    pub fn accept(&mut self, index: usize) -> Vec<Effect> {
        let Some(item) = self.suggestions.get(index).cloned() else {
            return Vec::new();
        };
        self.query = item.url.clone();
        self.shown = item.url.clone();
        let mut effects = self.close();
        effects.push(Effect::RecordVisit {
            title: item.title,
            url: item.url.clone(),
        });
        effects.push(Effect::SetValue {
            text: item.url.clone(),
            select_from: None,
        });
        effects.push(Effect::Submit { text: item.url });
        effects
    }

    pub fn composition_start(&mut self) {
        self.gate.composition_started();
    }

    /// Composition ended with the input holding `text`; fetching resumes.
    pub fn composition_end(&mut self, text: &str, _now: Instant) -> Vec<Effect> {
        self.gate.composition_ended();
        self.apply_edit(text)
    }

    /// The pointer went down outside the panel. Closes without altering the
    /// query.
    pub fn click_outside(&mut self) -> Vec<Effect> {
        self.close()
    }

    /// Focus left the input. Any in-flight fetch is invalidated.
    pub fn blur(&mut self) -> Vec<Effect> {
        self.close()
    }

    fn close(&mut self) -> Vec<Effect> {
        self.suggestions.clear();
        self.selected = None;
        self.completion_active = false;
        self.phase = Phase::Idle;
        self.generation += 1;
        Vec::new()
    }
}

impl Default for AddressInput {
    fn default() -> Self {
        Self::new()
    }
}
