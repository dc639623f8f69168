use quick_tab::input::{AddressInput, EditKind, Effect, Key, Phase, DEBOUNCE};
use quick_tab::suggest::{SourceKind, SuggestionItem};
use std::time::{Duration, Instant};

fn item(title: &str, url: &str) -> SuggestionItem {
    SuggestionItem {
        id: "history-0".into(),
        title: title.into(),
        url: url.into(),
        favicon: None,
        kind: SourceKind::History,
    }
}

/// Drive an edit through debounce and fetch completion in one step.
fn show(input: &mut AddressInput, text: &str, items: Vec<SuggestionItem>, now: Instant) {
    let effects = input.edit(text, EditKind::Insert, now);
    let generation = match &effects[..] {
        [Effect::ScheduleDebounce { generation, .. }] => *generation,
        other => panic!("expected a debounce effect, got {other:?}"),
    };
    let effects = input.debounce_fired(generation);
    assert!(matches!(&effects[..], [Effect::Fetch { .. }]));
    input.fetch_done(generation, items, now);
}

#[test]
fn edit_updates_query_synchronously_and_debounces_fetch() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    let effects = input.edit("gi", EditKind::Insert, now);
    assert_eq!(input.query(), "gi");
    assert_eq!(input.phase(), Phase::Debouncing);
    assert!(matches!(
        &effects[..],
        [Effect::ScheduleDebounce { delay, .. }] if *delay == DEBOUNCE
    ));
}

#[test]
fn blank_query_goes_idle_without_scheduling() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    input.edit("g", EditKind::Insert, now);
    let effects = input.edit("   ", EditKind::Delete, now);
    assert!(effects.is_empty());
    assert_eq!(input.phase(), Phase::Idle);
    assert!(!input.showing());
}

#[test]
fn a_new_edit_invalidates_the_pending_generation() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    let first = input.edit("gi", EditKind::Insert, now);
    let Effect::ScheduleDebounce { generation: g1, .. } = first[0].clone() else {
        panic!()
    };
    input.edit("git", EditKind::Insert, now);

    // the old timer fires anyway; nothing happens
    assert!(input.debounce_fired(g1).is_empty());
    assert_eq!(input.phase(), Phase::Debouncing);
}

#[test]
fn stale_fetch_results_are_discarded() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    let effects = input.edit("gi", EditKind::Insert, now);
    let Effect::ScheduleDebounce { generation: g1, .. } = effects[0].clone() else {
        panic!()
    };
    input.debounce_fired(g1);

    // user keeps typing while the fetch is in flight
    input.edit("github", EditKind::Insert, now);

    input.fetch_done(g1, vec![item("Old", "https://old.example")], now);
    assert!(input.suggestions().is_empty());
    assert!(!input.showing());
}

#[test]
fn arrow_keys_clamp_without_wraparound() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    show(
        &mut input,
        "git",
        vec![
            item("GitHub", "https://github.com"),
            item("Gitee", "https://gitee.com"),
        ],
        now,
    );
    assert!(input.showing());
    assert_eq!(input.selected(), None);

    input.key(Key::ArrowDown, now);
    assert_eq!(input.selected(), Some(0));
    input.key(Key::ArrowDown, now);
    input.key(Key::ArrowDown, now);
    assert_eq!(input.selected(), Some(1), "clamped at the last row");

    input.key(Key::ArrowUp, now);
    input.key(Key::ArrowUp, now);
    input.key(Key::ArrowUp, now);
    assert_eq!(input.selected(), None, "clamped at the -1 row");
}

#[test]
fn enter_with_selection_accepts_and_records_history() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    show(
        &mut input,
        "git",
        vec![item("GitHub", "https://github.com")],
        now,
    );
    input.key(Key::ArrowDown, now);
    let effects = input.key(Key::Enter, now);

    assert!(effects.contains(&Effect::RecordVisit {
        title: "GitHub".into(),
        url: "https://github.com".into(),
    }));
    assert!(effects.contains(&Effect::Submit {
        text: "https://github.com".into(),
    }));
    assert_eq!(input.query(), "https://github.com");
    assert!(!input.showing());
}

#[test]
fn enter_without_selection_submits_raw_text() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    show(
        &mut input,
        "rust lang",
        vec![item("Rust", "https://rust-lang.org")],
        now,
    );
    let effects = input.key(Key::Enter, now);
    assert!(effects.contains(&Effect::Submit {
        text: "rust lang".into(),
    }));
}

#[test]
fn escape_restores_pre_completion_text() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    show(
        &mut input,
        "git",
        vec![item("GitHub", "https://github.com")],
        now,
    );
    // completion stretched the shown value to the full domain
    assert_eq!(input.shown(), "github.com");

    let effects = input.key(Key::Escape, now);
    assert_eq!(input.shown(), "git");
    assert!(!input.showing());
    assert!(effects.contains(&Effect::SetValue {
        text: "git".into(),
        select_from: None,
    }));
}

#[test]
fn tab_accepts_completion_without_submitting() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    show(
        &mut input,
        "git",
        vec![item("GitHub", "https://github.com")],
        now,
    );
    let effects = input.key(Key::Tab, now);
    assert_eq!(effects, vec![Effect::CursorToEnd]);
    assert_eq!(input.query(), "github.com");

    // a second tab has nothing left to accept
    assert!(input.key(Key::Tab, now).is_empty());
}

#[test]
fn composition_gates_fetching_until_it_ends() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    input.composition_start();
    assert!(input.edit("に", EditKind::Insert, now).is_empty());
    assert!(input.key(Key::Enter, now).is_empty());

    let effects = input.composition_end("日本", now);
    assert!(matches!(&effects[..], [Effect::ScheduleDebounce { .. }]));
    assert_eq!(input.query(), "日本");
}

#[test]
fn click_outside_closes_without_altering_query() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    show(
        &mut input,
        "rust",
        vec![item("Rust", "https://rust-lang.org")],
        now,
    );
    input.click_outside();
    assert!(!input.showing());
    assert_eq!(input.query(), "rust");
}

#[test]
fn escape_during_fetch_discards_the_inflight_results() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    let effects = input.edit("git", EditKind::Insert, now);
    let Effect::ScheduleDebounce { generation, .. } = effects[0].clone() else {
        panic!()
    };
    input.debounce_fired(generation);

    // dismissed while the fetch is still in flight
    input.key(Key::Escape, now);
    assert_eq!(input.phase(), Phase::Idle);

    input.fetch_done(generation, vec![item("GitHub", "https://github.com")], now);
    assert!(!input.showing(), "a dismissed panel must stay closed");
    assert!(input.suggestions().is_empty());
    assert_eq!(input.query(), "git");
}

#[test]
fn enter_during_fetch_submits_and_closes() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    let effects = input.edit("git", EditKind::Insert, now);
    let Effect::ScheduleDebounce { generation, .. } = effects[0].clone() else {
        panic!()
    };
    input.debounce_fired(generation);

    let effects = input.key(Key::Enter, now);
    assert!(effects.contains(&Effect::Submit {
        text: "git".into(),
    }));

    // the fetch the user outran cannot reopen the panel
    input.fetch_done(generation, vec![item("GitHub", "https://github.com")], now);
    assert!(!input.showing());
    assert!(input.suggestions().is_empty());
}

#[test]
fn blur_prevents_a_late_fetch_from_reopening_the_panel() {
    let now = Instant::now();
    let mut input = AddressInput::new();
    let effects = input.edit("git", EditKind::Insert, now);
    let Effect::ScheduleDebounce { generation, .. } = effects[0].clone() else {
        panic!()
    };
    input.debounce_fired(generation);
    input.blur();

    input.fetch_done(generation, vec![item("GitHub", "https://github.com")], now);
    assert!(!input.showing());
    assert!(input.suggestions().is_empty());
}

#[test]
fn backspace_within_cooldown_suppresses_completion_only() {
    let now = Instant::now();
    let mut input = AddressInput::new();

    // delete a character, then retype it 100ms later
    input.edit("gi", EditKind::Delete, now);
    let later = now + Duration::from_millis(100);
    let effects = input.edit("git", EditKind::Insert, later);
    let Effect::ScheduleDebounce { generation, .. } = effects[0].clone() else {
        panic!()
    };
    input.debounce_fired(generation);
    let effects = input.fetch_done(
        generation,
        vec![item("GitHub", "https://github.com")],
        later,
    );

    // suggestions show, but no ghost text was applied
    assert!(input.showing());
    assert!(effects.is_empty());
    assert_eq!(input.shown(), "git");
}
