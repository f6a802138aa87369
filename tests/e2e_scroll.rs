//! End-to-end scrolling tests.
//!
//! Drives the window through the public API the way the event loop does:
//! viewport movements in, delivered batches pumped back, and checks the
//! window and the anchored view after every step.

use numgrid::config::KeyBindings;
use numgrid::model::{Entry, KeyAction};
use numgrid::state::{
    handle_grid_action, AppState, Edge, PolicyState, VisibleRange, WindowConfig, WindowEvent,
    WindowSession,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

fn window(session: &WindowSession) -> (u64, u64) {
    let buffer = session.buffer();
    let first = buffer.first().map(Entry::value).expect("window loaded");
    let last = buffer.last().map(Entry::value).expect("window loaded");
    (first, last)
}

fn assert_gap_free(state: &AppState) {
    let values: Vec<u64> = state.buffer().iter().map(Entry::value).collect();
    assert!(values.windows(2).all(|w| w[1] == w[0] + 1), "window has a gap");
}

/// Pump until no job is in flight.
fn settle(state: &mut AppState) {
    for _ in 0..10 {
        if !state.session().is_generating() {
            return;
        }
        state.pump_timeout(WAIT);
    }
    panic!("generator never went idle");
}

fn top_value(state: &AppState) -> u64 {
    state.buffer().get(state.top()).map(Entry::value).expect("top on screen")
}

fn press(state: &mut AppState, bindings: &KeyBindings, code: KeyCode) {
    let key = KeyEvent::new(code, KeyModifiers::NONE);
    let action = bindings.get(key).expect("bound key");
    assert_ne!(action, KeyAction::Quit);
    handle_grid_action(state, action);
}

#[test]
fn overdraft_round_trip_at_session_level() {
    let mut session = WindowSession::new(WindowConfig::default());
    session.poll_timeout(WAIT);
    assert_eq!(window(&session), (0, 299));

    // Past the midpoint going down: fetch the next 1000.
    let events = session.on_viewport_moved(VisibleRange::new(200, 299), 1);
    assert!(events.is_empty());
    let events = session.poll_timeout(WAIT);
    assert_eq!(
        events,
        vec![WindowEvent::BatchReady {
            edge: Edge::Tail,
            index: 300,
            count: 1000
        }]
    );
    assert_eq!(window(&session), (0, 1299));
    assert_eq!(session.policy(), PolicyState::Overdraft { extra: 1000 });

    // Back above the midpoint: the extra tail goes away.
    let events = session.on_viewport_moved(VisibleRange::new(100, 199), -1);
    assert_eq!(
        events,
        vec![WindowEvent::Evicted {
            edge: Edge::Tail,
            index: 300,
            count: 1000
        }]
    );
    assert_eq!(window(&session), (0, 299));
    assert_eq!(session.policy(), PolicyState::Idle);
    assert!(!session.is_generating());
}

#[test]
fn paging_down_and_back_up_keeps_view_anchored() {
    let bindings = KeyBindings::default();
    let mut state = AppState::new(WindowConfig::default());
    state.set_viewport_rows(22);
    settle(&mut state);
    assert_eq!(top_value(&state), 0);

    let page = 22 * 10;
    let screen = |state: &AppState| state.visible_range().map_or(0, |v| v.len());
    let max_len = state.session().normal_cells() + WindowConfig::default().extra_cells();

    for step in 0..40 {
        let before = top_value(&state);
        press(&mut state, &bindings, KeyCode::PageDown);
        settle(&mut state);

        assert_gap_free(&state);
        assert!(state.buffer().len() <= max_len, "window never exceeds one overdraft");
        assert_eq!(top_value(&state), before + page, "page {step} down");
        assert_eq!(screen(&state), page as usize, "page {step} down left blank cells");
    }
    assert_eq!(top_value(&state), 40 * page);

    for step in 0..200 {
        let before = top_value(&state);
        if before == 0 {
            break;
        }
        press(&mut state, &bindings, KeyCode::PageUp);
        settle(&mut state);

        assert_gap_free(&state);
        assert_eq!(top_value(&state), before.saturating_sub(page), "page {step} up");
        assert_eq!(screen(&state), page as usize, "page {step} up left blank cells");
    }
    assert_eq!(top_value(&state), 0, "paged back to the start of the number line");
    assert_eq!(state.buffer().first().map(Entry::value), Some(0));
}

#[test]
fn factors_selection_survives_scrolling_away() {
    let bindings = KeyBindings::default();
    let mut state = AppState::new(WindowConfig::default());
    state.set_viewport_rows(22);
    settle(&mut state);

    for _ in 0..12 {
        press(&mut state, &bindings, KeyCode::Right);
    }
    press(&mut state, &bindings, KeyCode::Enter);
    assert_eq!(state.selection().map(|s| s.value()), Some(12));

    for _ in 0..10 {
        press(&mut state, &bindings, KeyCode::PageDown);
        settle(&mut state);
    }
    let selection = state.selection().expect("selection kept");
    assert_eq!(selection.value(), 12);
    assert!(selection.factors().contains(&6));

    press(&mut state, &bindings, KeyCode::Esc);
    assert!(state.selection().is_none());
}
