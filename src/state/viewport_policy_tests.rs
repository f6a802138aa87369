//! Tests for the viewport policy state machine.

use super::*;

const EXTRA: usize = 1000;

fn edges(first: u64, len: usize) -> Option<BufferEdges> {
    Some(BufferEdges {
        len,
        first,
        last: first + len as u64 - 1,
    })
}

fn down(first: usize, last: usize) -> ViewportEvent {
    ViewportEvent::new(VisibleRange::new(first, last), 1)
}

fn up(first: usize, last: usize) -> ViewportEvent {
    ViewportEvent::new(VisibleRange::new(first, last), -1)
}

// ===== Thresholds =====

#[test]
fn thresholds_sit_at_half_when_not_overdraft() {
    let t = Thresholds::for_state(PolicyState::Idle, 300);
    assert_eq!(t, Thresholds { lower: 150, higher: 150 });
}

#[test]
fn thresholds_centre_on_normal_part_in_overdraft() {
    let t = Thresholds::for_state(PolicyState::Overdraft { extra: 1000 }, 1300);
    assert_eq!(t.lower, 1300 - 150);
    assert_eq!(t.higher, 150);
}

// ===== Loading =====

#[test]
fn loading_ignores_viewport_events() {
    for state in [PolicyState::Loading, PolicyState::LoadingWhileOverdraft] {
        let t = state.on_viewport_moved(down(290, 299), edges(0, 300), EXTRA);
        assert_eq!(t.next, state);
        assert_eq!(t.command, Command::None);
    }
}

#[test]
fn empty_window_does_nothing() {
    let t = PolicyState::Idle.on_viewport_moved(down(0, 0), None, EXTRA);
    assert_eq!(t, Transition::stay(PolicyState::Idle));
}

#[test]
fn zero_delta_does_nothing() {
    let event = ViewportEvent::new(VisibleRange::new(0, 299), 0);
    let t = PolicyState::Idle.on_viewport_moved(event, edges(0, 300), EXTRA);
    assert_eq!(t.command, Command::None);
}

// ===== Downward =====

#[test]
fn downward_below_threshold_does_nothing() {
    let t = PolicyState::Idle.on_viewport_moved(down(40, 139), edges(0, 300), EXTRA);
    assert_eq!(t.command, Command::None);
    assert_eq!(t.next, PolicyState::Idle);
}

#[test]
fn downward_past_threshold_requests_ascending_batch() {
    let t = PolicyState::Idle.on_viewport_moved(down(200, 299), edges(0, 300), EXTRA);
    assert_eq!(t.next, PolicyState::LoadingWhileOverdraft);
    assert_eq!(
        t.command,
        Command::Generate(GenerationRequest::new(300, 1000, Direction::Ascending))
    );
}

#[test]
fn downward_in_overdraft_evicts_head() {
    let state = PolicyState::Overdraft { extra: 1000 };
    let t = state.on_viewport_moved(down(1200, 1299), edges(0, 1300), EXTRA);
    assert_eq!(t.next, PolicyState::Loading);
    assert_eq!(
        t.command,
        Command::Evict {
            edge: Edge::Head,
            start_index: 0,
            count: 1000
        }
    );
}

#[test]
fn downward_in_overdraft_before_threshold_does_nothing() {
    let state = PolicyState::Overdraft { extra: 1000 };
    let t = state.on_viewport_moved(down(200, 299), edges(0, 1300), EXTRA);
    assert_eq!(t.next, state);
    assert_eq!(t.command, Command::None);
}

#[test]
fn downward_at_u64_max_does_not_request() {
    let top = Some(BufferEdges {
        len: 10,
        first: u64::MAX - 9,
        last: u64::MAX,
    });
    let t = PolicyState::Idle.on_viewport_moved(down(5, 9), top, EXTRA);
    assert_eq!(t.command, Command::None);
}

// ===== Upward =====

#[test]
fn upward_past_threshold_requests_descending_batch() {
    let t = PolicyState::Idle.on_viewport_moved(up(100, 199), edges(5000, 300), EXTRA);
    assert_eq!(t.next, PolicyState::LoadingWhileOverdraft);
    assert_eq!(
        t.command,
        Command::Generate(GenerationRequest::new(4999, 1000, Direction::Descending))
    );
}

#[test]
fn upward_at_domain_floor_never_requests() {
    let t = PolicyState::Idle.on_viewport_moved(up(0, 99), edges(0, 300), EXTRA);
    assert_eq!(t.next, PolicyState::Idle);
    assert_eq!(t.command, Command::None);
}

#[test]
fn upward_in_overdraft_evicts_tail() {
    let state = PolicyState::Overdraft { extra: 1000 };
    let t = state.on_viewport_moved(up(100, 199), edges(0, 1300), EXTRA);
    assert_eq!(t.next, PolicyState::Loading);
    assert_eq!(
        t.command,
        Command::Evict {
            edge: Edge::Tail,
            start_index: 300,
            count: 1000
        }
    );
}

#[test]
fn overdraft_with_partial_batch_evicts_only_inserted_count() {
    // A fetch near 0 inserted just 37 entries at the head.
    let state = PolicyState::Overdraft { extra: 37 };
    let t = state.on_viewport_moved(down(300, 336), edges(0, 337), EXTRA);
    assert_eq!(
        t.command,
        Command::Evict {
            edge: Edge::Head,
            start_index: 0,
            count: 37
        }
    );
}

// ===== Eviction never touches the viewport =====

/// 22 grid rows of 10 cells over a 300-cell normal window.
const OVERDRAFT: PolicyState = PolicyState::Overdraft { extra: 1000 };

#[test]
fn head_eviction_waits_while_extra_run_is_on_screen() {
    // Past the lower threshold (1150) but cells 940..=999 are visible.
    let t = OVERDRAFT.on_viewport_moved(down(940, 1159), edges(0, 1300), EXTRA);
    assert_eq!(t, Transition::stay(OVERDRAFT));
}

#[test]
fn head_eviction_fires_once_extra_run_scrolled_off() {
    let t = OVERDRAFT.on_viewport_moved(down(1000, 1219), edges(0, 1300), EXTRA);
    assert_eq!(t.next, PolicyState::Loading);
    assert_eq!(
        t.command,
        Command::Evict {
            edge: Edge::Head,
            start_index: 0,
            count: 1000
        }
    );
}

#[test]
fn viewport_pinned_at_tail_drops_only_cells_above_it() {
    // A 400-cell viewport never clears the 1000-cell extra run.
    let t = OVERDRAFT.on_viewport_moved(down(900, 1299), edges(0, 1300), EXTRA);
    assert_eq!(
        t.command,
        Command::Evict {
            edge: Edge::Head,
            start_index: 0,
            count: 900
        }
    );
}

#[test]
fn tail_eviction_waits_while_extra_run_is_on_screen() {
    // Past the higher threshold (150) but cells 300..=319 are visible.
    let t = OVERDRAFT.on_viewport_moved(up(100, 319), edges(0, 1300), EXTRA);
    assert_eq!(t, Transition::stay(OVERDRAFT));
}

#[test]
fn tail_eviction_fires_once_extra_run_scrolled_off() {
    let t = OVERDRAFT.on_viewport_moved(up(80, 299), edges(0, 1300), EXTRA);
    assert_eq!(
        t.command,
        Command::Evict {
            edge: Edge::Tail,
            start_index: 300,
            count: 1000
        }
    );
}

#[test]
fn viewport_pinned_at_head_drops_only_cells_below_it() {
    let t = OVERDRAFT.on_viewport_moved(up(0, 399), edges(2000, 1300), EXTRA);
    assert_eq!(t.next, PolicyState::Loading);
    assert_eq!(
        t.command,
        Command::Evict {
            edge: Edge::Tail,
            start_index: 400,
            count: 900
        }
    );
}

#[test]
fn whole_window_on_screen_evicts_nothing() {
    let t = OVERDRAFT.on_viewport_moved(up(0, 1299), edges(2000, 1300), EXTRA);
    assert_eq!(t, Transition::stay(OVERDRAFT));
}

// ===== After eviction =====

#[test]
fn after_head_eviction_returns_to_idle() {
    let t = PolicyState::Loading.on_evicted(Edge::Head, edges(1000, 300), EXTRA);
    assert_eq!(t, Transition::stay(PolicyState::Idle));
}

#[test]
fn after_tail_eviction_restocks_upward_runway() {
    let t = PolicyState::Loading.on_evicted(Edge::Tail, edges(2000, 300), EXTRA);
    assert_eq!(t.next, PolicyState::LoadingWhileOverdraft);
    assert_eq!(
        t.command,
        Command::Generate(GenerationRequest::new(1999, 1000, Direction::Descending))
    );
}

#[test]
fn after_tail_eviction_at_floor_goes_idle() {
    let t = PolicyState::Loading.on_evicted(Edge::Tail, edges(0, 300), EXTRA);
    assert_eq!(t, Transition::stay(PolicyState::Idle));
}

// ===== After insertion =====

#[test]
fn inserted_extra_batch_enters_overdraft() {
    assert_eq!(
        PolicyState::LoadingWhileOverdraft.on_batch_inserted(1000),
        PolicyState::Overdraft { extra: 1000 }
    );
}

#[test]
fn empty_extra_batch_returns_to_idle() {
    assert_eq!(PolicyState::LoadingWhileOverdraft.on_batch_inserted(0), PolicyState::Idle);
}

#[test]
fn plain_load_returns_to_idle() {
    assert_eq!(PolicyState::Loading.on_batch_inserted(300), PolicyState::Idle);
}

#[test]
fn labels_are_distinct() {
    let labels = [
        PolicyState::Idle.label(),
        PolicyState::Loading.label(),
        PolicyState::LoadingWhileOverdraft.label(),
        PolicyState::Overdraft { extra: 1 }.label(),
    ];
    for (i, a) in labels.iter().enumerate() {
        for b in &labels[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
