//! Viewport policy: when to generate, when to evict.
//!
//! A pure state machine. Each transition takes the current [`PolicyState`]
//! plus a snapshot of the window and returns the next state together with a
//! [`Command`] for the caller to execute. Nothing here touches the buffer or
//! the generator, so every decision is testable without a UI or a thread.
//!
//! # Overdraft
//!
//! Scrolling past a threshold fetches one batch of "extra" entries at the
//! edge being approached. Until those are evicted the window is in
//! overdraft: the next threshold crossing evicts a batch instead of fetching
//! another, so the window size stays bounded.

use super::visible_range::VisibleRange;
use super::window_buffer::{BufferEdges, Edge};
use crate::source::{Direction, GenerationRequest, MIN_VALUE};
use tracing::debug;

/// Policy state for one window session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyState {
    /// Nothing pending, window at its normal size.
    #[default]
    Idle,
    /// A batch or eviction is pending; the window will return to normal size.
    Loading,
    /// An extra batch is being generated; the window will be in overdraft.
    LoadingWhileOverdraft,
    /// `extra` entries beyond the normal window are materialized.
    Overdraft {
        /// Number of extra entries actually inserted by the last fetch.
        extra: usize,
    },
}

impl PolicyState {
    /// Whether viewport events are currently ignored.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading | Self::LoadingWhileOverdraft)
    }

    /// Whether the window holds (or is about to hold) extra entries.
    pub fn is_overdraft(&self) -> bool {
        matches!(self, Self::LoadingWhileOverdraft | Self::Overdraft { .. })
    }

    /// Short label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::LoadingWhileOverdraft => "loading+",
            Self::Overdraft { .. } => "overdraft",
        }
    }
}

/// One viewport movement as reported by the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportEvent {
    /// Fully visible cells after the movement.
    pub visible: VisibleRange,
    /// Scroll delta; positive moves towards higher values.
    pub delta: isize,
}

impl ViewportEvent {
    /// Create an event.
    pub fn new(visible: VisibleRange, delta: isize) -> Self {
        Self { visible, delta }
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Nothing to do.
    None,
    /// Start a generation job.
    Generate(GenerationRequest),
    /// Remove `count` entries starting at `start_index` from `edge`.
    Evict {
        /// Edge the run belongs to.
        edge: Edge,
        /// First index to remove.
        start_index: usize,
        /// Number of entries to remove.
        count: usize,
    },
}

/// Result of a transition: next state plus the command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State after the command has been issued.
    pub next: PolicyState,
    /// Command for the caller.
    pub command: Command,
}

impl Transition {
    fn stay(state: PolicyState) -> Self {
        Self {
            next: state,
            command: Command::None,
        }
    }
}

/// Index thresholds that trigger a fetch or eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Scrolling down with the last visible index at or past this fires.
    pub lower: usize,
    /// Scrolling up with the first visible index at or before this fires.
    pub higher: usize,
}

impl Thresholds {
    /// Thresholds for a window of `len` entries in `state`.
    ///
    /// Normally both sit at the middle of the window. In overdraft they are
    /// centred on the normal (non-extra) part of the window.
    pub fn for_state(state: PolicyState, len: usize) -> Self {
        match state {
            PolicyState::Overdraft { extra } => {
                let normal = len.saturating_sub(extra);
                Self {
                    lower: len - normal / 2,
                    higher: normal / 2,
                }
            }
            _ => Self {
                lower: len / 2,
                higher: len / 2,
            },
        }
    }
}

impl PolicyState {
    /// React to a viewport movement.
    ///
    /// `extra_cells` is the configured batch size (`buffer_rows * columns`).
    pub fn on_viewport_moved(
        self,
        event: ViewportEvent,
        edges: Option<BufferEdges>,
        extra_cells: usize,
    ) -> Transition {
        if self.is_loading() {
            return Transition::stay(self);
        }
        let Some(edges) = edges else {
            return Transition::stay(self);
        };

        let thresholds = Thresholds::for_state(self, edges.len);

        if event.delta > 0 && event.visible.last() >= thresholds.lower {
            debug!(?thresholds, visible = ?event.visible, state = ?self, "Passed lower threshold");
            return self.on_lower_crossed(event.visible, edges, extra_cells);
        }
        if event.delta < 0 && event.visible.first() <= thresholds.higher {
            debug!(?thresholds, visible = ?event.visible, state = ?self, "Passed higher threshold");
            return self.on_higher_crossed(event.visible, edges, extra_cells);
        }
        Transition::stay(self)
    }

    /// Downward crossing: drop the extra head entries, or fetch more at the tail.
    ///
    /// Cells on screen are never evicted. While the extra run still reaches
    /// into the viewport the eviction waits; once the viewport is pinned at
    /// the tail only the cells above it are dropped.
    fn on_lower_crossed(
        self,
        visible: VisibleRange,
        edges: BufferEdges,
        extra_cells: usize,
    ) -> Transition {
        if let Self::Overdraft { extra } = self {
            if extra >= edges.len {
                return Transition::stay(Self::Idle);
            }
            let count = if visible.first() >= extra {
                extra
            } else if visible.last() + 1 >= edges.len {
                visible.first()
            } else {
                0
            };
            if count == 0 {
                debug!(extra, ?visible, "Head eviction deferred, extra run on screen");
                return Transition::stay(self);
            }
            return Transition {
                next: Self::Loading,
                command: Command::Evict {
                    edge: Edge::Head,
                    start_index: 0,
                    count,
                },
            };
        }

        match edges.last.checked_add(1) {
            Some(start) => Transition {
                next: Self::LoadingWhileOverdraft,
                command: Command::Generate(request(start, extra_cells, Direction::Ascending)),
            },
            None => Transition::stay(self),
        }
    }

    /// Upward crossing: drop the extra tail entries, or fetch more at the head.
    ///
    /// Mirrors [`Self::on_lower_crossed`]: the eviction waits while it would
    /// touch the viewport, and a viewport pinned at the head only drops the
    /// cells below it.
    fn on_higher_crossed(
        self,
        visible: VisibleRange,
        edges: BufferEdges,
        extra_cells: usize,
    ) -> Transition {
        if let Self::Overdraft { extra } = self {
            if extra >= edges.len {
                return Transition::stay(Self::Idle);
            }
            let normal = edges.len - extra;
            let start_index = if visible.last() < normal {
                normal
            } else if visible.first() == 0 {
                visible.last() + 1
            } else {
                edges.len
            };
            if start_index >= edges.len {
                debug!(extra, ?visible, "Tail eviction deferred, extra run on screen");
                return Transition::stay(self);
            }
            return Transition {
                next: Self::Loading,
                command: Command::Evict {
                    edge: Edge::Tail,
                    start_index,
                    count: edges.len - start_index,
                },
            };
        }
        Self::fetch_below(self, edges, extra_cells)
    }

    /// Fetch a descending batch below the window, unless it already starts at 0.
    fn fetch_below(fallback: Self, edges: BufferEdges, extra_cells: usize) -> Transition {
        if edges.first <= MIN_VALUE {
            return Transition::stay(fallback);
        }
        Transition {
            next: Self::LoadingWhileOverdraft,
            command: Command::Generate(request(edges.first - 1, extra_cells, Direction::Descending)),
        }
    }

    /// Continue after an eviction issued by this policy has been executed.
    ///
    /// After a tail eviction the upward runway is restocked with a descending
    /// fetch, as long as the window has not reached value 0.
    pub fn on_evicted(self, edge: Edge, edges: Option<BufferEdges>, extra_cells: usize) -> Transition {
        match (edge, edges) {
            (Edge::Tail, Some(edges)) => Self::fetch_below(Self::Idle, edges, extra_cells),
            _ => Transition::stay(Self::Idle),
        }
    }

    /// State after a delivered batch has been inserted.
    pub fn on_batch_inserted(self, inserted: usize) -> Self {
        match self {
            Self::LoadingWhileOverdraft if inserted > 0 => Self::Overdraft { extra: inserted },
            Self::LoadingWhileOverdraft | Self::Loading => Self::Idle,
            other => other,
        }
    }
}

fn request(start: u64, extra_cells: usize, direction: Direction) -> GenerationRequest {
    let count = u32::try_from(extra_cells).unwrap_or(u32::MAX);
    GenerationRequest::new(start, count, direction)
}

#[cfg(test)]
#[path = "viewport_policy_tests.rs"]
mod tests;
