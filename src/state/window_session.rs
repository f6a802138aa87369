//! Windowed sequence engine: buffer + policy + generator.
//!
//! `WindowSession` lives on the interactive thread and is the only owner of
//! the [`WindowBuffer`] and [`PolicyState`]. It turns policy commands into
//! buffer mutations and generator jobs, drains delivered batches, and
//! reports every change to the render layer as a [`WindowEvent`].
//!
//! Threshold re-evaluation after an eviction or insertion runs in a bounded
//! loop (see [`MAX_REEVALUATIONS`]) instead of re-entering the viewport
//! handler.

use super::viewport_policy::{Command, PolicyState, ViewportEvent};
use super::visible_range::VisibleRange;
use super::window_buffer::{Edge, WindowBuffer};
use crate::source::{Batch, Direction, GenerationRequest, Generator};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Upper bound on policy evaluations per viewport event or delivery.
pub const MAX_REEVALUATIONS: usize = 4;

/// Window geometry. Any change rebuilds the window from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Cells per grid row.
    pub columns: usize,
    /// Rows fetched per extra batch.
    pub buffer_rows: usize,
    /// Rows materialized by the initial load.
    pub initial_rows: usize,
}

impl WindowConfig {
    /// Batch size of an extra fetch: `buffer_rows * columns`, at least 1.
    pub fn extra_cells(&self) -> usize {
        self.buffer_rows.saturating_mul(self.columns).max(1)
    }

    /// Size of the initial load: `initial_rows * columns`, at least 1.
    pub fn initial_cells(&self) -> usize {
        self.initial_rows.saturating_mul(self.columns).max(1)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            buffer_rows: 100,
            initial_rows: 30,
        }
    }
}

/// Change notification for the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// `count` entries were inserted at `edge`, starting at `index`.
    BatchReady {
        /// Edge the batch was inserted at.
        edge: Edge,
        /// Index of the first inserted entry.
        index: usize,
        /// Number of inserted entries.
        count: usize,
    },
    /// `count` entries starting at `index` were removed from `edge`.
    Evicted {
        /// Edge the run was removed from.
        edge: Edge,
        /// Index of the first removed entry (before removal).
        index: usize,
        /// Number of removed entries.
        count: usize,
    },
}

/// One active window over the number sequence.
#[derive(Debug)]
pub struct WindowSession {
    config: WindowConfig,
    buffer: WindowBuffer,
    policy: PolicyState,
    generator: Generator,
    last_event: Option<ViewportEvent>,
    /// Grid rows on screen, `0` until the render layer reports them.
    viewport_rows: usize,
}

impl WindowSession {
    /// Create a session and start the initial load from value 0.
    pub fn new(config: WindowConfig) -> Self {
        let mut session = Self {
            config,
            buffer: WindowBuffer::new(),
            policy: PolicyState::Idle,
            generator: Generator::new(),
            last_event: None,
            viewport_rows: 0,
        };
        session.start_initial_load();
        session
    }

    /// Current geometry.
    pub fn config(&self) -> WindowConfig {
        self.config
    }

    /// Read-only view of the materialized window.
    pub fn buffer(&self) -> &WindowBuffer {
        &self.buffer
    }

    /// Current policy state.
    pub fn policy(&self) -> PolicyState {
        self.policy
    }

    /// Whether a generation job is in flight.
    pub fn is_generating(&self) -> bool {
        self.generator.is_generating()
    }

    /// Smallest window kept outside overdraft.
    ///
    /// The configured initial size, or `2 * viewport_rows + 1` rows if that is
    /// larger, so every threshold sits at least a screen away from both edges.
    pub fn normal_cells(&self) -> usize {
        let rows = self.viewport_rows.saturating_mul(2).saturating_add(1);
        rows.saturating_mul(self.config.columns).max(self.config.initial_cells())
    }

    /// Record how many grid rows are on screen, growing the window if needed.
    pub fn set_viewport_rows(&mut self, rows: usize) {
        if rows != self.viewport_rows {
            self.viewport_rows = rows;
            self.top_up();
        }
    }

    /// Rebuild the window for a new geometry.
    ///
    /// Waits for any in-flight job and drops its batch, discards the buffer,
    /// resets the policy, then starts a fresh initial load from 0.
    pub fn reconfigure(&mut self, config: WindowConfig) {
        info!(?config, "Reconfiguring window");
        if let Some(stale) = self.generator.idle() {
            debug!(entries = stale.len(), "Dropping batch from previous window");
        }
        self.config = config;
        self.buffer = WindowBuffer::new();
        self.policy = PolicyState::Idle;
        self.last_event = None;
        self.start_initial_load();
    }

    /// Wait for any in-flight job so no worker outlives the session.
    pub fn shutdown(&mut self) {
        if let Some(stale) = self.generator.idle() {
            debug!(entries = stale.len(), "Dropping undelivered batch on shutdown");
        }
    }

    /// Handle a viewport movement.
    ///
    /// `delta` is positive when moving towards higher values.
    pub fn on_viewport_moved(&mut self, visible: VisibleRange, delta: isize) -> Vec<WindowEvent> {
        let event = ViewportEvent::new(visible, delta);
        self.last_event = Some(event);

        let mut events = Vec::new();
        self.run_policy(event, &mut events);
        events
    }

    /// Drain a delivered batch, if any, without blocking.
    pub fn poll(&mut self) -> Vec<WindowEvent> {
        match self.generator.poll() {
            Some(batch) => self.apply_batch(batch),
            None => {
                self.release_lost_job();
                Vec::new()
            }
        }
    }

    /// Wait up to `timeout` for a delivered batch.
    pub fn poll_timeout(&mut self, timeout: Duration) -> Vec<WindowEvent> {
        match self.generator.poll_timeout(timeout) {
            Some(batch) => self.apply_batch(batch),
            None => {
                self.release_lost_job();
                Vec::new()
            }
        }
    }

    /// Leave a loading state whose job ended without a batch.
    fn release_lost_job(&mut self) {
        let waiting = matches!(
            self.policy,
            PolicyState::Loading | PolicyState::LoadingWhileOverdraft
        );
        if waiting && !self.generator.is_generating() {
            error!(policy = ?self.policy, "Generation job ended without a batch");
            self.policy = self.policy.on_batch_inserted(0);
        }
    }

    fn start_initial_load(&mut self) {
        let count = u32::try_from(self.config.initial_cells()).unwrap_or(u32::MAX);
        let request = GenerationRequest::new(0, count, Direction::Ascending);
        if self.generator.start(request) {
            self.policy = PolicyState::Loading;
        } else {
            warn!("Initial load could not be started");
        }
    }

    /// Insert a delivered batch, then re-evaluate the last viewport.
    fn apply_batch(&mut self, batch: Batch) -> Vec<WindowEvent> {
        let mut events = Vec::new();
        let edge = match batch.request().direction() {
            Direction::Ascending => Edge::Tail,
            Direction::Descending => Edge::Head,
        };
        let produced = batch.len();
        let inserted = self.buffer.insert_batch(batch.into_slots(), edge, produced);
        debug!(?edge, produced, inserted, "Batch delivered");

        if inserted > 0 {
            let index = match edge {
                Edge::Head => 0,
                Edge::Tail => self.buffer.len() - inserted,
            };
            events.push(WindowEvent::BatchReady {
                edge,
                index,
                count: inserted,
            });
        }

        self.policy = self.policy.on_batch_inserted(inserted);

        if let Some(mut event) = self.last_event {
            if edge == Edge::Head {
                event.visible = event.visible.shifted_forward(inserted);
            }
            self.last_event = Some(event);
            self.run_policy(event, &mut events);
        }
        self.top_up();
        events
    }

    /// Extend an idle window at the tail until it holds [`Self::normal_cells`].
    ///
    /// The batch is requested as a plain load, so it joins the normal part of
    /// the window instead of opening an overdraft. Returns whether a job was
    /// started.
    fn top_up(&mut self) -> bool {
        if self.policy != PolicyState::Idle || self.generator.is_generating() {
            return false;
        }
        let Some(edges) = self.buffer.edges() else {
            return false;
        };
        let wanted = self.normal_cells();
        if edges.len >= wanted {
            return false;
        }
        let Some(start) = edges.last.checked_add(1) else {
            return false;
        };
        let count = u32::try_from(wanted - edges.len).unwrap_or(u32::MAX);
        if !self.generator.start(GenerationRequest::new(start, count, Direction::Ascending)) {
            return false;
        }
        debug!(len = edges.len, wanted, "Growing window to fit the viewport");
        self.policy = PolicyState::Loading;
        true
    }

    /// Evaluate the policy against the current window, executing commands.
    ///
    /// Evictions are synchronous, so after each one the (shifted) viewport is
    /// evaluated again; a generation request ends the loop because the
    /// policy ignores events until the batch arrives.
    fn run_policy(&mut self, mut event: ViewportEvent, events: &mut Vec<WindowEvent>) {
        let extra_cells = self.config.extra_cells();

        for _ in 0..MAX_REEVALUATIONS {
            if self.top_up() {
                return;
            }
            let previous = self.policy;
            let transition = previous.on_viewport_moved(event, self.buffer.edges(), extra_cells);
            self.policy = transition.next;

            match transition.command {
                Command::None => return,
                Command::Generate(request) => {
                    self.start_generation(request, previous);
                    return;
                }
                Command::Evict {
                    edge,
                    start_index,
                    count,
                } => {
                    if !self.buffer.evict(start_index, count) {
                        self.policy = PolicyState::Idle;
                        return;
                    }
                    events.push(WindowEvent::Evicted {
                        edge,
                        index: start_index,
                        count,
                    });

                    let shifted = match edge {
                        Edge::Head => event.visible.shifted_back(count),
                        Edge::Tail => event.visible,
                    };
                    let Some(visible) = shifted.clamped_to(self.buffer.len()) else {
                        self.policy = PolicyState::Idle;
                        return;
                    };
                    event.visible = visible;
                    self.last_event = Some(event);

                    let after = self.policy.on_evicted(edge, self.buffer.edges(), extra_cells);
                    self.policy = after.next;
                    if let Command::Generate(request) = after.command {
                        self.start_generation(request, PolicyState::Idle);
                        return;
                    }
                }
            }
        }
        debug!(limit = MAX_REEVALUATIONS, "Re-evaluation limit reached");
    }

    /// Start a job; on refusal fall back to `fallback` so the policy does not
    /// wait forever for a batch that will never come.
    fn start_generation(&mut self, request: GenerationRequest, fallback: PolicyState) {
        if !self.generator.start(request) {
            warn!(?request, "Generation request refused");
            self.policy = fallback;
        }
    }
}

impl Drop for WindowSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "window_session_tests.rs"]
mod tests;
