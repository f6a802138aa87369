//! Application state and transitions.
//!
//! AppState is the root state type containing all UI state. It owns the
//! [`WindowSession`] and keeps the on-screen grid anchored to the same values
//! while the window grows and shrinks underneath it.

use super::visible_range::VisibleRange;
use super::window_buffer::{Edge, WindowBuffer};
use super::window_session::{WindowConfig, WindowEvent, WindowSession};
use crate::config::{BUFFER_ROWS_RANGE, COLUMNS_RANGE};
use crate::model::{shares_factor_with, Entry};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::debug;

// ===== FactorSelection =====

/// The number whose factors popup is open.
///
/// Holds a copy of the factors so the popup and highlights survive the
/// selected entry being evicted from the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorSelection {
    value: u64,
    is_prime: bool,
    factors: BTreeSet<u64>,
    highlights: bool,
}

impl FactorSelection {
    /// Select `entry`. Highlighting is only enabled for composites above 3.
    pub fn new(entry: &Entry) -> Self {
        Self {
            value: entry.value(),
            is_prime: entry.is_prime(),
            factors: entry.factors().clone(),
            highlights: entry.is_highlightable(),
        }
    }

    /// Selected value.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Whether the selected value is prime.
    pub fn is_prime(&self) -> bool {
        self.is_prime
    }

    /// Proper factors of the selected value.
    pub fn factors(&self) -> &BTreeSet<u64> {
        &self.factors
    }

    /// Whether this selection highlights other cells at all.
    pub fn is_highlighting(&self) -> bool {
        self.highlights
    }

    /// Whether `entry` should be highlighted for this selection.
    ///
    /// A cell is highlighted if its value is one of the selected factors, or
    /// if it shares a factor with the selected number.
    pub fn highlights(&self, entry: &Entry) -> bool {
        self.highlights && shares_factor_with(&self.factors, entry.value(), entry.factors())
    }
}

// ===== AppState =====

/// Application state.
///
/// # Anchoring
///
/// `top` and `cursor` are window indices. When the session inserts entries
/// at the head or evicts them from the head, every index shifts; AppState
/// applies the same shift so the user keeps looking at the same values.
#[derive(Debug)]
pub struct AppState {
    session: WindowSession,
    /// Index of the first cell on screen.
    top: usize,
    /// Index of the cursor cell.
    cursor: usize,
    /// Grid rows that fit on screen. Set by the layout on every draw.
    viewport_rows: usize,
    selection: Option<FactorSelection>,
    /// Whether the help overlay is currently visible.
    pub help_visible: bool,
}

impl AppState {
    /// Create state for a fresh window. The initial load starts immediately.
    pub fn new(config: WindowConfig) -> Self {
        Self {
            session: WindowSession::new(config),
            top: 0,
            cursor: 0,
            viewport_rows: 1,
            selection: None,
            help_visible: false,
        }
    }

    /// The window session.
    pub fn session(&self) -> &WindowSession {
        &self.session
    }

    /// The materialized window.
    pub fn buffer(&self) -> &WindowBuffer {
        self.session.buffer()
    }

    /// Cells per grid row.
    pub fn columns(&self) -> usize {
        self.session.config().columns.max(1)
    }

    /// Index of the first cell on screen.
    pub fn top(&self) -> usize {
        self.top
    }

    /// Index of the cursor cell.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entry under the cursor, if the window is loaded.
    pub fn cursor_entry(&self) -> Option<&Entry> {
        self.buffer().get(self.cursor)
    }

    /// Open factors selection, if any.
    pub fn selection(&self) -> Option<&FactorSelection> {
        self.selection.as_ref()
    }

    /// Grid rows that fit on screen.
    pub fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    /// Update the number of grid rows that fit on screen.
    ///
    /// The session grows its window to keep a screen of runway past each
    /// threshold.
    pub fn set_viewport_rows(&mut self, rows: usize) {
        let rows = rows.max(1);
        self.session.set_viewport_rows(rows);
        if rows != self.viewport_rows {
            debug!(rows, "Viewport rows changed");
            self.viewport_rows = rows;
            self.keep_cursor_on_screen();
        }
    }

    fn viewport_cells(&self) -> usize {
        self.viewport_rows.saturating_mul(self.columns())
    }

    /// Indices of the cells currently on screen, `None` while empty.
    pub fn visible_range(&self) -> Option<VisibleRange> {
        let len = self.buffer().len();
        if self.top >= len {
            return None;
        }
        let end = self.top.saturating_add(self.viewport_cells()).min(len);
        Some(VisibleRange::new(self.top, end - 1))
    }

    /// Largest `top` reachable by whole-row scrolling from the current one.
    fn max_top(&self) -> usize {
        let end = self.top.saturating_add(self.viewport_cells());
        let below = self.buffer().len().saturating_sub(end);
        self.top + below.div_ceil(self.columns()) * self.columns()
    }

    // ===== Scrolling =====

    /// Scroll by `rows` grid rows; negative scrolls towards lower values.
    ///
    /// Reports the movement to the session, so this may fetch or evict.
    pub fn scroll_rows(&mut self, rows: isize) {
        let step = rows.unsigned_abs().saturating_mul(self.columns());
        let new_top = if rows >= 0 {
            self.top.saturating_add(step).min(self.max_top())
        } else {
            self.top.saturating_sub(step)
        };
        if new_top == self.top {
            // Pinned at an edge: still report the push so the window can grow.
            self.notify_viewport(rows.signum());
            return;
        }

        self.top = new_top;
        self.keep_cursor_on_screen();
        self.notify_viewport(rows.signum());
    }

    /// Jump to the first row of the window.
    pub fn scroll_to_top(&mut self) {
        if self.top > 0 {
            self.top = 0;
            self.keep_cursor_on_screen();
            self.notify_viewport(-1);
        }
    }

    /// Move the cursor by `cells`, scrolling to keep it on screen.
    pub fn move_cursor(&mut self, cells: isize) {
        let Some(max) = self.buffer().len().checked_sub(1) else {
            return;
        };
        let target = self.cursor.saturating_add_signed(cells).min(max);
        if target == self.cursor {
            return;
        }
        self.cursor = target;

        let Some(visible) = self.visible_range() else {
            return;
        };
        let columns = self.columns();
        if target < visible.first() {
            let rows = (visible.first() - target).div_ceil(columns);
            self.scroll_rows(-(rows as isize));
        } else if target > visible.last() {
            let rows = (target - visible.last()).div_ceil(columns);
            self.scroll_rows(rows as isize);
        }
    }

    /// Put the cursor on `index` if it is on screen.
    pub fn set_cursor(&mut self, index: usize) {
        if self
            .visible_range()
            .is_some_and(|visible| (visible.first()..=visible.last()).contains(&index))
        {
            self.cursor = index;
        }
    }

    fn keep_cursor_on_screen(&mut self) {
        if let Some(visible) = self.visible_range() {
            self.cursor = self.cursor.clamp(visible.first(), visible.last());
        }
    }

    fn notify_viewport(&mut self, delta: isize) {
        let Some(visible) = self.visible_range() else {
            return;
        };
        let events = self.session.on_viewport_moved(visible, delta);
        self.apply_events(&events);
    }

    // ===== Window events =====

    /// Drain a delivered batch, if any. Returns whether anything changed.
    pub fn pump(&mut self) -> bool {
        let events = self.session.poll();
        self.apply_events(&events);
        !events.is_empty()
    }

    /// Wait up to `timeout` for a delivered batch. Returns whether anything changed.
    pub fn pump_timeout(&mut self, timeout: Duration) -> bool {
        let events = self.session.poll_timeout(timeout);
        self.apply_events(&events);
        !events.is_empty()
    }

    /// Shift `top` and `cursor` to follow head insertions and evictions.
    fn apply_events(&mut self, events: &[WindowEvent]) {
        for event in events {
            match *event {
                WindowEvent::BatchReady {
                    edge: Edge::Head,
                    count,
                    ..
                } => {
                    self.top = self.top.saturating_add(count);
                    self.cursor = self.cursor.saturating_add(count);
                }
                WindowEvent::Evicted {
                    edge: Edge::Head,
                    count,
                    ..
                } => {
                    self.top = self.top.saturating_sub(count);
                    self.cursor = self.cursor.saturating_sub(count);
                }
                WindowEvent::BatchReady { edge: Edge::Tail, .. }
                | WindowEvent::Evicted { edge: Edge::Tail, .. } => {}
            }
        }

        if let Some(max) = self.buffer().len().checked_sub(1) {
            self.top = self.top.min(max);
            self.cursor = self.cursor.min(max);
        }
        self.keep_cursor_on_screen();
    }

    // ===== Factors =====

    /// Open the factors popup for the cursor cell, or close it if open.
    pub fn toggle_factors(&mut self) {
        if self.selection.take().is_none() {
            self.selection = self.cursor_entry().map(FactorSelection::new);
        }
    }

    /// Close the factors popup.
    pub fn close_factors(&mut self) {
        self.selection = None;
    }

    // ===== Reconfiguration =====

    /// Rebuild the window with `config`. Scroll position and selection reset.
    pub fn reconfigure(&mut self, config: WindowConfig) {
        self.session.reconfigure(config);
        self.top = 0;
        self.cursor = 0;
        self.selection = None;
    }

    /// Change the column count by `delta`, clamped to the allowed range.
    pub fn change_columns(&mut self, delta: isize) {
        let mut config = self.session.config();
        let columns = clamp_offset(config.columns, delta, COLUMNS_RANGE.start(), COLUMNS_RANGE.end());
        if columns != config.columns {
            config.columns = columns;
            self.reconfigure(config);
        }
    }

    /// Change the prefetch rows by `delta`, clamped to the allowed range.
    pub fn change_buffer_rows(&mut self, delta: isize) {
        let mut config = self.session.config();
        let rows = clamp_offset(
            config.buffer_rows,
            delta,
            BUFFER_ROWS_RANGE.start(),
            BUFFER_ROWS_RANGE.end(),
        );
        if rows != config.buffer_rows {
            config.buffer_rows = rows;
            self.reconfigure(config);
        }
    }
}

fn clamp_offset(value: usize, delta: isize, min: &usize, max: &usize) -> usize {
    value.saturating_add_signed(delta).clamp(*min, *max)
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod tests;
