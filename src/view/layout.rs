//! Screen layout: header, number grid, status bar and overlays.
//!
//! Pure rendering from `AppState`; nothing here mutates state.

use super::constants::{HEADER_HEIGHT, MIN_CELL_WIDTH, STATUS_BAR_HEIGHT};
use super::factors_popup::render_factors_popup;
use super::help::render_help_overlay;
use super::styles::{CellState, CellStyles, HEADER, STATUS_BAR};
use crate::state::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    /// Title line.
    pub header: Rect,
    /// Number grid.
    pub grid: Rect,
    /// Status line.
    pub status: Rect,
}

/// Split the frame into header, grid and status bar.
pub fn calculate_areas(frame_area: Rect) -> ScreenAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(frame_area);

    ScreenAreas {
        header: chunks[0],
        grid: chunks[1],
        status: chunks[2],
    }
}

/// Grid rows that fit in a frame of this size.
pub fn grid_rows(frame_area: Rect) -> usize {
    usize::from(calculate_areas(frame_area).grid.height)
}

/// Render the whole screen.
pub fn render_layout(frame: &mut Frame, state: &AppState, styles: &CellStyles) {
    let areas = calculate_areas(frame.area());

    render_header(frame, areas.header, state);
    render_grid(frame, areas.grid, state, styles);
    render_status_bar(frame, areas.status, state);

    if let Some(selection) = state.selection() {
        render_factors_popup(frame, areas.grid, selection);
    }
    if state.help_visible {
        render_help_overlay(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = match state.cursor_entry() {
        Some(entry) if entry.is_prime() => format!("numgrid | {} is prime", entry.value()),
        Some(entry) => format!("numgrid | {}", entry.value()),
        None => "numgrid".to_string(),
    };
    frame.render_widget(Paragraph::new(Line::from(text)).style(HEADER), area);
}

/// Width of one cell: the widest value on screen plus a separating space.
fn cell_width(area: Rect, state: &AppState) -> u16 {
    let widest = state
        .visible_range()
        .and_then(|visible| state.buffer().get(visible.last()))
        .map(|entry| entry.value().to_string().len())
        .unwrap_or(1);
    let wanted = u16::try_from(widest + 1).unwrap_or(u16::MAX).max(MIN_CELL_WIDTH);
    let columns = u16::try_from(state.columns()).unwrap_or(u16::MAX).max(1);
    wanted.min((area.width / columns).max(1))
}

/// Window index of the grid cell drawn at terminal position (`x`, `y`).
pub fn cell_at(grid: Rect, state: &AppState, x: u16, y: u16) -> Option<usize> {
    if !grid.contains(Position { x, y }) {
        return None;
    }
    let visible = state.visible_range()?;
    let column = usize::from((x - grid.x) / cell_width(grid, state));
    if column >= state.columns() {
        return None;
    }
    let index = visible.first() + usize::from(y - grid.y) * state.columns() + column;
    (index <= visible.last()).then_some(index)
}

fn render_grid(frame: &mut Frame, area: Rect, state: &AppState, styles: &CellStyles) {
    let Some(visible) = state.visible_range() else {
        let loading = Paragraph::new(Line::from("Loading..."));
        frame.render_widget(loading, area);
        return;
    };

    let width = usize::from(cell_width(area, state));
    let columns = state.columns();
    let selection = state.selection();

    let lines: Vec<Line> = (visible.first()..=visible.last())
        .collect::<Vec<_>>()
        .chunks(columns)
        .map(|row| {
            let spans = row.iter().filter_map(|&index| {
                let entry = state.buffer().get(index)?;
                let cell = CellState {
                    cursor: index == state.cursor(),
                    selected: selection.is_some_and(|s| s.value() == entry.value()),
                    highlighted: selection.is_some_and(|s| s.highlights(entry)),
                };
                let text = format!("{:>w$}", entry.value(), w = width.saturating_sub(1));
                Some([Span::styled(text, styles.for_cell(entry, cell)), Span::raw(" ")])
            });
            Line::from(spans.flatten().collect::<Vec<_>>())
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Status line: window range, size, policy state and geometry.
pub fn status_text(state: &AppState) -> String {
    let session = state.session();
    let config = session.config();
    let range = match session.buffer().edges() {
        Some(edges) => format!("{}..={}", edges.first, edges.last),
        None => "empty".to_string(),
    };
    format!(
        " {} | {} entries | {} | {} cols, {} buffer rows | ?: help  q: quit",
        range,
        session.buffer().len(),
        session.policy().label(),
        config.columns,
        config.buffer_rows,
    )
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let paragraph = Paragraph::new(Line::from(status_text(state))).style(STATUS_BAR);
    frame.render_widget(paragraph, area);
}

// ===== Tests =====

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
