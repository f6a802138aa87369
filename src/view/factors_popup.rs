//! Factors popup for the selected number.

use super::constants::{FACTORS_POPUP_HEIGHT, FACTORS_POPUP_WIDTH_PERCENT};
use super::help::percent_of;
use super::styles::{MUTED_TEXT, SECTION_HEADER};
use crate::state::FactorSelection;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Popup text for a selection.
///
/// - 0: every natural number divides it
/// - primes: no proper factors
/// - 1: no factors
/// - otherwise: the factors in ascending order, comma separated
pub fn format_factors(selection: &FactorSelection) -> String {
    if selection.value() == 0 {
        return "Every natural number divides 0".to_string();
    }
    if selection.is_prime() {
        return "Prime: no factors".to_string();
    }
    if selection.factors().is_empty() {
        return "No factors".to_string();
    }
    selection
        .factors()
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Bottom-centered popup area inside `area`.
fn popup_area(area: Rect) -> Rect {
    let width = percent_of(area.width, FACTORS_POPUP_WIDTH_PERCENT)
        .max(20)
        .min(area.width);
    let height = FACTORS_POPUP_HEIGHT.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + area.height - height,
        width,
        height,
    }
}

/// Render the factors popup near the bottom of `area`.
pub fn render_factors_popup(frame: &mut Frame, area: Rect, selection: &FactorSelection) {
    let popup = popup_area(area);

    frame.render_widget(Clear, popup);

    let title = format!(" Factors of {} ", selection.value());
    let hint = if selection.is_highlighting() {
        "related cells highlighted"
    } else {
        "no highlights"
    };
    let lines = vec![
        Line::from(format_factors(selection)),
        Line::from(Span::styled(hint, MUTED_TEXT)),
    ];
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(Span::styled(title, SECTION_HEADER))
                .borders(Borders::ALL),
        )
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, popup);
}
