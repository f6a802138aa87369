//! Help overlay widget displaying keyboard shortcuts.
//!
//! Shows a centered modal overlay with all keyboard shortcuts grouped by category.
//! Triggered by '?' key, dismissed by 'Esc' or '?'.

use super::constants::{HELP_POPUP_HEIGHT_PERCENT, HELP_POPUP_WIDTH_PERCENT};
use super::styles::{MUTED_TEXT, SECTION_HEADER};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Shortcut table: category, then (keys, description) rows.
const SHORTCUTS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j/↓", "Scroll down one row"),
            ("k/↑", "Scroll up one row"),
            ("h/←", "Cursor left"),
            ("l/→", "Cursor right"),
            ("Ctrl+d/PgDn", "Page down"),
            ("Ctrl+u/PgUp", "Page up"),
            ("g/Home", "First row of the window"),
        ],
    ),
    (
        "Factors",
        &[
            ("Enter/Space", "Show factors of the cursor cell"),
            ("Esc", "Close popup"),
        ],
    ),
    (
        "Window",
        &[
            ("+ / -", "Add / remove a column"),
            ("> / <", "Grow / shrink prefetch by 10 rows"),
        ],
    ),
    ("Application", &[("?", "Toggle this help"), ("q/Ctrl+c", "Quit")]),
];

/// Render the help overlay centered on the screen.
pub fn render_help_overlay(frame: &mut Frame) {
    let area = frame.area();
    let popup_area = centered_rect(HELP_POPUP_WIDTH_PERCENT, HELP_POPUP_HEIGHT_PERCENT, area);

    // Clear the background for the overlay
    frame.render_widget(Clear, popup_area);

    let help_paragraph = Paragraph::new(build_help_content())
        .block(
            Block::default()
                .title(" Keyboard Shortcuts ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);

    // Dismissal hint on the bottom border
    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(1),
        width: popup_area.width,
        height: 1,
    };

    let hint = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc or ? to close ",
        MUTED_TEXT.add_modifier(Modifier::DIM),
    )]))
    .alignment(Alignment::Center);

    frame.render_widget(hint, hint_area);
}

/// Calculate a rect centered in `area` with the given percentage of its size.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_width = percent_of(area.width, percent_x);
    let popup_height = percent_of(area.height, percent_y);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    Rect {
        x: area.x + popup_x,
        y: area.y + popup_y,
        width: popup_width,
        height: popup_height,
    }
}

/// `percent`% of `len`, computed wide so large terminals do not overflow.
pub(super) fn percent_of(len: u16, percent: u16) -> u16 {
    let scaled = u32::from(len) * u32::from(percent) / 100;
    u16::try_from(scaled).unwrap_or(u16::MAX)
}

/// Build the help content lines grouped by category.
fn build_help_content() -> Vec<Line<'static>> {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::White);

    let mut lines = Vec::new();
    for (index, (category, rows)) in SHORTCUTS.iter().enumerate() {
        if index > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(*category, SECTION_HEADER)));
        for (keys, description) in rows.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<14}", keys), key_style),
                Span::styled(*description, desc_style),
            ]));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered_text(width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render_help_overlay(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn help_content_lists_every_category() {
        let text: String = build_help_content()
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        for (category, _) in SHORTCUTS {
            assert!(text.contains(category), "missing category {category}");
        }
        assert!(text.contains("Show factors of the cursor cell"));
    }

    #[test]
    fn overlay_renders_title_and_hint() {
        let text = rendered_text(100, 40);
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("Press Esc or ? to close"));
        assert!(text.contains("Quit"));
    }

    #[test]
    fn centered_rect_is_centered() {
        let rect = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(rect, Rect::new(25, 10, 50, 20));
    }

    #[test]
    fn centered_rect_fits_very_wide_terminal() {
        let rect = centered_rect(70, 80, Rect::new(0, 0, 2000, 1000));
        assert_eq!(rect, Rect::new(300, 100, 1400, 800));
    }

    #[test]
    fn percent_of_full_width_is_exact() {
        assert_eq!(percent_of(u16::MAX, 100), u16::MAX);
        assert_eq!(percent_of(u16::MAX, 50), u16::MAX / 2);
    }
}
