//! TUI rendering and terminal management (impure shell)

pub mod constants;
pub mod factors_popup;
mod help;
pub mod layout;
pub mod styles;

pub use factors_popup::format_factors;
pub use help::render_help_overlay;
pub use styles::{CellStyles, ColorConfig};

use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::{AppError, KeyAction};
use crate::state::{handle_grid_action, AppState};
use constants::TICK_INTERVAL_MS;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    app_state: AppState,
    key_bindings: KeyBindings,
    styles: CellStyles,
    /// Last rendered grid area (for mouse hit testing)
    last_grid_area: Option<Rect>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen and starts the
    /// initial load of the window.
    pub fn new(config: &ResolvedConfig) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let app_state = AppState::new(config.window_config());
        let colors = ColorConfig::from_env_and_args(config.no_color);
        Ok(Self::with_terminal(terminal, app_state, colors))
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Assemble an app around an existing terminal.
    pub fn with_terminal(terminal: Terminal<B>, app_state: AppState, colors: ColorConfig) -> Self {
        Self {
            terminal,
            app_state,
            key_bindings: KeyBindings::default(),
            styles: CellStyles::with_color_config(colors),
            last_grid_area: None,
        }
    }

    /// Current application state.
    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }

    /// The terminal, for buffer inspection.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Between input events the loop
    /// wakes every tick to drain delivered batches and redraws only when
    /// the window changed.
    pub fn run(&mut self) -> Result<(), TuiError> {
        let tick = Duration::from_millis(TICK_INTERVAL_MS);

        self.draw()?;

        loop {
            if event::poll(tick)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            info!("Quit requested");
                            return Ok(());
                        }
                        self.draw()?;
                    }
                    Event::Mouse(mouse) => {
                        self.handle_mouse(mouse);
                        self.draw()?;
                    }
                    Event::Resize(width, height) => {
                        debug!("Handling resize to {}x{}", width, height);
                        self.draw()?;
                    }
                    _ => {}
                }
            }

            if self.app_state.pump() {
                self.draw()?;
            }
        }
    }

    /// Handle a key press. Returns true if the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };

        // The help overlay is modal: only closing it or quitting gets through.
        if self.app_state.help_visible
            && !matches!(
                action,
                KeyAction::Help | KeyAction::Quit | KeyAction::CloseFactors
            )
        {
            return false;
        }

        if action == KeyAction::Quit {
            return true;
        }
        handle_grid_action(&mut self.app_state, action);
        false
    }

    /// Handle a mouse event.
    ///
    /// The wheel scrolls one row. A left click moves the cursor to the cell
    /// and toggles its factors popup.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.app_state.help_visible {
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => self.app_state.scroll_rows(1),
            MouseEventKind::ScrollUp => self.app_state.scroll_rows(-1),
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(grid) = self.last_grid_area else {
                    return;
                };
                let Some(index) = layout::cell_at(grid, &self.app_state, mouse.column, mouse.row)
                else {
                    return;
                };
                let reselect = self.app_state.cursor() != index;
                self.app_state.set_cursor(index);
                if reselect {
                    self.app_state.close_factors();
                }
                self.app_state.toggle_factors();
            }
            _ => {}
        }
    }

    /// Render the current frame
    ///
    /// Sizes the viewport from the terminal first, so the state always knows
    /// how many rows are on screen.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let frame_area = Rect::new(0, 0, size.width.max(1), size.height);
        self.app_state.set_viewport_rows(layout::grid_rows(frame_area));
        self.last_grid_area = Some(layout::calculate_areas(frame_area).grid);

        let state = &self.app_state;
        let styles = &self.styles;
        self.terminal.draw(|frame| {
            layout::render_layout(frame, state, styles);
        })?;

        Ok(())
    }
}

/// Initialize and run the TUI application with a resolved configuration.
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// even when the loop fails. Logging must be initialized by the caller.
pub fn run_with_config(config: &ResolvedConfig) -> Result<(), TuiError> {
    let mut app = TuiApp::new(config)?;

    let result = app.run();

    // Joins any in-flight generator job.
    drop(app);
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
