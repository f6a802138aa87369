//! Window state and UI state.
//!
//! The buffer, policy and visible-range types are pure and testable without
//! a terminal; [`WindowSession`] adds the background generator, and
//! [`AppState`] adds scroll anchoring and selection on top.

pub mod app_state;
pub mod grid_handler;
pub mod viewport_policy;
pub mod visible_range;
pub mod window_buffer;
pub mod window_session;

// Re-export for convenience
pub use app_state::{AppState, FactorSelection};
pub use grid_handler::handle_grid_action;
pub use viewport_policy::{Command, PolicyState, Thresholds, Transition, ViewportEvent};
pub use visible_range::VisibleRange;
pub use window_buffer::{BufferEdges, Edge, WindowBuffer};
pub use window_session::{WindowConfig, WindowEvent, WindowSession, MAX_REEVALUATIONS};
