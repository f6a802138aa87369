//! numgrid
//!
//! TUI application for scrolling an endless grid of natural numbers, with
//! primality marks and proper factors computed on a background thread.
//!
//! This is the library root. The crate follows a Pure Core / Impure Shell
//! split: `model`, `source` and `state` never touch the terminal, `view`
//! owns it.

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;
