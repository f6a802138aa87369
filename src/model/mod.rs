//! Domain model: numbers, their computed properties, and user intents.

pub mod entry;
pub mod error;
pub mod key_action;
pub mod number_theory;

pub use entry::Entry;
pub use error::AppError;
pub use key_action::KeyAction;
pub use number_theory::{factorize, has_common_factor, is_prime, shares_factor_with};
