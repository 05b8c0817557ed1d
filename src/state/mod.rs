//! State management module
//!
//! This module contains the countdown, the reveal record and the shared
//! application state that wraps them.

pub mod app_state;
pub mod countdown;
pub mod reveal;

// Re-export main types
pub use app_state::AppState;
pub use countdown::{Countdown, Remaining, TickOutcome};
pub use reveal::{RevealPhase, RevealState, Transition, SECRET_NOTE, TRIBUTES};
