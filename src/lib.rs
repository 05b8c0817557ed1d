//! Gift Reveal - A countdown that turns into a gift reveal greeting card
//!
//! This library holds the countdown, the reveal state machine and its
//! effects, and the HTTP surface the display page talks to.

pub mod api;
pub mod config;
pub mod effects;
pub mod error;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
