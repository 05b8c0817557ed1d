//! Utility functions module
//!
//! This module contains utility functions used throughout the application.

pub mod signals;

// Re-export main functions
pub use signals::{register_shutdown_signals, shutdown_signal};
