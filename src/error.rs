//! Error types

use thiserror::Error;

/// Errors surfaced by the application state
#[derive(Error, Debug)]
pub enum AppError {
    /// A state lock was poisoned by a panicking holder
    #[error("Failed to lock {0}")]
    Poisoned(&'static str),
}

pub type Result<T> = std::result::Result<T, AppError>;
