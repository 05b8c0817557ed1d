//! Side effects of the reveal: particle bursts and the background track
//!
//! Neither is part of the state record; both are driven from `AppState`
//! and the background tasks.

pub mod audio;
pub mod particles;

// Re-export main types
pub use audio::{AudioError, AudioKind, AudioOutput, AudioStatus};
pub use particles::{BurstQueue, Origin, ParticleBurst};
