//! Background tasks module
//!
//! This module contains the timers that run alongside the HTTP server. Each
//! one is tied to a phase of the reveal and to the shutdown flag.

pub mod celebration;
pub mod countdown;
pub mod message_rotation;

use tokio::sync::watch;

use crate::state::RevealPhase;

// Re-export main functions
pub use celebration::{celebration_task, CELEBRATION_WINDOW, FRAME_PERIOD};
pub use countdown::{countdown_task, TICK_PERIOD};
pub use message_rotation::{message_rotation_task, ROTATION_PERIOD};

/// Resolve once the phase has reached `phase`; false if the state is gone
async fn phase_reached(rx: &mut watch::Receiver<RevealPhase>, phase: RevealPhase) -> bool {
    loop {
        let current = *rx.borrow_and_update();
        if current >= phase {
            return true;
        }
        if rx.changed().await.is_err() {
            return false;
        }
    }
}

/// Resolve once teardown has been requested
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    loop {
        let requested = *rx.borrow_and_update();
        if requested || rx.changed().await.is_err() {
            return;
        }
    }
}
