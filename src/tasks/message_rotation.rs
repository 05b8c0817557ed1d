//! Tribute rotation background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info};

use super::{phase_reached, shutdown_requested};
use crate::state::{AppState, RevealPhase};

pub const ROTATION_PERIOD: Duration = Duration::from_millis(4500);

/// Wait for the gift to open, then move to the next tribute every 4.5 seconds
pub async fn message_rotation_task(state: Arc<AppState>) {
    let mut phase_rx = state.subscribe_phase();
    let mut shutdown_rx = state.subscribe_shutdown();

    tokio::select! {
        opened = phase_reached(&mut phase_rx, RevealPhase::Opened) => {
            if !opened {
                return;
            }
        }
        _ = shutdown_requested(&mut shutdown_rx) => return,
    }

    info!("Starting message rotation");
    let mut rotation = interval_at(Instant::now() + ROTATION_PERIOD, ROTATION_PERIOD);

    loop {
        tokio::select! {
            _ = rotation.tick() => {
                match state.advance_message() {
                    Ok((_, reveal)) => debug!("Showing tribute {}", reveal.message_index()),
                    Err(e) => {
                        error!("Failed to rotate message: {}", e);
                        break;
                    }
                }
            }

            _ = shutdown_requested(&mut shutdown_rx) => {
                info!("Message rotation stopped by shutdown");
                break;
            }
        }
    }
}
