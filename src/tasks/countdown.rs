//! Countdown background task

use std::{sync::Arc, time::Duration};
use chrono::Utc;
use tokio::time::interval;
use tracing::{debug, error, info};

use super::shutdown_requested;
use crate::state::{AppState, TickOutcome};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Tick the countdown immediately and then every second until the target passes
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task");

    let mut shutdown_rx = state.subscribe_shutdown();
    let mut ticker = interval(TICK_PERIOD);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match state.tick(Utc::now()) {
                    Ok(TickOutcome::Remaining(remaining)) => {
                        debug!("Remaining: {}d {}h {}m {}s",
                               remaining.days, remaining.hours, remaining.minutes, remaining.seconds);
                    }
                    Ok(TickOutcome::Crossed) | Ok(TickOutcome::Idle) => {
                        info!("Countdown finished, stopping ticks");
                        break;
                    }
                    Err(e) => {
                        error!("Countdown tick failed: {}", e);
                        break;
                    }
                }
            }

            _ = shutdown_requested(&mut shutdown_rx) => {
                info!("Countdown task stopped by shutdown");
                break;
            }
        }
    }
}
