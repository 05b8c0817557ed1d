//! Celebration burst played once when the gift opens

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, Instant};
use tracing::info;

use super::{phase_reached, shutdown_requested};
use crate::{
    effects::ParticleBurst,
    state::{AppState, RevealPhase},
};

pub const CELEBRATION_WINDOW: Duration = Duration::from_secs(6);
pub const FRAME_PERIOD: Duration = Duration::from_millis(50);

/// Emit paired edge bursts every frame for six seconds after the gift opens.
///
/// Once started the burst runs to the end of its window.
pub async fn celebration_task(state: Arc<AppState>) {
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

    info!("Starting celebration burst");
    let end = Instant::now() + CELEBRATION_WINDOW;
    let mut frames = interval(FRAME_PERIOD);
    let mut emitted = 0usize;

    loop {
        frames.tick().await;
        for burst in ParticleBurst::celebration_pair() {
            state.particles.emit(burst);
            emitted += 1;
        }
        if Instant::now() >= end {
            break;
        }
    }

    info!("Celebration burst finished after {} emissions", emitted);
}
