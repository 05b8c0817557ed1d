//! Signal handling for graceful shutdown

use std::io;

use futures::stream::StreamExt;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tracing::info;

/// Register the signals that end the reveal (SIGTERM, SIGINT, SIGHUP)
pub fn register_shutdown_signals() -> io::Result<Signals> {
    Signals::new([SIGTERM, SIGINT, SIGHUP])
}

/// Wait for the first registered signal
pub async fn shutdown_signal(mut signals: Signals) {
    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
    signals.handle().close();
}
