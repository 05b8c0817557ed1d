//! Gift Reveal - A countdown that turns into a gift reveal greeting card
//!
//! This is the main entry point for the gift-reveal application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use gift_reveal::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::{celebration_task, countdown_task, message_rotation_task},
    utils::{register_shutdown_signals, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("gift_reveal={},tower_http=info", config.log_level()))
        .init();

    info!("Starting gift-reveal server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, target={}, recipient={}",
          config.host, config.port, config.target, config.recipient);

    let signals = register_shutdown_signals()?;

    // Create application state
    let state = Arc::new(AppState::new(&config));

    // Start the background tasks; rotation and celebration wait for the gift to open
    tokio::spawn(countdown_task(Arc::clone(&state)));
    tokio::spawn(message_rotation_task(Arc::clone(&state)));
    tokio::spawn(celebration_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /          - Display page");
    info!("  GET  /state     - Current reveal state");
    info!("  POST /open      - Open the gift");
    info!("  POST /mute      - Toggle mute");
    info!("  POST /secret    - Reveal the secret note");
    info!("  POST /love      - Send love");
    info!("  GET  /bursts    - Drain particle bursts");
    info!("  GET  /health    - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal(signals) => {
            info!("Shutdown signal received");
        }
    }

    state.teardown().await;
    info!("Server shutdown complete");
    Ok(())
}
