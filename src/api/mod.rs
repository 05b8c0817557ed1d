//! HTTP API module
//!
//! This module contains the display page, the action endpoints and their
//! response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/state", get(state_handler))
        .route("/open", post(open_handler))
        .route("/mute", post(mute_handler))
        .route("/secret", post(secret_handler))
        .route("/love", post(love_handler))
        .route("/bursts", get(bursts_handler))
        .route("/portrait", get(portrait_handler))
        .route("/track", get(track_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
