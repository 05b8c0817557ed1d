//! HTTP endpoint handlers

use std::{path::Path, sync::Arc};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use tracing::{debug, error, info, warn};

use crate::{
    effects::ParticleBurst,
    error::Result as AppResult,
    state::{AppState, RevealState, Transition},
};
use super::responses::{ActionResponse, HealthResponse, StateSnapshot, StatusResponse};

const PAGE: &str = include_str!("page.html");
const PLACEHOLDER_SLOT: &str = "__PLACEHOLDER_SVG__";

/// Shown when the portrait cannot be loaded
pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 144 144"><rect width="144" height="144" fill="#ffe4e6"/><path d="M72 112 30 70a22 22 0 0 1 42-26 22 22 0 0 1 42 26z" fill="#fb7185"/></svg>"##;

fn snapshot(state: &AppState, reveal: &RevealState) -> AppResult<StateSnapshot> {
    Ok(StateSnapshot::new(reveal, &state.recipient, state.target()?, state.audio.status()))
}

/// Build the response for a transition, applied or not
fn action_response(
    state: &AppState,
    result: AppResult<(Transition, RevealState)>,
    applied: &str,
    ignored: &str,
) -> Result<Json<ActionResponse>, StatusCode> {
    let (outcome, reveal) = result.map_err(|e| {
        error!("Failed to apply {}: {}", applied, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let message = if outcome.is_applied() { applied } else { ignored };
    let state_snapshot = snapshot(state, &reveal).map_err(|e| {
        error!("Failed to build state snapshot: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ActionResponse::new(outcome, message.to_string(), state_snapshot)))
}

/// Handle GET / - The display page, with the placeholder inlined for images
/// the browser cannot decode
pub async fn page_handler() -> Html<String> {
    Html(PAGE.replace(PLACEHOLDER_SLOT, PLACEHOLDER_SVG))
}

/// Handle POST /open - Open the gift
pub async fn open_handler(State(state): State<Arc<AppState>>) -> Result<Json<ActionResponse>, StatusCode> {
    let result = state.open_gift().await;
    action_response(&state, result, "Gift opened", "Gift is not ready to open")
}

/// Handle POST /mute - Toggle the track's mute flag
pub async fn mute_handler(State(state): State<Arc<AppState>>) -> Result<Json<ActionResponse>, StatusCode> {
    let result = state.toggle_mute().await;
    action_response(&state, result, "Mute toggled", "Nothing to mute yet")
}

/// Handle POST /secret - Reveal the secret note
pub async fn secret_handler(State(state): State<Arc<AppState>>) -> Result<Json<ActionResponse>, StatusCode> {
    let result = state.reveal_secret();
    if matches!(result, Ok((Transition::Applied, _))) {
        info!("Secret note revealed");
    }
    action_response(&state, result, "Secret note revealed", "Secret note unavailable")
}

/// Handle POST /love - Send love
pub async fn love_handler(State(state): State<Arc<AppState>>) -> Result<Json<ActionResponse>, StatusCode> {
    let result = state.send_love();
    action_response(&state, result, "Love sent", "Open the gift first")
}

/// Handle GET /state - Return the current reveal state
pub async fn state_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let reveal = match state.get_reveal_state() {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to get reveal state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let state_snapshot = match snapshot(&state, &reveal) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to build state snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        state: state_snapshot,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /bursts - Hand pending particle bursts to the page
pub async fn bursts_handler(State(state): State<Arc<AppState>>) -> Json<Vec<ParticleBurst>> {
    let bursts = state.particles.drain();
    if !bursts.is_empty() {
        debug!("Handing {} bursts to the page", bursts.len());
    }
    Json(bursts)
}

/// Handle GET /portrait - The portrait, or the placeholder if it cannot be read
pub async fn portrait_handler(State(state): State<Arc<AppState>>) -> Response {
    match tokio::fs::read(&state.portrait).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&state.portrait))], bytes).into_response(),
        Err(e) => {
            warn!("Portrait {} unavailable, serving placeholder: {}", state.portrait.display(), e);
            ([(header::CONTENT_TYPE, "image/svg+xml")], PLACEHOLDER_SVG).into_response()
        }
    }
}

/// Handle GET /track - The background track
pub async fn track_handler(State(state): State<Arc<AppState>>) -> Response {
    let track = state.audio.track();
    match tokio::fs::read(track).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(track))], bytes).into_response(),
        Err(e) => {
            warn!("Track {} unavailable: {}", track.display(), e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp3") | Some("mpeg") => "audio/mpeg",
        Some("ogg") => "audio/ogg",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}
