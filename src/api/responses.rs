//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    effects::AudioStatus,
    state::{Remaining, RevealPhase, RevealState, Transition, SECRET_NOTE},
};

/// What the page renders; fields outside the current phase are left empty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub phase: RevealPhase,
    pub recipient: String,
    pub target: DateTime<Utc>,
    pub remaining: Option<Remaining>,
    pub message_index: Option<usize>,
    pub message: Option<String>,
    pub muted: bool,
    pub secret_note: Option<String>,
    pub love_count: u64,
    pub audio: AudioStatus,
}

impl StateSnapshot {
    pub fn new(reveal: &RevealState, recipient: &str, target: DateTime<Utc>, audio: AudioStatus) -> Self {
        let opened = reveal.phase() == RevealPhase::Opened;
        Self {
            phase: reveal.phase(),
            recipient: recipient.to_string(),
            target,
            remaining: reveal.remaining(),
            message_index: opened.then(|| reveal.message_index()),
            message: opened.then(|| reveal.message().to_string()),
            muted: reveal.is_muted(),
            secret_note: (opened && reveal.is_secret_visible()).then(|| SECRET_NOTE.to_string()),
            love_count: reveal.love_count(),
            audio,
        }
    }
}

/// API response structure for user actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub status: Transition,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub state: StateSnapshot,
}

impl ActionResponse {
    /// Create a new action response
    pub fn new(status: Transition, message: String, state: StateSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            state,
        }
    }
}

/// Full status response with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub state: StateSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
