//! Main application state management

use std::{
    path::PathBuf,
    sync::Mutex,
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Countdown, RevealPhase, RevealState, TickOutcome, Transition};
use crate::{
    config::Config,
    effects::{AudioOutput, BurstQueue, ParticleBurst},
    error::{AppError, Result},
};

/// Owns the reveal record, the countdown and the effect outputs
#[derive(Debug)]
pub struct AppState {
    /// The single reveal record; every change goes through `apply`
    reveal: Mutex<RevealState>,
    countdown: Mutex<Countdown>,
    /// Card content
    pub recipient: String,
    pub portrait: PathBuf,
    /// Effect outputs
    pub audio: AudioOutput,
    pub particles: BurstQueue,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Phase change notifications for the background tasks
    phase_tx: watch::Sender<RevealPhase>,
    /// Flipped to true once on teardown
    shutdown_tx: watch::Sender<bool>,
}

impl AppState {
    /// Create a new AppState waiting for the configured target
    pub fn new(config: &Config) -> Self {
        let audio = match config.player_command() {
            Some((program, args)) => AudioOutput::command(program, args, &config.audio),
            None => AudioOutput::page(&config.audio),
        };
        let (phase_tx, _) = watch::channel(RevealPhase::Waiting);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            reveal: Mutex::new(RevealState::new()),
            countdown: Mutex::new(Countdown::new(config.target)),
            recipient: config.recipient.clone(),
            portrait: config.portrait.clone(),
            audio,
            particles: BurstQueue::new(),
            start_time: Instant::now(),
            port: config.port,
            host: config.host.clone(),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            phase_tx,
            shutdown_tx,
        }
    }

    /// Run a named transition against the reveal record.
    ///
    /// Applied transitions are recorded as the last action and publish the
    /// (possibly unchanged) phase to watchers.
    fn apply<F>(&self, action: &str, transition: F) -> Result<(Transition, RevealState)>
    where
        F: FnOnce(&mut RevealState) -> Transition,
    {
        let mut reveal = self.reveal.lock().map_err(|_| AppError::Poisoned("reveal state"))?;
        let outcome = transition(&mut *reveal);
        let snapshot = reveal.clone();
        drop(reveal);

        if !outcome.is_applied() {
            debug!("Transition '{}' ignored in phase {}", action, snapshot.phase().as_str());
            return Ok((outcome, snapshot));
        }

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.phase_tx.send_if_modified(|phase| {
            let changed = *phase != snapshot.phase();
            *phase = snapshot.phase();
            changed
        });

        Ok((outcome, snapshot))
    }

    /// Advance the countdown to `now`, closing the gift once the target passes
    pub fn tick(&self, now: DateTime<Utc>) -> Result<TickOutcome> {
        let outcome = self
            .countdown
            .lock()
            .map_err(|_| AppError::Poisoned("countdown"))?
            .tick(now);

        match outcome {
            TickOutcome::Remaining(remaining) => {
                // Per-second refresh, not tracked as an action
                self.reveal
                    .lock()
                    .map_err(|_| AppError::Poisoned("reveal state"))?
                    .update_remaining(remaining);
            }
            TickOutcome::Crossed => {
                info!("Target instant reached, gift is ready");
                self.apply("boundary", RevealState::cross_boundary)?;
            }
            TickOutcome::Idle => {}
        }

        Ok(outcome)
    }

    /// Open the gift and try to start the track
    pub async fn open_gift(&self) -> Result<(Transition, RevealState)> {
        let (outcome, snapshot) = self.apply("open", RevealState::open_gift)?;
        if outcome.is_applied() {
            info!("Gift opened");
            self.start_audio().await;
        }
        Ok((outcome, snapshot))
    }

    /// Start playback; failure is logged and dropped
    pub async fn start_audio(&self) {
        if let Err(e) = self.audio.play().await {
            warn!("Audio playback not started: {}", e);
        }
    }

    pub async fn toggle_mute(&self) -> Result<(Transition, RevealState)> {
        let (outcome, snapshot) = self.apply("mute", RevealState::toggle_mute)?;
        if outcome.is_applied() {
            info!("Mute set to: {}", snapshot.is_muted());
            if let Err(e) = self.audio.set_muted(snapshot.is_muted()).await {
                warn!("Audio output did not follow mute toggle: {}", e);
            }
        }
        Ok((outcome, snapshot))
    }

    pub fn reveal_secret(&self) -> Result<(Transition, RevealState)> {
        self.apply("secret", RevealState::reveal_secret)
    }

    /// Count one more heart and throw a burst for it
    pub fn send_love(&self) -> Result<(Transition, RevealState)> {
        let (outcome, snapshot) = self.apply("love", RevealState::send_love)?;
        if outcome.is_applied() {
            debug!("Love count: {}", snapshot.love_count());
            self.particles.emit(ParticleBurst::love_with_random_angle());
        }
        Ok((outcome, snapshot))
    }

    pub fn advance_message(&self) -> Result<(Transition, RevealState)> {
        self.apply("rotate", RevealState::advance_message)
    }

    /// Get current reveal state
    pub fn get_reveal_state(&self) -> Result<RevealState> {
        self.reveal
            .lock()
            .map(|state| state.clone())
            .map_err(|_| AppError::Poisoned("reveal state"))
    }

    pub fn target(&self) -> Result<DateTime<Utc>> {
        self.countdown
            .lock()
            .map(|countdown| countdown.target())
            .map_err(|_| AppError::Poisoned("countdown"))
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<RevealPhase> {
        self.phase_tx.subscribe()
    }

    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Stop periodic work and the track
    pub async fn teardown(&self) {
        info!("Tearing down reveal state");
        self.shutdown_tx.send_replace(true);
        self.audio.stop().await;
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use clap::Parser;

    fn state_with_target(target: DateTime<Utc>) -> AppState {
        let target = target.to_rfc3339();
        let track = std::env::temp_dir()
            .join("gift-reveal-no-such-track.mpeg")
            .display()
            .to_string();
        let config = Config::try_parse_from([
            "gift-reveal",
            "--target",
            target.as_str(),
            "--audio",
            track.as_str(),
        ])
        .unwrap();
        AppState::new(&config)
    }

    #[test]
    fn tick_before_target_keeps_waiting() {
        let target = Utc::now() + Duration::hours(1);
        let state = state_with_target(target);

        let outcome = state.tick(target - Duration::minutes(30)).unwrap();
        assert!(matches!(outcome, TickOutcome::Remaining(_)));

        let reveal = state.get_reveal_state().unwrap();
        assert_eq!(reveal.phase(), RevealPhase::Waiting);
        assert_eq!(reveal.remaining().unwrap().minutes, 30);
    }

    #[test]
    fn crossing_closes_the_gift_once() {
        let target = Utc::now();
        let state = state_with_target(target);
        let phase_rx = state.subscribe_phase();

        assert_eq!(state.tick(target + Duration::seconds(1)).unwrap(), TickOutcome::Crossed);
        assert_eq!(state.tick(target + Duration::seconds(2)).unwrap(), TickOutcome::Idle);
        assert_eq!(*phase_rx.borrow(), RevealPhase::Closed);
        assert_eq!(state.get_last_action().0.as_deref(), Some("boundary"));
    }

    #[tokio::test]
    async fn open_tolerates_missing_track() {
        let target = Utc::now();
        let state = state_with_target(target);
        state.tick(target).unwrap();

        let (outcome, reveal) = state.open_gift().await.unwrap();
        assert!(outcome.is_applied());
        assert_eq!(reveal.phase(), RevealPhase::Opened);
        assert!(!state.audio.status().playing);
    }

    #[tokio::test]
    async fn love_emits_one_burst_per_action() {
        let target = Utc::now();
        let state = state_with_target(target);
        state.tick(target).unwrap();

        state.send_love().unwrap();
        assert!(state.particles.is_empty());

        state.open_gift().await.unwrap();
        for _ in 0..7 {
            state.send_love().unwrap();
        }
        assert_eq!(state.get_reveal_state().unwrap().love_count(), 7);
        assert_eq!(state.particles.drain().len(), 7);
    }

    #[tokio::test]
    async fn mute_reaches_the_audio_output() {
        let target = Utc::now();
        let state = state_with_target(target);
        state.tick(target).unwrap();
        state.open_gift().await.unwrap();

        state.toggle_mute().await.unwrap();
        assert!(state.audio.status().muted);
        state.toggle_mute().await.unwrap();
        assert!(!state.audio.status().muted);
    }

    #[tokio::test]
    async fn teardown_signals_watchers() {
        let state = state_with_target(Utc::now() + Duration::days(1));
        let shutdown_rx = state.subscribe_shutdown();

        state.teardown().await;
        assert!(*shutdown_rx.borrow());
    }
}
