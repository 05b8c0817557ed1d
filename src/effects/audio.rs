//! Background track playback

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Failure to start or resume playback
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio track {path} is unavailable: {source}")]
    TrackMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start audio player '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Which side of the connection plays the track
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioKind {
    #[default]
    Page,
    Command,
}

/// What the page needs to mirror playback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioStatus {
    /// The page only plays the track itself for `AudioKind::Page`
    pub output: AudioKind,
    pub playing: bool,
    pub muted: bool,
}

/// Where the looped track is played
#[derive(Debug)]
pub enum AudioOutput {
    /// The page's own `<audio>` element follows the reported status
    Page(PageAudio),
    /// An external player process owned by the server
    Command(CommandAudio),
}

impl AudioOutput {
    pub fn page(track: impl Into<PathBuf>) -> Self {
        AudioOutput::Page(PageAudio::new(track))
    }

    pub fn command(program: String, args: Vec<String>, track: impl Into<PathBuf>) -> Self {
        AudioOutput::Command(CommandAudio::new(program, args, track))
    }

    pub fn track(&self) -> &Path {
        match self {
            AudioOutput::Page(page) => &page.track,
            AudioOutput::Command(command) => &command.track,
        }
    }

    pub fn status(&self) -> AudioStatus {
        match self {
            AudioOutput::Page(page) => read_status(&page.status),
            AudioOutput::Command(command) => read_status(&command.status),
        }
    }

    /// Start looped playback
    pub async fn play(&self) -> Result<(), AudioError> {
        match self {
            AudioOutput::Page(page) => page.play().await,
            AudioOutput::Command(command) => command.play().await,
        }
    }

    /// Apply the mute flag immediately
    pub async fn set_muted(&self, muted: bool) -> Result<(), AudioError> {
        match self {
            AudioOutput::Page(page) => {
                write_status(&page.status, |s| s.muted = muted);
                Ok(())
            }
            AudioOutput::Command(command) => command.set_muted(muted).await,
        }
    }

    pub async fn stop(&self) {
        match self {
            AudioOutput::Page(page) => write_status(&page.status, |s| s.playing = false),
            AudioOutput::Command(command) => command.stop().await,
        }
    }
}

/// Playback delegated to the browser
#[derive(Debug)]
pub struct PageAudio {
    track: PathBuf,
    status: Mutex<AudioStatus>,
}

impl PageAudio {
    pub fn new(track: impl Into<PathBuf>) -> Self {
        Self {
            track: track.into(),
            status: Mutex::new(AudioStatus::default()),
        }
    }

    async fn play(&self) -> Result<(), AudioError> {
        ensure_track(&self.track).await?;
        write_status(&self.status, |s| s.playing = true);
        debug!("Page audio marked as playing: {}", self.track.display());
        Ok(())
    }
}

/// Playback through a spawned player; muting stops the process
#[derive(Debug)]
pub struct CommandAudio {
    program: String,
    args: Vec<String>,
    track: PathBuf,
    status: Mutex<AudioStatus>,
    child: tokio::sync::Mutex<Option<Child>>,
}

impl CommandAudio {
    pub fn new(program: String, args: Vec<String>, track: impl Into<PathBuf>) -> Self {
        Self {
            program,
            args,
            track: track.into(),
            status: Mutex::new(AudioStatus {
                output: AudioKind::Command,
                ..AudioStatus::default()
            }),
            child: tokio::sync::Mutex::new(None),
        }
    }

    async fn play(&self) -> Result<(), AudioError> {
        ensure_track(&self.track).await?;

        if !read_status(&self.status).muted {
            self.spawn_player().await?;
        }
        write_status(&self.status, |s| s.playing = true);
        Ok(())
    }

    async fn set_muted(&self, muted: bool) -> Result<(), AudioError> {
        write_status(&self.status, |s| s.muted = muted);

        if muted {
            self.kill_player().await;
        } else if read_status(&self.status).playing {
            self.spawn_player().await?;
        }
        Ok(())
    }

    async fn stop(&self) {
        self.kill_player().await;
        write_status(&self.status, |s| s.playing = false);
    }

    async fn spawn_player(&self) -> Result<(), AudioError> {
        let mut child = self.child.lock().await;
        if child.is_some() {
            return Ok(());
        }

        debug!("Spawning audio player: {} {:?} {}", self.program, self.args, self.track.display());
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.track)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AudioError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        info!("Audio player started (pid {:?})", spawned.id());
        *child = Some(spawned);
        Ok(())
    }

    async fn kill_player(&self) {
        if let Some(mut running) = self.child.lock().await.take() {
            if let Err(e) = running.kill().await {
                warn!("Failed to stop audio player: {}", e);
            } else {
                info!("Audio player stopped");
            }
        }
    }
}

async fn ensure_track(track: &Path) -> Result<(), AudioError> {
    tokio::fs::metadata(track)
        .await
        .map(|_| ())
        .map_err(|source| AudioError::TrackMissing {
            path: track.to_path_buf(),
            source,
        })
}

fn read_status(status: &Mutex<AudioStatus>) -> AudioStatus {
    *status.lock().unwrap_or_else(|e| e.into_inner())
}

fn write_status(status: &Mutex<AudioStatus>, update: impl FnOnce(&mut AudioStatus)) {
    let mut guard = status.lock().unwrap_or_else(|e| e.into_inner());
    update(&mut guard);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn page_audio_needs_the_track() {
        let dir = tempfile::tempdir().unwrap();
        let output = AudioOutput::page(dir.path().join("missing.mpeg"));

        let err = output.play().await.unwrap_err();
        assert!(matches!(err, AudioError::TrackMissing { .. }));
        assert!(!output.status().playing);
    }

    #[tokio::test]
    async fn page_audio_follows_play_and_mute() {
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("song.mpeg");
        std::fs::write(&track, b"not really audio").unwrap();
        let output = AudioOutput::page(&track);

        output.play().await.unwrap();
        output.set_muted(true).await.unwrap();
        assert_eq!(
            output.status(),
            AudioStatus {
                output: AudioKind::Page,
                playing: true,
                muted: true,
            }
        );

        output.stop().await;
        assert!(!output.status().playing);
    }

    #[tokio::test]
    async fn unknown_player_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("song.mpeg");
        std::fs::write(&track, b"not really audio").unwrap();
        let output = AudioOutput::command(
            "definitely-not-a-player-binary".to_string(),
            vec![],
            &track,
        );

        let err = output.play().await.unwrap_err();
        assert!(matches!(err, AudioError::Spawn { .. }));
        assert!(!output.status().playing);
    }

    #[tokio::test]
    async fn muted_command_player_does_not_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("song.mpeg");
        std::fs::write(&track, b"not really audio").unwrap();
        let output = AudioOutput::command(
            "definitely-not-a-player-binary".to_string(),
            vec![],
            &track,
        );

        output.set_muted(true).await.unwrap();
        output.play().await.unwrap();
        assert_eq!(
            output.status(),
            AudioStatus {
                output: AudioKind::Command,
                playing: true,
                muted: true,
            }
        );
    }

    async fn player_running(output: &AudioOutput) -> bool {
        match output {
            AudioOutput::Command(command) => command.child.lock().await.is_some(),
            AudioOutput::Page(_) => false,
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn mute_stops_and_unmute_restarts_the_player() {
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("song.mpeg");
        std::fs::write(&track, b"not really audio").unwrap();
        let output = AudioOutput::command("tail".to_string(), vec!["-f".to_string()], &track);

        output.play().await.unwrap();
        assert!(player_running(&output).await);

        output.set_muted(true).await.unwrap();
        assert!(!player_running(&output).await);
        assert!(output.status().playing);

        output.set_muted(false).await.unwrap();
        assert!(player_running(&output).await);

        output.stop().await;
        assert!(!player_running(&output).await);
        assert!(!output.status().playing);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn repeated_toggles_keep_player_in_step_with_mute() {
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("song.mpeg");
        std::fs::write(&track, b"not really audio").unwrap();
        let output = AudioOutput::command("tail".to_string(), vec!["-f".to_string()], &track);
        output.play().await.unwrap();

        for round in 0..20 {
            let muted = round % 2 == 0;
            output.set_muted(muted).await.unwrap();
            assert_eq!(player_running(&output).await, !muted);
            assert_eq!(output.status().muted, muted);
        }

        output.stop().await;
    }
}
