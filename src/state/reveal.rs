//! Reveal state record and its transitions

use serde::{Deserialize, Serialize};

use super::countdown::Remaining;

/// Tributes cycled on the opened card
pub const TRIBUTES: [&str; 4] = [
    "On your special day, I just want to say how much you mean to me.",
    "You make my life beautiful, and I hope your day is as amazing as you are!",
    "Every moment with you is a blessing. Happy Birthday, My Love!",
    "To the most wonderful person I know... Stay happy always! ❤️",
];

/// Note shown once the secret is unlocked
pub const SECRET_NOTE: &str =
    "Unna mathiri oru thanga katti kedaika naan romba kuduthu vachukanum. Always be mine! ❤️";

/// Three-stage progression gating what the page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealPhase {
    Waiting,
    Closed,
    Opened,
}

impl RevealPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealPhase::Waiting => "waiting",
            RevealPhase::Closed => "closed",
            RevealPhase::Opened => "opened",
        }
    }
}

/// Outcome of a named transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Applied,
    Ignored,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }

    fn when(condition: bool) -> Self {
        if condition { Transition::Applied } else { Transition::Ignored }
    }
}

/// The single state record behind the page.
///
/// Fields are private; every change goes through one of the transition
/// methods below, each of which leaves the record untouched when it does not
/// apply to the current phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealState {
    phase: RevealPhase,
    remaining: Option<Remaining>,
    message_index: usize,
    muted: bool,
    secret_visible: bool,
    love_count: u64,
}

impl RevealState {
    pub fn new() -> Self {
        Self {
            phase: RevealPhase::Waiting,
            remaining: None,
            message_index: 0,
            muted: false,
            secret_visible: false,
            love_count: 0,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Remaining time, only meaningful while waiting
    pub fn remaining(&self) -> Option<Remaining> {
        match self.phase {
            RevealPhase::Waiting => self.remaining,
            _ => None,
        }
    }

    pub fn message_index(&self) -> usize {
        self.message_index
    }

    pub fn message(&self) -> &'static str {
        TRIBUTES[self.message_index]
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_secret_visible(&self) -> bool {
        self.secret_visible
    }

    pub fn love_count(&self) -> u64 {
        self.love_count
    }

    pub fn update_remaining(&mut self, remaining: Remaining) -> Transition {
        let applies = self.phase == RevealPhase::Waiting;
        if applies {
            self.remaining = Some(remaining);
        }
        Transition::when(applies)
    }

    /// Waiting -> Closed, driven by the countdown
    pub fn cross_boundary(&mut self) -> Transition {
        let applies = self.phase == RevealPhase::Waiting;
        if applies {
            self.phase = RevealPhase::Closed;
            self.remaining = None;
        }
        Transition::when(applies)
    }

    /// Closed -> Opened, driven by the user
    pub fn open_gift(&mut self) -> Transition {
        let applies = self.phase == RevealPhase::Closed;
        if applies {
            self.phase = RevealPhase::Opened;
            self.message_index = 0;
        }
        Transition::when(applies)
    }

    pub fn advance_message(&mut self) -> Transition {
        let applies = self.phase == RevealPhase::Opened;
        if applies {
            self.message_index = (self.message_index + 1) % TRIBUTES.len();
        }
        Transition::when(applies)
    }

    pub fn toggle_mute(&mut self) -> Transition {
        let applies = self.phase == RevealPhase::Opened;
        if applies {
            self.muted = !self.muted;
        }
        Transition::when(applies)
    }

    /// One way: a revealed note stays revealed
    pub fn reveal_secret(&mut self) -> Transition {
        let applies = self.phase == RevealPhase::Opened && !self.secret_visible;
        if applies {
            self.secret_visible = true;
        }
        Transition::when(applies)
    }

    pub fn send_love(&mut self) -> Transition {
        let applies = self.phase == RevealPhase::Opened;
        if applies {
            self.love_count = self.love_count.saturating_add(1);
        }
        Transition::when(applies)
    }
}

impl Default for RevealState {
    fn default() -> Self {
        Self::new()
    }
}
