//! Symbolic actions understood by the bridge.

use std::fmt;

/// Action name carrying a literal shell command instead of a table entry.
pub const CUSTOM_ACTION: &str = "custom";

/// A registered, zero-argument host action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Play,
    Pause,
    Next,
    Previous,
    VolumeUp,
    VolumeDown,
    Mute,
    Lock,
    Screenshot,
    Browser,
    Spotify,
    Terminal,
}

impl Action {
    /// Every registered action, in table order.
    pub const ALL: [Action; 12] = [
        Action::Play,
        Action::Pause,
        Action::Next,
        Action::Previous,
        Action::VolumeUp,
        Action::VolumeDown,
        Action::Mute,
        Action::Lock,
        Action::Screenshot,
        Action::Browser,
        Action::Spotify,
        Action::Terminal,
    ];

    /// Wire name of the action.
    pub fn name(self) -> &'static str {
        match self {
            Action::Play => "play",
            Action::Pause => "pause",
            Action::Next => "next",
            Action::Previous => "previous",
            Action::VolumeUp => "volume_up",
            Action::VolumeDown => "volume_down",
            Action::Mute => "mute",
            Action::Lock => "lock",
            Action::Screenshot => "screenshot",
            Action::Browser => "browser",
            Action::Spotify => "spotify",
            Action::Terminal => "terminal",
        }
    }

    /// Look up an action by wire name. Names are exact and case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
