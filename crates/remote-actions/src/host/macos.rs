//! macOS command table (AppleScript and built-in launchers).

use super::HostCommand;
use crate::action::Action;

fn applescript(script: &str) -> HostCommand {
    HostCommand::wait("osascript", &["-e", script])
}

pub(super) fn commands(action: Action, browser_url: &str) -> Vec<HostCommand> {
    match action {
        Action::Play | Action::Pause => {
            vec![applescript("tell application \"Spotify\" to playpause")]
        }
        Action::Next => vec![applescript("tell application \"Spotify\" to next track")],
        Action::Previous => vec![applescript(
            "tell application \"Spotify\" to previous track",
        )],
        Action::VolumeUp => vec![applescript(
            "set volume output volume ((output volume of (get volume settings)) + 6)",
        )],
        Action::VolumeDown => vec![applescript(
            "set volume output volume ((output volume of (get volume settings)) - 6)",
        )],
        Action::Mute => vec![applescript(
            "set volume output muted (not (output muted of (get volume settings)))",
        )],
        Action::Lock => vec![HostCommand::wait("pmset", &["displaysleepnow"])],
        Action::Screenshot => vec![HostCommand::detach("screencapture", &["-i", "-c"])],
        Action::Browser => vec![HostCommand::detach("open", &[browser_url])],
        Action::Spotify => vec![HostCommand::detach("open", &["-a", "Spotify"])],
        Action::Terminal => vec![HostCommand::detach("open", &["-a", "Terminal"])],
    }
}
