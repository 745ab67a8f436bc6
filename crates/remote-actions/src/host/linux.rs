//! Linux desktop command table (PulseAudio/PipeWire, MPRIS, GNOME).

use super::HostCommand;
use crate::action::Action;

const DEFAULT_SINK: &str = "@DEFAULT_SINK@";

pub(super) fn commands(action: Action, browser_url: &str) -> Vec<HostCommand> {
    match action {
        Action::Play | Action::Pause => vec![HostCommand::wait("playerctl", &["play-pause"])],
        Action::Next => vec![HostCommand::wait("playerctl", &["next"])],
        Action::Previous => vec![HostCommand::wait("playerctl", &["previous"])],
        Action::VolumeUp => vec![HostCommand::wait(
            "pactl",
            &["set-sink-volume", DEFAULT_SINK, "+5%"],
        )],
        Action::VolumeDown => vec![HostCommand::wait(
            "pactl",
            &["set-sink-volume", DEFAULT_SINK, "-5%"],
        )],
        Action::Mute => vec![HostCommand::wait(
            "pactl",
            &["set-sink-mute", DEFAULT_SINK, "toggle"],
        )],
        // screensaver first, logind as the fallback
        Action::Lock => vec![
            HostCommand::wait("gnome-screensaver-command", &["-l"]),
            HostCommand::wait("loginctl", &["lock-session"]),
        ],
        Action::Screenshot => vec![HostCommand::detach("gnome-screenshot", &["-i"])],
        Action::Browser => vec![HostCommand::detach("xdg-open", &[browser_url])],
        Action::Spotify => vec![HostCommand::detach("spotify", &[])],
        Action::Terminal => vec![HostCommand::detach("gnome-terminal", &[])],
    }
}
