//! Action registry: the fixed mapping from [`Action`] to a capability call.

use crate::action::Action;
use crate::capabilities::{MediaController, SystemActions, VolumeController};
use crate::ActionError;
use std::sync::Arc;

/// Immutable table of host actions, built once at startup.
#[derive(Clone)]
pub struct ActionRegistry {
    media: Arc<dyn MediaController>,
    volume: Arc<dyn VolumeController>,
    system: Arc<dyn SystemActions>,
}

impl ActionRegistry {
    pub fn new(
        media: Arc<dyn MediaController>,
        volume: Arc<dyn VolumeController>,
        system: Arc<dyn SystemActions>,
    ) -> Self {
        Self {
            media,
            volume,
            system,
        }
    }

    /// Build a registry where one object provides every capability.
    pub fn from_provider<P>(provider: Arc<P>) -> Self
    where
        P: MediaController + VolumeController + SystemActions + 'static,
    {
        Self {
            media: provider.clone(),
            volume: provider.clone(),
            system: provider,
        }
    }

    /// Run the operation bound to `action`.
    pub async fn invoke(&self, action: Action) -> Result<(), ActionError> {
        match action {
            // the dashboard sends both; the host only has a toggle
            Action::Play | Action::Pause => self.media.play_pause().await,
            Action::Next => self.media.next_track().await,
            Action::Previous => self.media.previous_track().await,
            Action::VolumeUp => self.volume.volume_up().await,
            Action::VolumeDown => self.volume.volume_down().await,
            Action::Mute => self.volume.toggle_mute().await,
            Action::Lock => self.system.lock_screen().await,
            Action::Screenshot => self.system.screenshot().await,
            Action::Browser => self.system.open_browser().await,
            Action::Spotify => self.system.open_spotify().await,
            Action::Terminal => self.system.open_terminal().await,
        }
    }
}
