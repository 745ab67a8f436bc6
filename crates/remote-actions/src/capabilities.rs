//! Capability traits the registry calls into.
//!
//! Implementations are best-effort: they report failures as [`ActionError`]
//! and the registry logs and drops them.

use crate::ActionError;
use async_trait::async_trait;

/// Media transport control for whatever player is active.
#[async_trait]
pub trait MediaController: Send + Sync {
    async fn play_pause(&self) -> Result<(), ActionError>;

    async fn next_track(&self) -> Result<(), ActionError>;

    async fn previous_track(&self) -> Result<(), ActionError>;
}

/// Output volume of the default sink.
#[async_trait]
pub trait VolumeController: Send + Sync {
    async fn volume_up(&self) -> Result<(), ActionError>;

    async fn volume_down(&self) -> Result<(), ActionError>;

    async fn toggle_mute(&self) -> Result<(), ActionError>;
}

/// Session and launcher shortcuts.
#[async_trait]
pub trait SystemActions: Send + Sync {
    async fn lock_screen(&self) -> Result<(), ActionError>;

    async fn screenshot(&self) -> Result<(), ActionError>;

    async fn open_browser(&self) -> Result<(), ActionError>;

    async fn open_spotify(&self) -> Result<(), ActionError>;

    async fn open_terminal(&self) -> Result<(), ActionError>;
}
