//! Music channels
//!
//! Four looping tracks (menu music and in-game music, each in a normal and an
//! alternate theme) owned by one [`AudioCoordinator`]. Backends only implement
//! [`Track`]; nothing outside the coordinator touches a channel.

pub mod coordinator;
#[cfg(all(feature = "native-audio", not(target_arch = "wasm32")))]
pub mod rodio_track;
pub mod sim_track;
#[cfg(target_arch = "wasm32")]
pub mod web_track;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use coordinator::AudioCoordinator;
pub use sim_track::{SimClock, SimTrack};

/// Which screen the game is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    /// Game home / menu
    Menu,
    /// Gameplay in progress
    Playing,
    /// Gameplay suspended
    Paused,
}

/// Game-wide theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Normal,
    /// "Nightmare" theme
    Alternate,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Normal => Mode::Alternate,
            Mode::Alternate => Mode::Normal,
        }
    }
}

/// The four logical music channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelId {
    /// Menu music, normal theme
    AmbientNormal,
    /// Menu music, alternate theme
    AmbientAlt,
    /// In-game music, normal theme
    ActiveNormal,
    /// In-game music, alternate theme
    ActiveAlt,
}

impl ChannelId {
    pub const ALL: [ChannelId; 4] = [
        ChannelId::AmbientNormal,
        ChannelId::AmbientAlt,
        ChannelId::ActiveNormal,
        ChannelId::ActiveAlt,
    ];

    pub fn ambient(mode: Mode) -> Self {
        match mode {
            Mode::Normal => ChannelId::AmbientNormal,
            Mode::Alternate => ChannelId::AmbientAlt,
        }
    }

    pub fn active(mode: Mode) -> Self {
        match mode {
            Mode::Normal => ChannelId::ActiveNormal,
            Mode::Alternate => ChannelId::ActiveAlt,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            ChannelId::AmbientNormal => 0,
            ChannelId::AmbientAlt => 1,
            ChannelId::ActiveNormal => 2,
            ChannelId::ActiveAlt => 3,
        }
    }
}

/// Playback refused by the platform (autoplay policy, no output device, ...)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PlaybackRejected {
    pub reason: String,
}

impl PlaybackRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A looping, seekable music source.
///
/// `play` is fire-and-forget: an `Ok` only means the request was issued. A
/// rejected track simply stays paused.
pub trait Track {
    fn play(&mut self) -> Result<(), PlaybackRejected>;
    fn pause(&mut self);
    /// Seek back to the start without changing paused state
    fn rewind(&mut self);
    fn set_muted(&mut self, muted: bool);
    fn set_volume(&mut self, volume: f32);
    fn volume(&self) -> f32;
    fn is_paused(&self) -> bool;
    fn is_muted(&self) -> bool;
    fn position(&self) -> Duration;
}

/// Read-only view of one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStatus {
    pub id: ChannelId,
    pub playing: bool,
    pub muted: bool,
    pub volume: f32,
    pub position: Duration,
}

/// One channel: a track plus the operations the coordinator is allowed to use
pub(crate) struct AudioChannel<T: Track> {
    pub id: ChannelId,
    track: T,
}

impl<T: Track> AudioChannel<T> {
    pub fn new(id: ChannelId, mut track: T, volume: f32, muted: bool) -> Self {
        track.set_volume(volume.clamp(0.0, 1.0));
        track.set_muted(muted);
        Self { id, track }
    }

    /// Start (or resume) playback from the current position
    pub fn activate(&mut self) -> Result<(), PlaybackRejected> {
        if self.track.is_paused() {
            self.track.play()
        } else {
            Ok(())
        }
    }

    /// Pause and rewind to the start
    pub fn deactivate(&mut self) {
        self.track.pause();
        self.track.rewind();
    }

    /// Pause, keeping the position for a later resume
    pub fn suspend(&mut self) {
        self.track.pause();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.track.set_muted(muted);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.track.set_volume(volume.clamp(0.0, 1.0));
    }

    pub fn is_playing(&self) -> bool {
        !self.track.is_paused()
    }

    pub fn status(&self) -> ChannelStatus {
        ChannelStatus {
            id: self.id,
            playing: self.is_playing(),
            muted: self.track.is_muted(),
            volume: self.track.volume(),
            position: self.track.position(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_lookup() {
        assert_eq!(ChannelId::ambient(Mode::Alternate), ChannelId::AmbientAlt);
        assert_eq!(ChannelId::active(Mode::Normal), ChannelId::ActiveNormal);
        for (i, id) in ChannelId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(Mode::Normal.toggled(), Mode::Alternate);
        assert_eq!(Mode::default().toggled().toggled(), Mode::Normal);
    }
}
