//! Music channel coordinator
//!
//! State machine over `screen x mode` with an orthogonal mute flag. Every
//! transition leaves at most one of the four channels unpaused.

use super::{AudioChannel, ChannelId, ChannelStatus, Mode, Screen, Track};
use crate::error::FeedbackError;

/// Snapshot of the coordinator's inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorState {
    /// None before the first screen is entered and after shutdown
    pub screen: Option<Screen>,
    pub mode: Mode,
    pub muted: bool,
}

/// Owns the four music channels and decides which one plays
pub struct AudioCoordinator<T: Track> {
    channels: [AudioChannel<T>; 4],
    screen: Option<Screen>,
    mode: Mode,
    muted: bool,
}

impl<T: Track> AudioCoordinator<T> {
    /// Build the four channels from a track factory.
    ///
    /// Nothing plays until the first [`set_screen`](Self::set_screen).
    pub fn new(make_track: impl FnMut(ChannelId) -> T, volume: f32, muted: bool) -> Self {
        Self::from_tracks(ChannelId::ALL.map(make_track), volume, muted)
    }

    /// Take ownership of tracks given in [`ChannelId::ALL`] order
    pub fn from_tracks(tracks: [T; 4], volume: f32, muted: bool) -> Self {
        let [ambient_normal, ambient_alt, active_normal, active_alt] = tracks;
        let channels = [
            AudioChannel::new(ChannelId::AmbientNormal, ambient_normal, volume, muted),
            AudioChannel::new(ChannelId::AmbientAlt, ambient_alt, volume, muted),
            AudioChannel::new(ChannelId::ActiveNormal, active_normal, volume, muted),
            AudioChannel::new(ChannelId::ActiveAlt, active_alt, volume, muted),
        ];
        Self {
            channels,
            screen: None,
            mode: Mode::Normal,
            muted,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        CoordinatorState {
            screen: self.screen,
            mode: self.mode,
            muted: self.muted,
        }
    }

    pub fn screen(&self) -> Option<Screen> {
        self.screen
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// The channel the current state calls for (playing or not)
    pub fn active_channel(&self) -> Option<ChannelId> {
        match self.screen? {
            Screen::Menu => Some(ChannelId::ambient(self.mode)),
            Screen::Playing | Screen::Paused => Some(ChannelId::active(self.mode)),
        }
    }

    pub fn channel_status(&self, id: ChannelId) -> ChannelStatus {
        self.channels[id.index()].status()
    }

    pub fn statuses(&self) -> [ChannelStatus; 4] {
        ChannelId::ALL.map(|id| self.channel_status(id))
    }

    /// Number of unpaused channels (never more than one)
    pub fn playing_count(&self) -> usize {
        self.channels.iter().filter(|c| c.is_playing()).count()
    }

    /// Move to a screen.
    ///
    /// Entering Menu always restarts its music from the top, even from Menu.
    /// Re-entering Playing or Paused is a no-op.
    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen == Some(screen) && screen != Screen::Menu {
            return;
        }

        match screen {
            Screen::Playing => {
                let resuming = self.screen == Some(Screen::Paused);
                self.screen = Some(Screen::Playing);
                self.stop(ChannelId::AmbientNormal);
                self.stop(ChannelId::AmbientAlt);
                if !self.muted {
                    // From Paused this resumes at the retained position
                    self.start(ChannelId::active(self.mode));
                }
                log::debug!(
                    "Screen -> Playing ({:?}{})",
                    self.mode,
                    if resuming { ", resumed" } else { "" }
                );
            }
            Screen::Paused => {
                if self.screen != Some(Screen::Playing) {
                    log::debug!("Ignoring pause from {:?}", self.screen);
                    return;
                }
                self.screen = Some(Screen::Paused);
                self.channels[ChannelId::active(self.mode).index()].suspend();
                log::debug!("Screen -> Paused");
            }
            Screen::Menu => {
                self.screen = Some(Screen::Menu);
                self.stop(ChannelId::ActiveNormal);
                self.stop(ChannelId::ActiveAlt);
                self.enter_menu();
                log::debug!("Screen -> Menu ({:?})", self.mode);
            }
        }
        self.check_exclusive();
    }

    /// Switch theme; swaps whichever music the current screen calls for
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        let previous = self.mode;
        self.mode = mode;

        match self.screen {
            None => {}
            Some(Screen::Menu) => self.enter_menu(),
            Some(Screen::Playing) => {
                self.stop(ChannelId::active(previous));
                if !self.muted {
                    self.restart(ChannelId::active(mode));
                }
            }
            Some(Screen::Paused) => {
                // The new track waits at the start for resume
                self.stop(ChannelId::active(previous));
                self.stop(ChannelId::active(mode));
            }
        }
        log::debug!("Mode {:?} -> {:?}", previous, mode);
        self.check_exclusive();
    }

    /// Mute or unmute every channel.
    ///
    /// Muting never pauses. Unmuting resumes the channel the current state
    /// calls for if it never got started, without rewinding it.
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        for channel in self.channels.iter_mut() {
            channel.set_muted(muted);
        }

        if !muted {
            let audible = match self.screen {
                Some(Screen::Menu) => Some(ChannelId::ambient(self.mode)),
                Some(Screen::Playing) => Some(ChannelId::active(self.mode)),
                Some(Screen::Paused) | None => None,
            };
            if let Some(id) = audible {
                self.start(id);
            }
        }
        log::debug!("Muted: {}", muted);
        self.check_exclusive();
    }

    /// Flip mute; returns the new value
    pub fn toggle_muted(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    /// Apply a volume (0.0 - 1.0) to every channel
    pub fn set_volume(&mut self, volume: f32) {
        for channel in self.channels.iter_mut() {
            channel.set_volume(volume);
        }
    }

    /// Pause and rewind everything; back to the neutral state
    pub fn shutdown(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.deactivate();
        }
        self.screen = None;
        log::debug!("Audio shut down");
    }

    /// (Re)start the menu music for the current mode from the top
    fn enter_menu(&mut self) {
        self.stop(ChannelId::ambient(self.mode.toggled()));
        if !self.muted {
            self.restart(ChannelId::ambient(self.mode));
        }
    }

    fn stop(&mut self, id: ChannelId) {
        self.channels[id.index()].deactivate();
    }

    fn restart(&mut self, id: ChannelId) {
        self.channels[id.index()].deactivate();
        self.start(id);
    }

    /// Start or resume a channel; a rejection leaves it silent
    fn start(&mut self, id: ChannelId) {
        if let Err(rejected) = self.channels[id.index()].activate() {
            log::debug!("{}", FeedbackError::playback(id, rejected.reason));
        }
    }

    fn check_exclusive(&self) {
        debug_assert!(
            self.playing_count() <= 1,
            "more than one music channel playing: {:?}",
            self.statuses()
        );
    }
}

impl<T: Track> Drop for AudioCoordinator<T> {
    fn drop(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.suspend();
        }
    }
}
