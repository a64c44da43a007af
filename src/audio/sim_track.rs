//! Clocked in-memory track
//!
//! Used by the native host and tests: playback position advances only when the
//! shared [`SimClock`] is advanced, and the clock can simulate an autoplay
//! block that rejects every `play` until lifted.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use super::{PlaybackRejected, Track};

#[derive(Debug, Default)]
struct ClockState {
    now: Cell<Duration>,
    autoplay_blocked: Cell<bool>,
}

/// Shared playback clock for a set of [`SimTrack`]s
#[derive(Debug, Clone, Default)]
pub struct SimClock(Rc<ClockState>);

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.0.now.get()
    }

    pub fn advance(&self, dt: Duration) {
        self.0.now.set(self.0.now.get() + dt);
    }

    /// Reject every `play` until unblocked (browser autoplay policy)
    pub fn set_autoplay_blocked(&self, blocked: bool) {
        self.0.autoplay_blocked.set(blocked);
    }

    fn autoplay_blocked(&self) -> bool {
        self.0.autoplay_blocked.get()
    }
}

/// Looping track that plays against a [`SimClock`]
#[derive(Debug)]
pub struct SimTrack {
    clock: SimClock,
    paused: bool,
    /// Position accumulated up to the last pause/seek
    offset: Duration,
    /// Clock reading when playback last (re)started
    started_at: Duration,
    /// Loop length; None plays forever
    length: Option<Duration>,
    muted: bool,
    volume: f32,
}

impl SimTrack {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            paused: true,
            offset: Duration::ZERO,
            started_at: Duration::ZERO,
            length: None,
            muted: false,
            volume: 1.0,
        }
    }

    /// Wrap the position every `length` (looping track)
    pub fn with_length(mut self, length: Duration) -> Self {
        if !length.is_zero() {
            self.length = Some(length);
        }
        self
    }

    fn raw_position(&self) -> Duration {
        if self.paused {
            self.offset
        } else {
            self.offset + self.clock.now().saturating_sub(self.started_at)
        }
    }
}

impl Track for SimTrack {
    fn play(&mut self) -> Result<(), PlaybackRejected> {
        if self.clock.autoplay_blocked() {
            return Err(PlaybackRejected::new("autoplay blocked"));
        }
        if self.paused {
            self.paused = false;
            self.started_at = self.clock.now();
        }
        Ok(())
    }

    fn pause(&mut self) {
        if !self.paused {
            self.offset = self.raw_position();
            self.paused = true;
        }
    }

    fn rewind(&mut self) {
        self.offset = Duration::ZERO;
        self.started_at = self.clock.now();
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn position(&self) -> Duration {
        let pos = self.raw_position();
        match self.length {
            Some(len) => Duration::from_nanos((pos.as_nanos() % len.as_nanos()) as u64),
            None => pos,
        }
    }
}
