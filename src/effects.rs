//! Timed feedback effects
//!
//! A hit (miss) or success spawns a [`TimedEffect`] anchored at the contact
//! point. Its visual weight is a pure function of elapsed time and decays
//! linearly to zero over the effect duration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What kind of feedback an effect gives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Wrong answer / collision: red wash, shake and wobble
    Miss,
    /// Right answer: green wash, no motion
    Success,
}

impl EffectKind {
    pub const ALL: [EffectKind; 2] = [EffectKind::Miss, EffectKind::Success];

    fn slot(self) -> usize {
        match self {
            EffectKind::Miss => 0,
            EffectKind::Success => 1,
        }
    }

    /// Whether this kind shakes and tilts the actor
    pub fn moves_actor(self) -> bool {
        matches!(self, EffectKind::Miss)
    }
}

/// A transient visual cue anchored to a creation timestamp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub kind: EffectKind,
    /// Contact point in canvas pixels
    pub origin: Vec2,
    /// Creation time (milliseconds, host clock)
    pub started_at: f64,
}

impl TimedEffect {
    pub fn new(kind: EffectKind, origin: Vec2, started_at: f64) -> Self {
        Self {
            kind,
            origin,
            started_at,
        }
    }

    /// Milliseconds since creation; a clock reading before creation counts as zero
    pub fn elapsed(&self, now: f64) -> f64 {
        (now - self.started_at).max(0.0)
    }

    pub fn is_expired(&self, now: f64, duration: f64) -> bool {
        self.elapsed(now) >= duration
    }

    /// Remaining weight in (0, 1], or None once expired
    pub fn progress(&self, now: f64, duration: f64) -> Option<f32> {
        let elapsed = self.elapsed(now);
        if elapsed >= duration {
            return None;
        }
        Some((1.0 - elapsed / duration) as f32)
    }

    /// Visual contribution of this effect at `now` on a canvas of `canvas` size
    pub fn sample(&self, now: f64, duration: f64, canvas: Vec2) -> FeedbackSample {
        let Some(p) = self.progress(now, duration) else {
            return FeedbackSample::INERT;
        };
        let elapsed = self.elapsed(now);

        let (shake_amplitude, wobble) = if self.kind.moves_actor() {
            let wobble = ((elapsed / WOBBLE_PERIOD_MS).sin() as f32) * WOBBLE_DEG * p;
            (SHAKE_AMPLITUDE * p, wobble.to_radians())
        } else {
            (0.0, 0.0)
        };

        FeedbackSample {
            shake_amplitude,
            wobble,
            overlay_alpha: OVERLAY_MAX_ALPHA * p,
            flash_radius: FLASH_RADIUS_FRACTION * canvas.max_element() * (1.0 - p),
            flash_alpha: FLASH_MAX_ALPHA * p,
        }
    }
}

/// Per-frame visual weight of one effect
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeedbackSample {
    /// Max jitter of the actor's draw origin (pixels)
    pub shake_amplitude: f32,
    /// Extra actor rotation (radians)
    pub wobble: f32,
    /// Alpha of the full-frame wash
    pub overlay_alpha: f32,
    /// Radius of the expanding flash circle (pixels)
    pub flash_radius: f32,
    /// Alpha of the flash circle
    pub flash_alpha: f32,
}

impl FeedbackSample {
    /// Zero contribution (expired or absent effect)
    pub const INERT: FeedbackSample = FeedbackSample {
        shake_amplitude: 0.0,
        wobble: 0.0,
        overlay_alpha: 0.0,
        flash_radius: 0.0,
        flash_alpha: 0.0,
    };

    pub fn is_inert(&self) -> bool {
        self.overlay_alpha <= 0.0 && self.flash_alpha <= 0.0 && self.shake_amplitude <= 0.0
    }
}

/// Active effects, one slot per kind.
///
/// A new effect replaces the previous one of the same kind outright, even if
/// that one has not decayed yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectSlots {
    slots: [Option<TimedEffect>; 2],
}

impl EffectSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new effect, replacing any effect of the same kind
    pub fn spawn(&mut self, kind: EffectKind, origin: Vec2, now: f64) -> TimedEffect {
        let effect = TimedEffect::new(kind, origin, now);
        self.slots[kind.slot()] = Some(effect);
        effect
    }

    pub fn get(&self, kind: EffectKind) -> Option<&TimedEffect> {
        self.slots[kind.slot()].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimedEffect> {
        self.slots.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Drop expired effects; returns true if anything was removed
    pub fn prune(&mut self, now: f64, duration: f64) -> bool {
        let mut removed = false;
        for slot in self.slots.iter_mut() {
            if slot.is_some_and(|e| e.is_expired(now, duration)) {
                *slot = None;
                removed = true;
            }
        }
        removed
    }
}
