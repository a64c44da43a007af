//! Skyward Feedback - real-time feedback engine for browser mini-games
//!
//! Core modules:
//! - `assets`: Readiness table for sprites, background video and music tracks
//! - `effects`: Timed hit/success effects and their decay curves
//! - `render`: Effect compositor and drawing surfaces (display list, web canvas)
//! - `audio`: Music channel coordinator and playback backends
//! - `scheduler`: Fixed-rate redraw clock
//! - `sim`: Flight playfield kinematics used by the demo host
//! - `session`: Per-game session wiring everything together

pub mod assets;
pub mod audio;
pub mod effects;
pub mod error;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::FeedbackError;
pub use session::{FrameOutcome, GameSession};
pub use settings::Settings;

/// Feedback tuning constants
pub mod consts {
    /// Lifetime of a hit/success effect (milliseconds)
    pub const EFFECT_DURATION_MS: f64 = 600.0;

    /// Actor tilt: degrees of tilt per unit of vertical velocity
    pub const TILT_PER_VELOCITY: f32 = 2.0;
    /// Actor tilt bound (degrees, symmetric)
    pub const MAX_TILT_DEG: f32 = 25.0;

    /// Peak shake amplitude of a miss (pixels)
    pub const SHAKE_AMPLITUDE: f32 = 6.0;
    /// Peak wobble of a miss (degrees)
    pub const WOBBLE_DEG: f32 = 8.0;
    /// Wobble phase divisor (milliseconds per radian)
    pub const WOBBLE_PERIOD_MS: f64 = 30.0;

    /// Full-frame wash alpha at the start of an effect
    pub const OVERLAY_MAX_ALPHA: f32 = 0.35;
    /// Flash circle alpha at the start of an effect
    pub const FLASH_MAX_ALPHA: f32 = 0.9;
    /// Flash circle final radius as a fraction of the larger canvas side
    pub const FLASH_RADIUS_FRACTION: f32 = 0.12;

    /// Default music volume for every channel
    pub const MUSIC_VOLUME: f32 = 0.3;

    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Max simulation substeps per frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default redraw rate (Hz)
    pub const REDRAW_HZ: u32 = 60;
    /// Asset loads still pending after this long are marked failed (milliseconds)
    pub const ASSET_LOAD_TIMEOUT_MS: f64 = 10_000.0;

    /// Label font used on obstacles
    pub const LABEL_FONT: &str = "bold 24px 'Comic Sans MS', sans-serif";
    /// Vertical nudge applied to obstacle labels (pixels)
    pub const LABEL_BASELINE_OFFSET: f32 = 5.0;
}

/// Actor tilt (radians) for a vertical velocity.
///
/// Purely kinematic: no angular state is carried between frames.
#[inline]
pub fn actor_tilt(vy: f32) -> f32 {
    use consts::{MAX_TILT_DEG, TILT_PER_VELOCITY};
    (vy * TILT_PER_VELOCITY)
        .clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
        .to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tilt_follows_velocity() {
        assert!((actor_tilt(10.0) - 20f32.to_radians()).abs() < 1e-6);
        assert!((actor_tilt(-5.0) + 10f32.to_radians()).abs() < 1e-6);
        assert_eq!(actor_tilt(0.0), 0.0);
    }

    #[test]
    fn test_tilt_clamps() {
        assert!((actor_tilt(20.0) - 25f32.to_radians()).abs() < 1e-6);
        assert!((actor_tilt(-400.0) + 25f32.to_radians()).abs() < 1e-6);
    }
}
