//! Flight playfield simulation
//!
//! Minimal, deterministic kinematics for the demo host: gravity and flap on
//! the actor, obstacles scrolling right-to-left, contact detection. Deciding
//! whether a contact is a hit or a success is left to the host.
//! - Fixed timestep only
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;

use glam::Vec2;

pub use state::{Actor, Obstacle, Playfield, Rect};
pub use tick::{Contact, TickInput, tick};

/// Velocities are expressed per frame at this rate
pub const FRAME_RATE: f32 = 60.0;
/// Downward acceleration (pixels per frame²)
pub const GRAVITY: f32 = 0.5;
/// Velocity set by a flap (pixels per frame, negative = up)
pub const FLAP_VELOCITY: f32 = -8.0;
/// Terminal fall speed (pixels per frame)
pub const MAX_FALL_SPEED: f32 = 12.0;
/// Obstacle scroll speed (pixels per frame)
pub const SCROLL_SPEED: f32 = 3.0;
/// Default obstacle footprint
pub const OBSTACLE_SIZE: Vec2 = Vec2::new(140.0, 80.0);
