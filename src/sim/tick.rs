//! Fixed timestep simulation tick
//!
//! Advances the playfield deterministically and reports contacts.

use glam::Vec2;

use super::state::{Obstacle, Playfield};
use super::{FLAP_VELOCITY, FRAME_RATE, GRAVITY, MAX_FALL_SPEED, SCROLL_SPEED};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (click/tap/space)
    pub flap: bool,
}

/// The actor touched an obstacle; the obstacle is removed from the field
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub obstacle: Obstacle,
    /// Where feedback should be anchored (actor centre at contact)
    pub point: Vec2,
}

/// Advance the playfield by `dt` seconds
pub fn tick(field: &mut Playfield, input: &TickInput, dt: f32) -> Vec<Contact> {
    let frames = dt * FRAME_RATE;

    // Actor: flap overrides velocity, then gravity
    let actor = &mut field.actor;
    if input.flap {
        actor.vy = FLAP_VELOCITY;
    }
    actor.vy = (actor.vy + GRAVITY * frames).min(MAX_FALL_SPEED);
    actor.pos.y += actor.vy * frames;

    // Keep inside the field
    let floor = (field.size.y - actor.size.y).max(0.0);
    if actor.pos.y < 0.0 {
        actor.pos.y = 0.0;
        actor.vy = actor.vy.max(0.0);
    } else if actor.pos.y > floor {
        actor.pos.y = floor;
        actor.vy = actor.vy.min(0.0);
    }

    // Scroll and drop obstacles that left the screen
    for obstacle in field.obstacles.iter_mut() {
        obstacle.pos.x -= SCROLL_SPEED * frames;
    }
    field.obstacles.retain(|o| o.bounds().max().x > 0.0);

    // Contacts consume the obstacle
    let actor_bounds = field.actor.bounds();
    let point = actor_bounds.center();
    let mut contacts = Vec::new();
    field.obstacles.retain(|o| {
        if o.bounds().intersects(&actor_bounds) {
            contacts.push(Contact {
                obstacle: o.clone(),
                point,
            });
            false
        } else {
            true
        }
    });

    if !contacts.is_empty() {
        log::debug!("{} contact(s) at {:?}", contacts.len(), point);
    }
    contacts
}
