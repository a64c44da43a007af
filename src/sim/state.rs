//! Playfield state: the actor and the labelled obstacles scrolling past it

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn from_size(size: Vec2) -> Self {
        Self::new(Vec2::ZERO, size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.pos.x < other.max().x
            && other.pos.x < self.max().x
            && self.pos.y < other.max().y
            && other.pos.y < self.max().y
    }
}

/// The player-controlled sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (pixels per 60 Hz frame, positive = down)
    pub vy: f32,
}

impl Actor {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size, vy: 0.0 }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::new(Vec2::new(100.0, 200.0), Vec2::new(80.0, 50.0))
    }
}

/// A scrolling obstacle carrying a text label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub label: String,
}

impl Obstacle {
    pub fn new(id: u32, pos: Vec2, size: Vec2, label: impl Into<String>) -> Self {
        Self {
            id,
            pos,
            size,
            label: label.into(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Actor plus obstacles inside a fixed-size field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playfield {
    pub size: Vec2,
    pub actor: Actor,
    /// Live obstacles (sorted by id for determinism)
    pub obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl Playfield {
    pub fn new(size: Vec2) -> Self {
        let actor_size = Vec2::new(80.0, 50.0);
        let actor_pos = Vec2::new(size.x * 0.15, (size.y - actor_size.y) * 0.5);
        Self {
            size,
            actor: Actor::new(actor_pos, actor_size),
            obstacles: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an obstacle just past the right edge, vertically centred on `y`
    pub fn spawn_obstacle(&mut self, label: impl Into<String>, y: f32) -> u32 {
        let id = self.next_obstacle_id();
        let size = super::OBSTACLE_SIZE;
        let top = (y - size.y * 0.5).clamp(0.0, (self.size.y - size.y).max(0.0));
        self.obstacles
            .push(Obstacle::new(id, Vec2::new(self.size.x, top), size, label));
        id
    }
}
