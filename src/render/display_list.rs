//! Recording canvas
//!
//! Keeps the drawing calls of the most recent frame. Used by the native host
//! (which has no window) and by tests to inspect what a frame drew.

use glam::Vec2;

use super::{Canvas, Rgba};
use crate::assets::AssetId;
use crate::sim::Rect;

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Vec2),
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    FillRect { rect: Rect, color: Rgba },
    FillEllipse { center: Vec2, radii: Vec2, color: Rgba },
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    Image { asset: AssetId, rect: Rect },
    Text { text: String, center: Vec2, color: Rgba },
}

#[derive(Debug, Default)]
pub struct DisplayList {
    cmds: Vec<DrawCmd>,
    frames: u64,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls of the current frame, in order
    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    /// Number of frames started (calls to `clear`)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn images(&self) -> Vec<(AssetId, Rect)> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Image { asset, rect } => Some((*asset, *rect)),
                _ => None,
            })
            .collect()
    }

    pub fn ellipses(&self) -> Vec<(Vec2, Vec2)> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::FillEllipse { center, radii, .. } => Some((*center, *radii)),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> Vec<(Vec2, f32, Rgba)> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::FillCircle { center, radius, color } => Some((*center, *radius, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<(Rect, Rgba)> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::FillRect { rect, color } => Some((*rect, *color)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<(&str, Vec2)> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, center, .. } => Some((text.as_str(), *center)),
                _ => None,
            })
            .collect()
    }

    pub fn rotations(&self) -> Vec<f32> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Rotate(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    pub fn translations(&self) -> Vec<Vec2> {
        self.cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Translate(t) => Some(*t),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for DisplayList {
    fn clear(&mut self, size: Vec2) {
        self.cmds.clear();
        self.frames += 1;
        self.cmds.push(DrawCmd::Clear(size));
    }

    fn save(&mut self) {
        self.cmds.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.cmds.push(DrawCmd::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.cmds.push(DrawCmd::Translate(offset));
    }

    fn rotate(&mut self, radians: f32) {
        self.cmds.push(DrawCmd::Rotate(radians));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.cmds.push(DrawCmd::FillRect { rect, color });
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Rgba) {
        self.cmds.push(DrawCmd::FillEllipse { center, radii, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.cmds.push(DrawCmd::FillCircle { center, radius, color });
    }

    fn draw_image(&mut self, asset: AssetId, rect: Rect) {
        self.cmds.push(DrawCmd::Image { asset, rect });
    }

    fn fill_text(&mut self, text: &str, center: Vec2, color: Rgba) {
        self.cmds.push(DrawCmd::Text {
            text: text.to_string(),
            center,
            color,
        });
    }
}
