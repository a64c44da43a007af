//! 2D rendering
//!
//! The [`Compositor`] issues immediate-mode drawing calls against a [`Canvas`].
//! Backends: [`DisplayList`] records calls (native host, tests) and
//! `WebCanvas` draws into a browser canvas 2D context.

pub mod compositor;
pub mod display_list;
#[cfg(target_arch = "wasm32")]
pub mod web_canvas;

use glam::Vec2;

use crate::assets::AssetId;
use crate::sim::Rect;

pub use compositor::{Compositor, FrameInput, FrameStats};
pub use display_list::{DisplayList, DrawCmd};

/// Straight (non-premultiplied) RGBA, 0.0 - 1.0 per channel
pub type Rgba = [f32; 4];

/// Replace the alpha of a colour
#[inline]
pub fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// CSS `rgba()` string for a colour
pub fn css_rgba(color: Rgba) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({}, {}, {}, {})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

/// A drawing surface with a save/restore transform stack
pub trait Canvas {
    /// Erase the whole surface to transparent
    fn clear(&mut self, size: Vec2);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.fill_ellipse(center, Vec2::splat(radius), color);
    }
    /// Draw a loaded image asset stretched over `rect`
    fn draw_image(&mut self, asset: AssetId, rect: Rect);
    /// Draw a label centred on `center`
    fn fill_text(&mut self, text: &str, center: Vec2, color: Rgba);
}

/// Colors for feedback elements
pub mod colors {
    use super::Rgba;
    use crate::effects::EffectKind;

    /// Shown when the background video is unavailable (sky blue)
    pub const SKY_FALLBACK: Rgba = [0.49, 0.83, 0.99, 1.0];
    pub const ACTOR_PLACEHOLDER: Rgba = [0.0, 0.0, 1.0, 1.0];
    pub const OBSTACLE_PLACEHOLDER: Rgba = [1.0, 1.0, 1.0, 0.8];
    pub const LABEL: Rgba = [0.2, 0.2, 0.2, 1.0];

    pub const MISS_WASH: Rgba = [1.0, 0.0, 0.0, 1.0];
    pub const MISS_FLASH: Rgba = [1.0, 0.31, 0.0, 1.0];
    pub const SUCCESS_WASH: Rgba = [0.0, 1.0, 0.0, 1.0];
    pub const SUCCESS_FLASH: Rgba = [0.2, 1.0, 0.2, 1.0];

    pub const LOADING_SHADE: Rgba = [0.0, 0.0, 0.0, 0.5];
    pub const LOADING_TEXT: Rgba = [1.0, 1.0, 1.0, 1.0];

    /// (wash, flash) colors for an effect kind
    pub fn palette(kind: EffectKind) -> (Rgba, Rgba) {
        match kind {
            EffectKind::Miss => (MISS_WASH, MISS_FLASH),
            EffectKind::Success => (SUCCESS_WASH, SUCCESS_FLASH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_rgba() {
        assert_eq!(css_rgba(colors::LABEL), "rgba(51, 51, 51, 1)");
        assert_eq!(css_rgba(with_alpha(colors::MISS_WASH, 0.35)), "rgba(255, 0, 0, 0.35)");
        assert_eq!(css_rgba([2.0, -1.0, 0.5, 3.0]), "rgba(255, 0, 128, 1)");
    }
}
