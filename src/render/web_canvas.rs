//! Browser canvas 2D backend

use std::collections::HashMap;
use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Canvas, Rgba, css_rgba};
use crate::assets::AssetId;
use crate::consts::LABEL_FONT;
use crate::sim::Rect;

pub struct WebCanvas {
    ctx: CanvasRenderingContext2d,
    images: HashMap<AssetId, HtmlImageElement>,
}

impl WebCanvas {
    /// Wrap the 2D context of `canvas`; None if the browser refuses one
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            images: HashMap::new(),
        })
    }

    /// Register the element an image asset is loading into
    pub fn insert_image(&mut self, id: AssetId, image: HtmlImageElement) {
        self.images.insert(id, image);
    }

    fn set_fill(&self, color: Rgba) {
        self.ctx.set_fill_style_str(&css_rgba(color));
    }
}

impl Canvas for WebCanvas {
    fn clear(&mut self, size: Vec2) {
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = self.ctx.translate(offset.x as f64, offset.y as f64);
    }

    fn rotate(&mut self, radians: f32) {
        let _ = self.ctx.rotate(radians as f64);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.set_fill(color);
        self.ctx.fill_rect(
            rect.pos.x as f64,
            rect.pos.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Rgba) {
        if radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        self.set_fill(color);
        self.ctx.begin_path();
        let _ = self.ctx.ellipse(
            center.x as f64,
            center.y as f64,
            radii.x as f64,
            radii.y as f64,
            0.0,
            0.0,
            TAU,
        );
        self.ctx.fill();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        self.set_fill(color);
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn draw_image(&mut self, asset: AssetId, rect: Rect) {
        let Some(image) = self.images.get(&asset) else {
            log::debug!("No element registered for {:?}", asset);
            return;
        };
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            rect.pos.x as f64,
            rect.pos.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn fill_text(&mut self, text: &str, center: Vec2, color: Rgba) {
        self.set_fill(color);
        self.ctx.set_font(LABEL_FONT);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let _ = self.ctx.fill_text(text, center.x as f64, center.y as f64);
    }
}
