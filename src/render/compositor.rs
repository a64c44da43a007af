//! Effect compositor
//!
//! Draws one frame: background fallback, the tilted (and possibly shaking)
//! actor, labelled obstacles, then the miss/success washes and flashes.
//! Missing assets never abort a frame; they are replaced by flat shapes.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::colors;
use super::{Canvas, with_alpha};
use crate::actor_tilt;
use crate::assets::{AssetCache, AssetId};
use crate::consts::LABEL_BASELINE_OFFSET;
use crate::effects::{EffectKind, EffectSlots, FeedbackSample};
use crate::settings::Settings;
use crate::sim::{Actor, Obstacle, Rect};

/// Everything one frame depends on
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub actor: &'a Actor,
    pub obstacles: &'a [Obstacle],
    pub effects: &'a EffectSlots,
    /// Canvas size in pixels
    pub size: Vec2,
    /// Host clock (milliseconds)
    pub now: f64,
}

/// What a frame ended up drawing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Shapes drawn in place of unavailable assets
    pub placeholders: usize,
    /// Effects with a visible contribution
    pub effects: usize,
}

pub struct Compositor {
    rng: Pcg32,
    effect_duration_ms: f64,
    shake: bool,
}

impl Compositor {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            effect_duration_ms: settings.effect_duration_ms,
            shake: settings.effective_shake(),
        }
    }

    pub fn effect_duration_ms(&self) -> f64 {
        self.effect_duration_ms
    }

    /// Draw one frame
    pub fn render<C: Canvas>(&mut self, canvas: &mut C, assets: &AssetCache, frame: &FrameInput) -> FrameStats {
        let mut stats = FrameStats::default();
        let full = Rect::from_size(frame.size);

        canvas.clear(frame.size);
        if !assets.is_ready(AssetId::BackgroundVideo) {
            canvas.fill_rect(full, colors::SKY_FALLBACK);
            stats.placeholders += 1;
        }

        let samples = EffectKind::ALL.map(|kind| {
            frame
                .effects
                .get(kind)
                .map(|e| e.sample(frame.now, self.effect_duration_ms, frame.size))
                .unwrap_or(FeedbackSample::INERT)
        });
        let miss = samples[0];

        // --- Actor ---
        let (jitter, wobble) = if self.shake && miss.shake_amplitude > 0.0 {
            let amp = miss.shake_amplitude;
            let jitter = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * amp,
                (self.rng.random::<f32>() - 0.5) * amp,
            );
            (jitter, miss.wobble)
        } else {
            (Vec2::ZERO, 0.0)
        };

        let actor = frame.actor;
        canvas.save();
        canvas.translate(actor.center() + jitter);
        canvas.rotate(actor_tilt(actor.vy) + wobble);
        let local = Rect::new(-actor.size * 0.5, actor.size);
        if assets.is_ready(AssetId::ActorSprite) {
            canvas.draw_image(AssetId::ActorSprite, local);
        } else {
            canvas.fill_rect(local, colors::ACTOR_PLACEHOLDER);
            stats.placeholders += 1;
        }
        canvas.restore();

        // --- Obstacles ---
        let sprite_ready = assets.is_ready(AssetId::ObstacleSprite);
        for obstacle in frame.obstacles {
            let bounds = obstacle.bounds();
            if sprite_ready {
                canvas.draw_image(AssetId::ObstacleSprite, bounds);
            } else {
                canvas.fill_ellipse(bounds.center(), bounds.size * 0.5, colors::OBSTACLE_PLACEHOLDER);
                stats.placeholders += 1;
            }
            let label_at = bounds.center() + Vec2::new(0.0, LABEL_BASELINE_OFFSET);
            canvas.fill_text(&obstacle.label, label_at, colors::LABEL);
        }

        // --- Washes and flashes ---
        for (kind, sample) in EffectKind::ALL.into_iter().zip(samples) {
            let Some(effect) = frame.effects.get(kind) else {
                continue;
            };
            if sample.is_inert() {
                continue;
            }
            let (wash, flash) = colors::palette(kind);
            canvas.fill_rect(full, with_alpha(wash, sample.overlay_alpha));
            if sample.flash_radius > 0.0 {
                canvas.fill_circle(effect.origin, sample.flash_radius, with_alpha(flash, sample.flash_alpha));
            }
            stats.effects += 1;
        }

        stats
    }

    /// Shade the frame while assets are still loading
    pub fn render_loading<C: Canvas>(&self, canvas: &mut C, size: Vec2, progress: (usize, usize)) {
        canvas.clear(size);
        canvas.fill_rect(Rect::from_size(size), colors::LOADING_SHADE);
        let (settled, total) = progress;
        canvas.fill_text(
            &format!("Loading Assets... {}/{}", settled, total),
            size * 0.5,
            colors::LOADING_TEXT,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedbackError;
    use crate::render::{DisplayList, DrawCmd};

    const SIZE: Vec2 = Vec2::new(800.0, 500.0);

    fn cache(ready: bool) -> AssetCache {
        let mut cache = AssetCache::new();
        for id in [AssetId::ActorSprite, AssetId::ObstacleSprite, AssetId::BackgroundVideo] {
            let h = cache.request(id, "x", 0.0);
            let outcome = if ready { Ok(()) } else { Err(FeedbackError::asset("x", "404")) };
            cache.complete(h, outcome);
        }
        cache
    }

    fn obstacles() -> Vec<Obstacle> {
        vec![
            Obstacle::new(1, Vec2::new(300.0, 50.0), Vec2::new(140.0, 80.0), "kucing"),
            Obstacle::new(2, Vec2::new(500.0, 300.0), Vec2::new(140.0, 80.0), "anjing"),
        ]
    }

    fn compositor() -> Compositor {
        Compositor::new(7, &Settings::default())
    }

    fn draw(c: &mut Compositor, assets: &AssetCache, actor: &Actor, effects: &EffectSlots, now: f64) -> (DisplayList, FrameStats) {
        let mut list = DisplayList::new();
        let obstacles = obstacles();
        let frame = FrameInput {
            actor,
            obstacles: &obstacles,
            effects,
            size: SIZE,
            now,
        };
        let stats = c.render(&mut list, assets, &frame);
        (list, stats)
    }

    #[test]
    fn test_plain_frame_with_assets() {
        let assets = cache(true);
        let actor = Actor::default();
        let (list, stats) = draw(&mut compositor(), &assets, &actor, &EffectSlots::new(), 0.0);

        assert_eq!(list.commands()[0], DrawCmd::Clear(SIZE));
        assert_eq!(stats, FrameStats::default());
        let images = list.images();
        assert_eq!(images.len(), 3);
        assert_eq!(images[0].0, AssetId::ActorSprite);
        assert_eq!(images[0].1, Rect::new(-actor.size * 0.5, actor.size));
        assert_eq!(list.translations(), vec![actor.center()]);
        assert_eq!(list.rotations(), vec![0.0]);
        assert!(list.rects().is_empty());
    }

    #[test]
    fn test_failed_sprites_use_placeholders() {
        let assets = cache(false);
        let actor = Actor::default();
        let (list, stats) = draw(&mut compositor(), &assets, &actor, &EffectSlots::new(), 0.0);

        assert!(list.images().is_empty());
        let ellipses = list.ellipses();
        assert_eq!(ellipses.len(), 2);
        assert_eq!(ellipses[0], (Vec2::new(370.0, 90.0), Vec2::new(70.0, 40.0)));
        // Sky fallback + actor rectangle
        let rects = list.rects();
        assert_eq!(rects[0], (Rect::from_size(SIZE), colors::SKY_FALLBACK));
        assert_eq!(rects[1].1, colors::ACTOR_PLACEHOLDER);
        assert_eq!(stats.placeholders, 4);
        // Labels still drawn, nudged below centre
        assert_eq!(list.texts(), vec![("kucing", Vec2::new(370.0, 95.0)), ("anjing", Vec2::new(570.0, 345.0))]);
    }

    #[test]
    fn test_loading_assets_count_as_unavailable() {
        let mut assets = AssetCache::new();
        assets.request(AssetId::ObstacleSprite, "cloud.png", 0.0);
        let (list, _) = draw(&mut compositor(), &assets, &Actor::default(), &EffectSlots::new(), 0.0);
        assert_eq!(list.ellipses().len(), 2);
    }

    #[test]
    fn test_tilt_from_velocity() {
        let assets = cache(true);
        let mut actor = Actor::default();
        actor.vy = 10.0;
        let (list, _) = draw(&mut compositor(), &assets, &actor, &EffectSlots::new(), 0.0);
        assert!((list.rotations()[0] - 20f32.to_radians()).abs() < 1e-6);

        actor.vy = 20.0;
        let (list, _) = draw(&mut compositor(), &assets, &actor, &EffectSlots::new(), 0.0);
        assert!((list.rotations()[0] - 25f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_fresh_miss_overlay() {
        let assets = cache(true);
        let actor = Actor::default();
        let mut effects = EffectSlots::new();
        effects.spawn(EffectKind::Miss, Vec2::new(100.0, 100.0), 1000.0);

        let (list, stats) = draw(&mut compositor(), &assets, &actor, &effects, 1000.0);
        assert_eq!(stats.effects, 1);
        let rects = list.rects();
        assert_eq!(rects.len(), 1);
        assert!((rects[0].1[3] - 0.35).abs() < 1e-6);
        assert_eq!(rects[0].1[0], 1.0);
        // Zero radius at the start: no circle yet
        assert!(list.circles().is_empty());
        // Shake jitter stays within half the amplitude
        let t = list.translations()[0] - actor.center();
        assert!(t.x.abs() <= 3.0 && t.y.abs() <= 3.0);
    }

    #[test]
    fn test_decaying_success_flash() {
        let assets = cache(true);
        let actor = Actor::default();
        let mut effects = EffectSlots::new();
        let origin = Vec2::new(400.0, 250.0);
        effects.spawn(EffectKind::Success, origin, 0.0);

        let (list, _) = draw(&mut compositor(), &assets, &actor, &effects, 300.0);
        let circles = list.circles();
        assert_eq!(circles.len(), 1);
        assert_eq!(circles[0].0, origin);
        assert!((circles[0].1 - 48.0).abs() < 1e-3);
        assert!((circles[0].2[3] - 0.45).abs() < 1e-5);
        assert_eq!(circles[0].2[1], 1.0);
        // Success never moves the actor
        assert_eq!(list.translations(), vec![actor.center()]);
        assert_eq!(list.rotations(), vec![0.0]);
    }

    #[test]
    fn test_expired_effects_draw_nothing() {
        let assets = cache(true);
        let actor = Actor::default();
        let mut effects = EffectSlots::new();
        effects.spawn(EffectKind::Miss, Vec2::ZERO, 0.0);
        effects.spawn(EffectKind::Success, Vec2::ZERO, 0.0);

        let (list, stats) = draw(&mut compositor(), &assets, &actor, &effects, 600.0);
        assert_eq!(stats.effects, 0);
        assert!(list.rects().is_empty());
        assert!(list.circles().is_empty());
        assert_eq!(list.translations(), vec![actor.center()]);
        assert_eq!(list.rotations(), vec![0.0]);
        // The compositor leaves cleanup to the owner
        assert_eq!(effects.iter().count(), 2);
    }

    #[test]
    fn test_reduced_motion_keeps_flash_but_not_shake() {
        let assets = cache(true);
        let actor = Actor::default();
        let mut effects = EffectSlots::new();
        effects.spawn(EffectKind::Miss, Vec2::new(50.0, 50.0), 0.0);
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let mut c = Compositor::new(1, &settings);

        let (list, stats) = draw(&mut c, &assets, &actor, &effects, 100.0);
        assert_eq!(stats.effects, 1);
        assert_eq!(list.translations(), vec![actor.center()]);
        assert_eq!(list.rotations(), vec![0.0]);
        assert_eq!(list.circles().len(), 1);
    }

    #[test]
    fn test_same_seed_same_shake() {
        let assets = cache(true);
        let actor = Actor::default();
        let mut effects = EffectSlots::new();
        effects.spawn(EffectKind::Miss, Vec2::ZERO, 0.0);

        let (a, _) = draw(&mut compositor(), &assets, &actor, &effects, 50.0);
        let (b, _) = draw(&mut compositor(), &assets, &actor, &effects, 50.0);
        assert_eq!(a.translations(), b.translations());
    }

    #[test]
    fn test_loading_screen() {
        let c = compositor();
        let mut list = DisplayList::new();
        c.render_loading(&mut list, SIZE, (2, 7));
        assert_eq!(list.rects(), vec![(Rect::from_size(SIZE), colors::LOADING_SHADE)]);
        assert_eq!(list.texts(), vec![("Loading Assets... 2/7", SIZE * 0.5)]);
    }
}
