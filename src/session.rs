//! Game session controller
//!
//! Owns everything one playable session needs (asset table, effect slots,
//! compositor, music coordinator, redraw clock) and wires host events into
//! them. The host supplies the clock and the drawing surface.

use glam::Vec2;

use crate::assets::{AssetCache, ReadinessHandle};
use crate::audio::{AudioCoordinator, ChannelId, Mode, Screen, Track};
use crate::effects::{EffectKind, EffectSlots, TimedEffect};
use crate::error::FeedbackError;
use crate::render::{Canvas, Compositor, FrameInput, FrameStats};
use crate::scheduler::RedrawScheduler;
use crate::settings::Settings;
use crate::sim::{Actor, Obstacle};

/// Result of a [`GameSession::frame`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Assets still pending; a loading shade was drawn
    Loading,
    /// Nothing changed and the redraw interval has not elapsed
    Skipped,
    /// A full frame was drawn
    Drawn(FrameStats),
}

pub struct GameSession<T: Track> {
    settings: Settings,
    assets: AssetCache,
    audio: AudioCoordinator<T>,
    compositor: Compositor,
    effects: EffectSlots,
    actor: Actor,
    obstacles: Vec<Obstacle>,
    size: Vec2,
    scheduler: RedrawScheduler,
    first_frame: bool,
}

impl<T: Track> GameSession<T> {
    /// New session; `tracks` are the four music tracks in [`ChannelId::ALL`] order
    pub fn new(settings: Settings, seed: u64, canvas_size: Vec2, tracks: [T; 4]) -> Self {
        let settings = settings.sanitized();
        let audio = AudioCoordinator::from_tracks(tracks, settings.music_volume, settings.muted);
        let compositor = Compositor::new(seed, &settings);
        let scheduler = RedrawScheduler::from_hz(settings.redraw_hz);
        log::info!("Session created ({}x{}, seed {})", canvas_size.x, canvas_size.y, seed);

        Self {
            settings,
            assets: AssetCache::new(),
            audio,
            compositor,
            effects: EffectSlots::new(),
            actor: Actor::default(),
            obstacles: Vec::new(),
            size: canvas_size,
            scheduler,
            first_frame: true,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // --- Assets ---

    /// Register every manifest asset as loading; the host starts the loads
    pub fn request_assets(&mut self, now: f64) -> Vec<ReadinessHandle> {
        self.assets.request_manifest(&self.settings.manifest, now)
    }

    /// Report a finished load. Returns false if the completion was stale.
    pub fn asset_loaded(&mut self, handle: ReadinessHandle, outcome: Result<(), FeedbackError>) -> bool {
        let applied = self.assets.complete(handle, outcome);
        if applied {
            self.scheduler.mark_dirty();
        }
        applied
    }

    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    // --- Scene ---

    pub fn set_actor(&mut self, actor: Actor) {
        self.actor = actor;
        self.scheduler.mark_dirty();
    }

    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
        self.scheduler.mark_dirty();
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn effects(&self) -> &EffectSlots {
        &self.effects
    }

    /// Start a feedback effect at `origin`, replacing one of the same kind
    pub fn trigger(&mut self, kind: EffectKind, origin: Vec2, now: f64) -> TimedEffect {
        log::debug!("{:?} at {:?}", kind, origin);
        self.scheduler.mark_dirty();
        self.effects.spawn(kind, origin, now)
    }

    pub fn resize(&mut self, size: Vec2) {
        if size != self.size {
            self.size = size;
            self.scheduler.mark_dirty();
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    // --- Audio ---

    pub fn set_screen(&mut self, screen: Screen) {
        self.audio.set_screen(screen);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.audio.set_mode(mode);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
        self.settings.muted = muted;
    }

    /// Flip mute; returns the new flag (the host persists it)
    pub fn toggle_muted(&mut self) -> bool {
        let muted = self.audio.toggle_muted();
        self.settings.muted = muted;
        muted
    }

    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.audio.set_volume(volume);
        self.settings.music_volume = volume;
    }

    pub fn audio(&self) -> &AudioCoordinator<T> {
        &self.audio
    }

    // --- Frame ---

    /// Advance housekeeping and draw if the scheduler asks for a frame
    pub fn frame<C: Canvas>(&mut self, canvas: &mut C, now: f64) -> FrameOutcome {
        if self.assets.expire_overdue(now, self.settings.load_timeout_ms) > 0 {
            self.scheduler.mark_dirty();
        }
        // One more frame once an effect ends so its last overlay is erased
        if self.effects.prune(now, self.compositor.effect_duration_ms()) {
            self.scheduler.mark_dirty();
        }

        if !self.scheduler.poll(now) {
            return FrameOutcome::Skipped;
        }

        if !self.assets.all_settled() {
            self.compositor.render_loading(canvas, self.size, self.assets.progress());
            self.scheduler.rendered(now);
            return FrameOutcome::Loading;
        }

        if self.first_frame {
            let (settled, total) = self.assets.progress();
            log::info!("Assets settled ({}/{}), drawing first frame", settled, total);
            self.first_frame = false;
        }

        let frame = FrameInput {
            actor: &self.actor,
            obstacles: &self.obstacles,
            effects: &self.effects,
            size: self.size,
            now,
        };
        let stats = self.compositor.render(canvas, &self.assets, &frame);
        self.scheduler.rendered(now);
        FrameOutcome::Drawn(stats)
    }

    /// Stop all music and drop pending effects
    pub fn close(&mut self) {
        self.audio.shutdown();
        self.effects = EffectSlots::new();
        log::info!("Session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetId;
    use crate::audio::{SimClock, SimTrack};
    use crate::render::DisplayList;

    const SIZE: Vec2 = Vec2::new(800.0, 500.0);

    fn session(settings: Settings) -> (GameSession<SimTrack>, SimClock) {
        let clock = SimClock::new();
        let tracks = ChannelId::ALL.map(|_| SimTrack::new(&clock));
        let session = GameSession::new(settings, 42, SIZE, tracks);
        (session, clock)
    }

    #[test]
    fn test_first_frame_waits_for_assets() {
        let (mut s, _) = session(Settings::default());
        let mut canvas = DisplayList::new();
        let handles = s.request_assets(0.0);
        assert_eq!(handles.len(), AssetId::ALL.len());

        assert_eq!(s.frame(&mut canvas, 0.0), FrameOutcome::Loading);
        assert_eq!(canvas.texts()[0].0, "Loading Assets... 0/7");

        for (i, h) in handles.into_iter().enumerate() {
            let outcome = if i == 1 { Err(FeedbackError::asset("cloud.png", "404")) } else { Ok(()) };
            assert!(s.asset_loaded(h, outcome));
        }
        // Completions mark the scene dirty, so the next poll draws
        match s.frame(&mut canvas, 1.0) {
            FrameOutcome::Drawn(stats) => assert_eq!(stats.placeholders, 0),
            other => panic!("expected a frame, got {:?}", other),
        }
    }

    #[test]
    fn test_overdue_assets_open_the_gate() {
        let (mut s, _) = session(Settings::default());
        let mut canvas = DisplayList::new();
        s.request_assets(0.0);
        s.set_obstacles(vec![Obstacle::new(1, Vec2::new(300.0, 100.0), Vec2::new(140.0, 80.0), "satu")]);

        assert_eq!(s.frame(&mut canvas, 100.0), FrameOutcome::Loading);
        let outcome = s.frame(&mut canvas, 10_000.0);
        let FrameOutcome::Drawn(stats) = outcome else {
            panic!("expected a frame, got {:?}", outcome);
        };
        // Sky, actor and one obstacle drawn as placeholders
        assert_eq!(stats.placeholders, 3);
        assert_eq!(canvas.ellipses().len(), 1);
        assert!(s.assets().all_settled());
    }

    #[test]
    fn test_redraws_on_interval_without_changes() {
        let (mut s, _) = session(Settings::default());
        let mut canvas = DisplayList::new();

        assert!(matches!(s.frame(&mut canvas, 0.0), FrameOutcome::Drawn(_)));
        assert_eq!(s.frame(&mut canvas, 10.0), FrameOutcome::Skipped);
        assert!(matches!(s.frame(&mut canvas, 17.0), FrameOutcome::Drawn(_)));
        assert_eq!(canvas.frames(), 2);
    }

    #[test]
    fn test_expired_effects_are_pruned_with_final_redraw() {
        let (mut s, _) = session(Settings::default());
        let mut canvas = DisplayList::new();
        s.trigger(EffectKind::Miss, Vec2::new(140.0, 225.0), 0.0);

        let FrameOutcome::Drawn(stats) = s.frame(&mut canvas, 0.0) else {
            panic!("expected a frame");
        };
        assert_eq!(stats.effects, 1);
        assert_eq!(s.frame(&mut canvas, 5.0), FrameOutcome::Skipped);

        // Expired between polls: pruned, and a clean frame goes out at once
        let FrameOutcome::Drawn(stats) = s.frame(&mut canvas, 600.0) else {
            panic!("expected a frame");
        };
        assert_eq!(stats.effects, 0);
        assert!(s.effects().is_empty());
        // Only the sky and actor placeholders remain, no wash
        assert_eq!(canvas.rects().len(), 2);
        assert!(canvas.circles().is_empty());
    }

    #[test]
    fn test_trigger_replaces_same_kind() {
        let (mut s, _) = session(Settings::default());
        s.trigger(EffectKind::Success, Vec2::new(1.0, 1.0), 0.0);
        s.trigger(EffectKind::Success, Vec2::new(9.0, 9.0), 50.0);
        assert_eq!(s.effects().iter().count(), 1);
        assert_eq!(s.effects().get(EffectKind::Success).map(|e| e.origin), Some(Vec2::new(9.0, 9.0)));
    }

    #[test]
    fn test_mute_updates_settings() {
        let (mut s, clock) = session(Settings::default());
        s.set_screen(Screen::Menu);
        assert!(s.audio().channel_status(ChannelId::AmbientNormal).playing);

        clock.advance(std::time::Duration::from_secs(2));
        assert!(s.toggle_muted());
        assert!(s.settings().muted);
        let status = s.audio().channel_status(ChannelId::AmbientNormal);
        assert!(status.playing && status.muted);

        assert!(!s.toggle_muted());
        assert!(!s.settings().muted);
        assert_eq!(s.audio().playing_count(), 1);
    }

    #[test]
    fn test_muted_settings_start_silent() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let (mut s, _) = session(settings);
        s.set_screen(Screen::Playing);
        assert_eq!(s.audio().playing_count(), 0);
        s.set_muted(false);
        assert!(s.audio().channel_status(ChannelId::ActiveNormal).playing);
    }

    #[test]
    fn test_close_stops_everything() {
        let (mut s, _) = session(Settings::default());
        s.set_screen(Screen::Playing);
        s.set_mode(Mode::Alternate);
        s.trigger(EffectKind::Miss, Vec2::ZERO, 0.0);
        s.close();
        assert_eq!(s.audio().playing_count(), 0);
        assert_eq!(s.audio().screen(), None);
        assert!(s.effects().is_empty());
    }

    #[test]
    fn test_volume_is_clamped_and_kept() {
        let (mut s, _) = session(Settings::default());
        s.set_volume(3.0);
        assert_eq!(s.settings().music_volume, 1.0);
        assert!(s.audio().statuses().iter().all(|st| st.volume == 1.0));
    }
}
