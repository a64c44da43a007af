//! Asset readiness table
//!
//! Every asset a session uses (sprites, the background video, the four music
//! tracks) is one row keyed by [`AssetId`]. A row moves `Loading -> Ready` or
//! `Loading -> Failed` exactly once; failures are logged and drawn around,
//! never propagated.

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::audio::ChannelId;
use crate::error::FeedbackError;

/// Every asset a session can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetId {
    ActorSprite,
    ObstacleSprite,
    BackgroundVideo,
    Music(ChannelId),
}

impl AssetId {
    /// All assets in request order
    pub const ALL: [AssetId; 7] = [
        AssetId::ActorSprite,
        AssetId::ObstacleSprite,
        AssetId::BackgroundVideo,
        AssetId::Music(ChannelId::AmbientNormal),
        AssetId::Music(ChannelId::AmbientAlt),
        AssetId::Music(ChannelId::ActiveNormal),
        AssetId::Music(ChannelId::ActiveAlt),
    ];

    pub fn kind(&self) -> AssetKind {
        match self {
            AssetId::ActorSprite | AssetId::ObstacleSprite => AssetKind::Image,
            AssetId::BackgroundVideo => AssetKind::Video,
            AssetId::Music(_) => AssetKind::Audio,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
    Audio,
}

/// Static asset paths, resolved once per session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub actor_sprite: String,
    pub obstacle_sprite: String,
    pub background_video: String,
    pub ambient_normal: String,
    pub ambient_alt: String,
    pub active_normal: String,
    pub active_alt: String,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            actor_sprite: "/assets/game/airplane/airplane.png".into(),
            obstacle_sprite: "/assets/game/airplane/cloud.png".into(),
            background_video: "/assets/game/airplane/sky-bg.mp4".into(),
            ambient_normal: "/audio/interface_normalmode.mp3".into(),
            ambient_alt: "/audio/interface_nightmaremode.mp3".into(),
            active_normal: "/audio/normal-mode.mp3".into(),
            active_alt: "/audio/nighmare-mode.mp3".into(),
        }
    }
}

impl AssetManifest {
    pub fn path(&self, id: AssetId) -> &str {
        match id {
            AssetId::ActorSprite => &self.actor_sprite,
            AssetId::ObstacleSprite => &self.obstacle_sprite,
            AssetId::BackgroundVideo => &self.background_video,
            AssetId::Music(ChannelId::AmbientNormal) => &self.ambient_normal,
            AssetId::Music(ChannelId::AmbientAlt) => &self.ambient_alt,
            AssetId::Music(ChannelId::ActiveNormal) => &self.active_normal,
            AssetId::Music(ChannelId::ActiveAlt) => &self.active_alt,
        }
    }
}

/// Load state of one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetState {
    Loading,
    Ready,
    Failed,
}

impl AssetState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, AssetState::Loading)
    }
}

/// Ticket for one outstanding load.
///
/// Completions carry the handle back so results from a superseded request
/// (after [`AssetCache::reset`]) can be told apart and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessHandle {
    pub id: AssetId,
    generation: u32,
}

#[derive(Debug, Clone)]
struct AssetEntry {
    path: String,
    state: AssetState,
    generation: u32,
    requested_at: f64,
}

/// Readiness table for one session's assets
#[derive(Debug, Default)]
pub struct AssetCache {
    entries: HashMap<AssetId, AssetEntry>,
    generation: u32,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset as loading.
    ///
    /// Requesting an id that is already known returns the existing handle;
    /// assets are never re-requested within a session.
    pub fn request(&mut self, id: AssetId, path: &str, now: f64) -> ReadinessHandle {
        let generation = self.generation;
        let entry = self.entries.entry(id).or_insert_with(|| {
            log::debug!("Requesting {:?} from {}", id, path);
            AssetEntry {
                path: path.to_string(),
                state: AssetState::Loading,
                generation,
                requested_at: now,
            }
        });
        ReadinessHandle {
            id,
            generation: entry.generation,
        }
    }

    /// Request every asset named by the manifest
    pub fn request_manifest(&mut self, manifest: &AssetManifest, now: f64) -> Vec<ReadinessHandle> {
        AssetId::ALL
            .iter()
            .map(|&id| self.request(id, manifest.path(id), now))
            .collect()
    }

    /// Record the outcome of a load.
    ///
    /// Returns false when the completion was dropped: the handle is stale, the
    /// asset is unknown, or the entry already reached a terminal state.
    pub fn complete(&mut self, handle: ReadinessHandle, outcome: Result<(), FeedbackError>) -> bool {
        let Some(entry) = self.entries.get_mut(&handle.id) else {
            return false;
        };
        if entry.generation != handle.generation || entry.state.is_settled() {
            log::debug!("Dropping stale completion for {:?}", handle.id);
            return false;
        }

        entry.state = match outcome {
            Ok(()) => {
                log::debug!("{:?} ready", handle.id);
                AssetState::Ready
            }
            Err(e) => {
                log::warn!("{}", e);
                AssetState::Failed
            }
        };
        true
    }

    /// Fail every load still pending after `timeout_ms`.
    ///
    /// Returns the number of entries that were failed.
    pub fn expire_overdue(&mut self, now: f64, timeout_ms: f64) -> usize {
        let mut expired = 0;
        for (id, entry) in self.entries.iter_mut() {
            if entry.state == AssetState::Loading && now - entry.requested_at >= timeout_ms {
                log::warn!(
                    "{}",
                    FeedbackError::asset(entry.path.as_str(), format!("{:?} timed out", id))
                );
                entry.state = AssetState::Failed;
                expired += 1;
            }
        }
        expired
    }

    /// State of an asset, or None if it was never requested
    pub fn state(&self, id: AssetId) -> Option<AssetState> {
        self.entries.get(&id).map(|e| e.state)
    }

    /// Whether the asset can be drawn/played (false means use a fallback)
    pub fn is_ready(&self, id: AssetId) -> bool {
        self.state(id) == Some(AssetState::Ready)
    }

    pub fn path(&self, id: AssetId) -> Option<&str> {
        self.entries.get(&id).map(|e| e.path.as_str())
    }

    /// (settled, total) over requested assets
    pub fn progress(&self) -> (usize, usize) {
        let settled = self.entries.values().filter(|e| e.state.is_settled()).count();
        (settled, self.entries.len())
    }

    /// First-frame gate: every requested asset reached Ready or Failed
    pub fn all_settled(&self) -> bool {
        self.entries.values().all(|e| e.state.is_settled())
    }

    /// Forget every entry; outstanding handles become stale
    pub fn reset(&mut self) {
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(path: &str) -> Result<(), FeedbackError> {
        Err(FeedbackError::asset(path, "404"))
    }

    #[test]
    fn test_request_is_loading() {
        let mut cache = AssetCache::new();
        cache.request(AssetId::ActorSprite, "plane.png", 0.0);
        assert_eq!(cache.state(AssetId::ActorSprite), Some(AssetState::Loading));
        assert!(!cache.is_ready(AssetId::ActorSprite));
        assert!(!cache.all_settled());
        assert_eq!(cache.state(AssetId::ObstacleSprite), None);
    }

    #[test]
    fn test_terminal_state_happens_once() {
        let mut cache = AssetCache::new();
        let h = cache.request(AssetId::ObstacleSprite, "cloud.png", 0.0);
        assert!(cache.complete(h, failed("cloud.png")));
        assert_eq!(cache.state(AssetId::ObstacleSprite), Some(AssetState::Failed));

        // A late success must not revive a failed asset
        assert!(!cache.complete(h, Ok(())));
        assert_eq!(cache.state(AssetId::ObstacleSprite), Some(AssetState::Failed));
    }

    #[test]
    fn test_gate_waits_for_every_asset() {
        let mut cache = AssetCache::new();
        let handles = cache.request_manifest(&AssetManifest::default(), 0.0);
        assert_eq!(handles.len(), 7);
        assert_eq!(cache.progress(), (0, 7));

        for (i, h) in handles.iter().enumerate() {
            assert!(!cache.all_settled());
            let outcome = if i % 2 == 0 { Ok(()) } else { failed("x") };
            cache.complete(*h, outcome);
        }
        assert!(cache.all_settled());
        assert_eq!(cache.progress(), (7, 7));
    }

    #[test]
    fn test_rerequest_keeps_entry() {
        let mut cache = AssetCache::new();
        let h1 = cache.request(AssetId::ActorSprite, "a.png", 0.0);
        cache.complete(h1, Ok(()));
        let h2 = cache.request(AssetId::ActorSprite, "b.png", 5.0);
        assert_eq!(h1, h2);
        assert!(cache.is_ready(AssetId::ActorSprite));
        assert_eq!(cache.path(AssetId::ActorSprite), Some("a.png"));
    }

    #[test]
    fn test_stale_completion_after_reset() {
        let mut cache = AssetCache::new();
        let old = cache.request(AssetId::BackgroundVideo, "sky.mp4", 0.0);
        cache.reset();
        let new = cache.request(AssetId::BackgroundVideo, "sky.mp4", 1.0);

        assert!(!cache.complete(old, Ok(())));
        assert_eq!(cache.state(AssetId::BackgroundVideo), Some(AssetState::Loading));
        assert!(cache.complete(new, Ok(())));
        assert!(cache.is_ready(AssetId::BackgroundVideo));
    }

    #[test]
    fn test_overdue_loads_fail() {
        let mut cache = AssetCache::new();
        let h = cache.request(AssetId::ActorSprite, "a.png", 0.0);
        cache.request(AssetId::ObstacleSprite, "b.png", 500.0);
        cache.complete(h, Ok(()));

        assert_eq!(cache.expire_overdue(1000.0, 1000.0), 0);
        assert_eq!(cache.expire_overdue(1500.0, 1000.0), 1);
        assert_eq!(cache.state(AssetId::ObstacleSprite), Some(AssetState::Failed));
        assert!(cache.is_ready(AssetId::ActorSprite));
        assert!(cache.all_settled());
    }

    #[test]
    fn test_empty_cache_is_settled() {
        assert!(AssetCache::new().all_settled());
    }

    #[test]
    fn test_manifest_paths() {
        let m = AssetManifest::default();
        assert!(m.path(AssetId::ActorSprite).ends_with("airplane.png"));
        assert!(m.path(AssetId::Music(ChannelId::AmbientAlt)).contains("nightmare"));
        assert_eq!(AssetId::Music(ChannelId::ActiveNormal).kind(), AssetKind::Audio);
        assert_eq!(AssetId::BackgroundVideo.kind(), AssetKind::Video);
    }
}
