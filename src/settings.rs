//! Feedback settings and preferences
//!
//! Persisted in LocalStorage on the web; native builds use defaults or JSON.

use serde::{Deserialize, Serialize};

use crate::assets::AssetManifest;
use crate::consts::{ASSET_LOAD_TIMEOUT_MS, EFFECT_DURATION_MS, MUSIC_VOLUME, REDRAW_HZ};

/// Session settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Volume applied to every music channel (0.0 - 1.0)
    pub music_volume: f32,
    /// Music muted (remembered between sessions)
    pub muted: bool,

    // === Visual Effects ===
    /// Lifetime of hit/success feedback (milliseconds)
    pub effect_duration_ms: f64,
    /// Shake and wobble the actor on a miss
    pub screen_shake: bool,
    /// Periodic redraw rate while a session is open
    pub redraw_hz: u32,

    // === Loading ===
    /// Pending asset loads older than this are treated as failed (milliseconds)
    pub load_timeout_ms: f64,
    /// Static asset paths for the session
    pub manifest: AssetManifest,

    // === Accessibility ===
    /// Reduced motion (no shake or wobble, flashes still shown)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: MUSIC_VOLUME,
            muted: false,

            effect_duration_ms: EFFECT_DURATION_MS,
            screen_shake: true,
            redraw_hz: REDRAW_HZ,

            load_timeout_ms: ASSET_LOAD_TIMEOUT_MS,
            manifest: AssetManifest::default(),

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "skyward_feedback_settings";

    /// Effective shake (respects reduced_motion)
    pub fn effective_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Clamp values that came from storage into their valid ranges
    pub fn sanitized(mut self) -> Self {
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        if self.effect_duration_ms.is_nan() || self.effect_duration_ms <= 0.0 {
            self.effect_duration_ms = EFFECT_DURATION_MS;
        }
        if self.load_timeout_ms.is_nan() || self.load_timeout_ms <= 0.0 {
            self.load_timeout_ms = ASSET_LOAD_TIMEOUT_MS;
        }
        self
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tuning() {
        let s = Settings::default();
        assert_eq!(s.music_volume, 0.3);
        assert_eq!(s.effect_duration_ms, 600.0);
        assert!(!s.muted);
        assert!(s.effective_shake());
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let s = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!s.effective_shake());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{"muted": true, "music_volume": 4.0}"#).unwrap();
        assert!(s.muted);
        assert_eq!(s.music_volume, 1.0);
        assert_eq!(s.redraw_hz, 60);
        assert_eq!(s.manifest, AssetManifest::default());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Settings::from_json("{not json").is_err());
    }
}
