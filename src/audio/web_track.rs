//! Browser music track backed by an `HtmlAudioElement`

use std::time::Duration;

use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use super::{PlaybackRejected, Track};
use crate::error::FeedbackError;

pub struct WebTrack {
    element: HtmlAudioElement,
}

impl WebTrack {
    /// Create a looping audio element for `src` (loading starts immediately)
    pub fn new(src: &str) -> Result<Self, FeedbackError> {
        let element = HtmlAudioElement::new_with_src(src)
            .map_err(|e| FeedbackError::asset(src, format!("{:?}", e)))?;
        element.set_loop(true);
        element.set_preload("auto");
        Ok(Self { element })
    }

    /// The underlying element, for attaching load listeners
    pub fn element(&self) -> &HtmlAudioElement {
        &self.element
    }
}

impl Track for WebTrack {
    fn play(&mut self) -> Result<(), PlaybackRejected> {
        let promise = self
            .element
            .play()
            .map_err(|e| PlaybackRejected::new(format!("{:?}", e)))?;

        // Autoplay policy rejects asynchronously; the element just stays paused
        let src = self.element.src();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::debug!("Playback of {} rejected: {:?}", src, e);
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        let _ = self.element.pause();
    }

    fn rewind(&mut self) {
        self.element.set_current_time(0.0);
    }

    fn set_muted(&mut self, muted: bool) {
        self.element.set_muted(muted);
    }

    fn set_volume(&mut self, volume: f32) {
        self.element.set_volume(f64::from(volume));
    }

    fn volume(&self) -> f32 {
        self.element.volume() as f32
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn is_muted(&self) -> bool {
        self.element.muted()
    }

    fn position(&self) -> Duration {
        Duration::from_secs_f64(self.element.current_time().max(0.0))
    }
}
