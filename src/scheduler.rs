//! Redraw scheduling
//!
//! Frames are drawn on a fixed interval (so time-decaying effects animate
//! without any state change) or immediately when something marked the
//! scene dirty.

#[derive(Debug, Clone)]
pub struct RedrawScheduler {
    interval_ms: f64,
    last_frame: Option<f64>,
    dirty: bool,
}

impl RedrawScheduler {
    /// Scheduler firing every `interval_ms`; the first poll always draws
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_frame: None,
            dirty: true,
        }
    }

    pub fn from_hz(hz: u32) -> Self {
        Self::new(1000.0 / hz.max(1) as f64)
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Force a redraw at the next poll
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a frame should be drawn at `now`
    pub fn poll(&self, now: f64) -> bool {
        match self.last_frame {
            _ if self.dirty => true,
            None => true,
            Some(last) => now - last >= self.interval_ms,
        }
    }

    /// Record that a frame was drawn at `now`
    pub fn rendered(&mut self, now: f64) {
        self.last_frame = Some(now);
        self.dirty = false;
    }
}
