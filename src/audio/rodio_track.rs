//! Native music track played through rodio (feature `native-audio`)

use std::io::Cursor;
use std::path::Path;
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::{PlaybackRejected, Track};
use crate::error::FeedbackError;

/// Default audio output device; keep it alive for as long as tracks play
pub struct RodioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioOutput {
    pub fn try_default() -> Result<Self, FeedbackError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| FeedbackError::asset("default output device", e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

/// Looping track decoded from an in-memory file.
///
/// rodio sinks cannot seek, so rewinding swaps in a fresh sink.
pub struct RodioTrack {
    handle: OutputStreamHandle,
    bytes: Vec<u8>,
    sink: Option<Sink>,
    muted: bool,
    volume: f32,
    /// Position accumulated up to the last pause
    offset: Duration,
    /// Set while playing
    resumed_at: Option<Instant>,
}

impl RodioTrack {
    /// Read and validate a track; decoding errors surface here, not at play time
    pub fn load<P: AsRef<Path>>(output: &RodioOutput, path: P) -> Result<Self, FeedbackError> {
        let display = path.as_ref().display().to_string();
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| FeedbackError::asset(display.as_str(), e.to_string()))?;
        Decoder::new(Cursor::new(bytes.clone()))
            .map_err(|e| FeedbackError::asset(display.as_str(), e.to_string()))?;

        Ok(Self {
            handle: output.handle.clone(),
            bytes,
            sink: None,
            muted: false,
            volume: 1.0,
            offset: Duration::ZERO,
            resumed_at: None,
        })
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// New paused sink positioned at the start of the track
    fn fresh_sink(&self) -> Result<Sink, PlaybackRejected> {
        let sink = Sink::try_new(&self.handle).map_err(|e| PlaybackRejected::new(e.to_string()))?;
        let source = Decoder::new(Cursor::new(self.bytes.clone()))
            .map_err(|e| PlaybackRejected::new(e.to_string()))?
            .repeat_infinite();
        sink.pause();
        sink.append(source);
        sink.set_volume(self.effective_volume());
        Ok(sink)
    }
}

impl Track for RodioTrack {
    fn play(&mut self) -> Result<(), PlaybackRejected> {
        if self.resumed_at.is_some() {
            return Ok(());
        }
        if self.sink.is_none() {
            self.sink = Some(self.fresh_sink()?);
        }
        if let Some(sink) = &self.sink {
            sink.play();
        }
        self.resumed_at = Some(Instant::now());
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        if let Some(t) = self.resumed_at.take() {
            self.offset += t.elapsed();
        }
    }

    fn rewind(&mut self) {
        // Dropping a sink stops it
        self.sink = None;
        self.offset = Duration::ZERO;
        if self.resumed_at.is_some() {
            match self.fresh_sink() {
                Ok(sink) => {
                    sink.play();
                    self.sink = Some(sink);
                    self.resumed_at = Some(Instant::now());
                }
                Err(e) => {
                    log::debug!("Restart after rewind failed: {}", e);
                    self.resumed_at = None;
                }
            }
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(sink) = &self.sink {
            sink.set_volume(self.effective_volume());
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(self.effective_volume());
        }
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn is_paused(&self) -> bool {
        self.resumed_at.is_none()
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn position(&self) -> Duration {
        self.offset + self.resumed_at.map(|t| t.elapsed()).unwrap_or_default()
    }
}
