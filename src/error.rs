//! Error kinds produced by the feedback core
//!
//! Neither kind is fatal. Assets that fail to load are replaced by placeholder
//! shapes and rejected playback leaves a channel silent; callers log and move on.

use thiserror::Error;

use crate::audio::ChannelId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    /// An image, video or audio asset could not be loaded
    #[error("asset unavailable: {path} ({reason})")]
    AssetUnavailable { path: String, reason: String },

    /// The platform refused to start playback (autoplay policy, missing device, ...)
    #[error("playback rejected on {channel:?}: {reason}")]
    PlaybackRejected { channel: ChannelId, reason: String },
}

impl FeedbackError {
    pub fn asset(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AssetUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn playback(channel: ChannelId, reason: impl Into<String>) -> Self {
        Self::PlaybackRejected {
            channel,
            reason: reason.into(),
        }
    }
}
