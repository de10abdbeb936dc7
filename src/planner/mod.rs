//! Alignment planning module
//!
//! Decides how an audio track is merged into a video's timeline and which
//! processing strategy satisfies the duration-preservation contract.

use serde::Serialize;

use crate::utils::time::TimeSpec;

pub mod strategy;

pub use strategy::AlignmentPlanner;

/// Which input's natural duration the output must preserve exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RespectLength {
    /// Output duration equals the video duration (pad or truncate audio)
    Video,
    /// Output duration follows the audio (extend video if needed)
    Audio,
}

/// Alignment strategy
///
/// The single source of truth for which filter stages and engine flags
/// apply; FilterGraphBuilder and CommandEmitter match exhaustively on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strategy {
    /// Audio outlasts the video; clone the last frame to extend it
    AudioRespectExtend,
    /// Audio fits within the video; stream-copy video, truncate output
    AudioRespectFit,
    /// Repeat the audio to fill the video duration
    VideoRespectLoop,
    /// Pad the audio with silence to the video duration
    VideoRespectPad,
}

/// User intent for a single overlay run
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentRequest {
    /// Video time at which the audio begins
    pub start_index: TimeSpec,
    /// Offset into the audio source to skip before overlaying
    pub audio_offset: TimeSpec,
    /// Duration-preservation mode
    pub respect_length: RespectLength,
    /// Loop the audio to fill the video (respect_length=Video only)
    pub loop_audio: bool,
    /// Output audio codec
    pub audio_codec: String,
    /// Output audio bitrate
    pub audio_bitrate: String,
}

/// The computed alignment decision
///
/// Derived deterministically from an AlignmentRequest plus the two probed
/// assets; never mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentPlan {
    /// Selected strategy
    pub strategy: Strategy,
    /// Duration of the produced output in seconds
    pub output_duration: f64,
    /// Whether the video timeline must be extended
    pub needs_video_extend: bool,
    /// Length of the last-frame hold in seconds
    pub video_extend_duration: f64,
    /// Video time remaining from the insertion point to video end
    pub needed_duration: f64,
    /// Offset into the audio source in seconds
    pub audio_offset: f64,
    /// Whether a leading skip stage is required
    pub has_audio_offset: bool,
    /// One delay value per audio channel, in milliseconds
    pub per_channel_delay_ms: Vec<u64>,
}
