//! Error handling module for OverlayX

use thiserror::Error;

/// Main error type for OverlayX operations
#[derive(Error, Debug)]
pub enum OverlayError {
    /// Invalid time format
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// Media duration or channel probe failed or returned zero
    #[error("Unable to read media file: {path}: {message}")]
    MediaUnreadable { path: String, message: String },

    /// Start index lies at or beyond the end of the video
    #[error("Start index ({start_index:.3}s) is at or beyond the video duration ({video_duration:.3}s)")]
    StartIndexOutOfRange {
        start_index: f64,
        video_duration: f64,
    },

    /// Audio offset lies at or beyond the end of the audio
    #[error("Audio offset ({audio_offset:.3}s) is at or beyond the audio duration ({audio_duration:.3}s)")]
    AudioOffsetOutOfRange {
        audio_offset: f64,
        audio_duration: f64,
    },

    /// External transcoding engine returned a non-zero status
    #[error("Transcoding engine failed: {message}")]
    EngineInvocationFailed { message: String },

    /// Engine reported success but the output file does not exist
    #[error("Engine completed but produced no output file: {path}")]
    OutputNotProduced { path: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for OverlayX operations
pub type OverlayResult<T> = std::result::Result<T, OverlayError>;
