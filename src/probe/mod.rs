//! Media file probing module
//!
//! Wraps `ffprobe` to report the two facts the planner needs about an
//! asset: total duration and audio channel count.

use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{OverlayError, OverlayResult};

/// Channel count assumed when the probe cannot report one
pub const DEFAULT_CHANNEL_COUNT: u32 = 2;

/// Probed media asset information
#[derive(Debug, Clone, Serialize)]
pub struct MediaAsset {
    /// File path
    pub path: String,
    /// Total duration in seconds
    pub duration: f64,
    /// Number of audio channels (>= 1)
    pub channels: u32,
}

/// Port for media file probing
pub trait MediaProbe {
    /// Probe a media file, returning its duration and channel count.
    /// A duration of zero or an unreadable file is a fatal condition.
    fn probe(&self, path: &str) -> OverlayResult<MediaAsset>;
}

/// ffprobe-based probe implementation
pub struct FfprobeProbe;

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    channels: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
    streams: Option<Vec<FfprobeStream>>,
}

impl FfprobeProbe {
    /// Create a new ffprobe-based probe
    pub fn new() -> Self {
        Self
    }

    fn run_ffprobe(&self, path: &str, args: &[&str]) -> OverlayResult<FfprobeOutput> {
        let output = Command::new("ffprobe")
            .args(args)
            .arg(path)
            .output()
            .map_err(|e| OverlayError::MediaUnreadable {
                path: path.to_string(),
                message: format!("failed to run ffprobe: {}", e),
            })?;

        if !output.status.success() {
            return Err(OverlayError::MediaUnreadable {
                path: path.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| OverlayError::MediaUnreadable {
            path: path.to_string(),
            message: format!("unparseable ffprobe output: {}", e),
        })
    }

    fn probe_duration(&self, path: &str) -> OverlayResult<f64> {
        let probed = self.run_ffprobe(
            path,
            &[
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "json",
            ],
        )?;

        let duration = probed
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0);

        if duration <= 0.0 {
            return Err(OverlayError::MediaUnreadable {
                path: path.to_string(),
                message: "media duration is zero or unknown".to_string(),
            });
        }

        Ok(duration)
    }

    fn probe_channels(&self, path: &str) -> u32 {
        let probed = self.run_ffprobe(
            path,
            &[
                "-v",
                "error",
                "-select_streams",
                "a:0",
                "-show_entries",
                "stream=channels",
                "-of",
                "json",
            ],
        );

        match probed {
            Ok(out) => out
                .streams
                .and_then(|s| s.into_iter().next())
                .and_then(|s| s.channels)
                .filter(|&c| c >= 1)
                .unwrap_or_else(|| {
                    warn!(
                        "Channel count unavailable for {}, assuming {}",
                        path, DEFAULT_CHANNEL_COUNT
                    );
                    DEFAULT_CHANNEL_COUNT
                }),
            Err(_) => {
                warn!(
                    "Channel probe failed for {}, assuming {}",
                    path, DEFAULT_CHANNEL_COUNT
                );
                DEFAULT_CHANNEL_COUNT
            }
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaProbe for FfprobeProbe {
    fn probe(&self, path: &str) -> OverlayResult<MediaAsset> {
        let duration = self.probe_duration(path)?;
        let channels = self.probe_channels(path);

        debug!(
            "Probed {}: duration {:.3}s, {} channels",
            path, duration, channels
        );

        Ok(MediaAsset {
            path: path.to_string(),
            duration,
            channels,
        })
    }
}
