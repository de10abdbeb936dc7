//! Alignment strategy selection

use tracing::{debug, info};

use crate::error::{OverlayError, OverlayResult};
use crate::planner::{AlignmentPlan, AlignmentRequest, RespectLength, Strategy};
use crate::probe::MediaAsset;
use crate::utils::time::format_time;

/// Planner for determining the alignment strategy
pub struct AlignmentPlanner;

impl AlignmentPlanner {
    /// Create a new alignment planner
    pub fn new() -> Self {
        Self
    }

    /// Compute the alignment plan for a request against two probed assets
    pub fn plan(
        &self,
        request: &AlignmentRequest,
        video: &MediaAsset,
        audio: &MediaAsset,
    ) -> OverlayResult<AlignmentPlan> {
        let start_index = request.start_index.as_seconds();
        let audio_offset = request.audio_offset.as_seconds();

        info!("Planning alignment strategy for: {}", video.path);
        info!(
            "Start index: {}, audio offset: {}",
            format_time(start_index),
            format_time(audio_offset)
        );

        if start_index >= video.duration {
            return Err(OverlayError::StartIndexOutOfRange {
                start_index,
                video_duration: video.duration,
            });
        }
        if audio_offset >= audio.duration {
            return Err(OverlayError::AudioOffsetOutOfRange {
                audio_offset,
                audio_duration: audio.duration,
            });
        }

        // Audio available after skipping the offset
        let effective_audio_duration = audio.duration - audio_offset;
        // Video time remaining from the insertion point to video end
        let needed_duration = video.duration - start_index;
        // Where full-length audio would end if placed untrimmed
        let audio_end_time = start_index + effective_audio_duration;

        debug!(
            "Effective audio: {:.3}s, needed: {:.3}s, audio ends at: {:.3}s",
            effective_audio_duration, needed_duration, audio_end_time
        );

        let (strategy, output_duration, video_extend_duration) = match request.respect_length {
            RespectLength::Audio => {
                if audio_end_time > video.duration {
                    (
                        Strategy::AudioRespectExtend,
                        audio_end_time,
                        audio_end_time - video.duration,
                    )
                } else {
                    (Strategy::AudioRespectFit, audio_end_time, 0.0)
                }
            }
            RespectLength::Video => {
                if request.loop_audio {
                    (Strategy::VideoRespectLoop, video.duration, 0.0)
                } else {
                    (Strategy::VideoRespectPad, video.duration, 0.0)
                }
            }
        };

        let needs_video_extend = video_extend_duration > 0.0;

        // The engine wants one delay value per channel even when all
        // channels share the same delay.
        let delay_ms = request.start_index.as_millis();
        let per_channel_delay_ms = vec![delay_ms; audio.channels as usize];

        info!(
            "Selected strategy: {:?}, output duration: {:.3}s",
            strategy, output_duration
        );
        if needs_video_extend {
            info!(
                "Video will be extended by {:.3}s (last-frame hold)",
                video_extend_duration
            );
        }

        Ok(AlignmentPlan {
            strategy,
            output_duration,
            needs_video_extend,
            video_extend_duration,
            needed_duration,
            audio_offset,
            has_audio_offset: audio_offset > 0.0,
            per_channel_delay_ms,
        })
    }
}

impl Default for AlignmentPlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time::TimeSpec;

    fn asset(path: &str, duration: f64, channels: u32) -> MediaAsset {
        MediaAsset {
            path: path.to_string(),
            duration,
            channels,
        }
    }

    fn request(
        start_index: f64,
        audio_offset: f64,
        respect_length: RespectLength,
        loop_audio: bool,
    ) -> AlignmentRequest {
        AlignmentRequest {
            start_index: TimeSpec::from_seconds(start_index),
            audio_offset: TimeSpec::from_seconds(audio_offset),
            respect_length,
            loop_audio,
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }

    #[test]
    fn rejects_start_index_past_video_end() {
        let planner = AlignmentPlanner::new();
        let result = planner.plan(
            &request(200.0, 0.0, RespectLength::Video, false),
            &asset("video.mp4", 60.0, 2),
            &asset("audio.wav", 30.0, 2),
        );
        assert!(matches!(
            result,
            Err(OverlayError::StartIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_audio_offset_past_audio_end() {
        let planner = AlignmentPlanner::new();
        let result = planner.plan(
            &request(0.0, 40.0, RespectLength::Video, false),
            &asset("video.mp4", 60.0, 2),
            &asset("audio.wav", 30.0, 2),
        );
        assert!(matches!(
            result,
            Err(OverlayError::AudioOffsetOutOfRange { .. })
        ));
    }

    #[test]
    fn video_respect_pad_preserves_video_duration() {
        let planner = AlignmentPlanner::new();
        let plan = planner
            .plan(
                &request(0.0, 0.0, RespectLength::Video, false),
                &asset("video.mp4", 120.0, 2),
                &asset("audio.wav", 30.0, 2),
            )
            .unwrap();
        assert_eq!(plan.strategy, Strategy::VideoRespectPad);
        assert_eq!(plan.output_duration, 120.0);
        assert!(!plan.needs_video_extend);
    }

    #[test]
    fn audio_exactly_fills_remaining_video() {
        // video=120s, audio=30s, start=90s: the audio ends precisely at
        // the video end, so padding adds zero actual silence.
        let planner = AlignmentPlanner::new();
        let plan = planner
            .plan(
                &request(90.0, 0.0, RespectLength::Video, false),
                &asset("video.mp4", 120.0, 2),
                &asset("audio.wav", 30.0, 2),
            )
            .unwrap();
        assert_eq!(plan.strategy, Strategy::VideoRespectPad);
        assert_eq!(plan.needed_duration, 30.0);
        assert_eq!(plan.output_duration, 120.0);
        assert_eq!(plan.per_channel_delay_ms, vec![90_000, 90_000]);
    }

    #[test]
    fn loop_strategy_fills_video_duration() {
        let planner = AlignmentPlanner::new();
        let plan = planner
            .plan(
                &request(0.0, 0.0, RespectLength::Video, true),
                &asset("video.mp4", 60.0, 2),
                &asset("audio.wav", 10.0, 2),
            )
            .unwrap();
        assert_eq!(plan.strategy, Strategy::VideoRespectLoop);
        assert_eq!(plan.output_duration, 60.0);
        assert_eq!(plan.needed_duration, 60.0);
    }

    #[test]
    fn audio_respect_fit_when_audio_ends_within_video() {
        let planner = AlignmentPlanner::new();
        let plan = planner
            .plan(
                &request(5.0, 0.0, RespectLength::Audio, false),
                &asset("video.mp4", 60.0, 2),
                &asset("audio.wav", 20.0, 2),
            )
            .unwrap();
        assert_eq!(plan.strategy, Strategy::AudioRespectFit);
        assert_eq!(plan.output_duration, 25.0);
        assert!(!plan.needs_video_extend);
        assert_eq!(plan.video_extend_duration, 0.0);
    }

    #[test]
    fn audio_respect_extend_when_audio_outlasts_video() {
        // video=30s, audio=50s at index 0: extend the video by 20s.
        let planner = AlignmentPlanner::new();
        let plan = planner
            .plan(
                &request(0.0, 0.0, RespectLength::Audio, false),
                &asset("video.mp4", 30.0, 2),
                &asset("audio.wav", 50.0, 2),
            )
            .unwrap();
        assert_eq!(plan.strategy, Strategy::AudioRespectExtend);
        assert!(plan.needs_video_extend);
        assert_eq!(plan.video_extend_duration, 20.0);
        assert_eq!(plan.output_duration, 50.0);
    }

    #[test]
    fn audio_offset_shortens_effective_audio() {
        let planner = AlignmentPlanner::new();
        let plan = planner
            .plan(
                &request(0.0, 10.0, RespectLength::Audio, false),
                &asset("video.mp4", 60.0, 2),
                &asset("audio.wav", 50.0, 2),
            )
            .unwrap();
        assert_eq!(plan.strategy, Strategy::AudioRespectFit);
        assert_eq!(plan.output_duration, 40.0);
        assert!(plan.has_audio_offset);
        assert_eq!(plan.audio_offset, 10.0);
    }

    #[test]
    fn delay_list_matches_channel_count() {
        let planner = AlignmentPlanner::new();
        let plan = planner
            .plan(
                &request(1.5, 0.0, RespectLength::Video, false),
                &asset("video.mp4", 60.0, 2),
                &asset("audio.wav", 30.0, 6),
            )
            .unwrap();
        assert_eq!(plan.per_channel_delay_ms.len(), 6);
        assert!(plan.per_channel_delay_ms.iter().all(|&ms| ms == 1500));
    }

    #[test]
    fn zero_offset_elides_skip_stage() {
        let planner = AlignmentPlanner::new();
        let plan = planner
            .plan(
                &request(0.0, 0.0, RespectLength::Video, false),
                &asset("video.mp4", 60.0, 2),
                &asset("audio.wav", 30.0, 2),
            )
            .unwrap();
        assert!(!plan.has_audio_offset);
    }
}
