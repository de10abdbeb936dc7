//! Filter graph construction module
//!
//! Translates an AlignmentPlan into an ordered set of typed filter
//! stages. Dry-run rendering and real invocation share this one
//! representation so they cannot diverge.

use serde::Serialize;

use crate::planner::{AlignmentPlan, Strategy};

/// Label of the terminal audio output
pub const AUDIO_LABEL: &str = "aout";
/// Label of the terminal video output
pub const VIDEO_LABEL: &str = "vout";

/// A single audio filter stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AudioStage {
    /// Skip the leading portion of the audio source
    TrimFromOffset { start: f64 },
    /// Reset timestamps after a trim so downstream stages start at zero
    ResetTimestamps,
    /// Insert leading silence, one delay value per channel
    Delay { per_channel_ms: Vec<u64> },
    /// Pad the stream with silence indefinitely
    Pad,
    /// Cut the stream at an absolute duration
    TrimToDuration { end: f64 },
}

/// A single video filter stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VideoStage {
    /// Hold the last frame for the given duration
    CloneLastFrame { stop_duration: f64 },
}

/// Ordered filter stages with exactly one terminal audio label and,
/// conditionally, one terminal video label
#[derive(Debug, Clone, Serialize)]
pub struct FilterGraph {
    pub audio_stages: Vec<AudioStage>,
    pub video_stage: Option<VideoStage>,
}

impl AudioStage {
    fn render(&self) -> String {
        match self {
            AudioStage::TrimFromOffset { start } => format!("atrim=start={}", start),
            AudioStage::ResetTimestamps => "asetpts=PTS-STARTPTS".to_string(),
            AudioStage::Delay { per_channel_ms } => {
                let delays: Vec<String> =
                    per_channel_ms.iter().map(|ms| ms.to_string()).collect();
                format!("adelay={}", delays.join("|"))
            }
            AudioStage::Pad => "apad".to_string(),
            AudioStage::TrimToDuration { end } => format!("atrim=end={}", end),
        }
    }
}

impl VideoStage {
    fn render(&self) -> String {
        match self {
            VideoStage::CloneLastFrame { stop_duration } => {
                format!("tpad=stop_mode=clone:stop_duration={}", stop_duration)
            }
        }
    }
}

impl FilterGraph {
    /// Render the graph as an ffmpeg filter_complex expression.
    ///
    /// The audio chain reads from input 1 and ends at [aout]; the video
    /// chain, present only when the timeline is extended, reads from
    /// input 0 and ends at [vout].
    pub fn render(&self) -> String {
        let audio_chain: Vec<String> = self.audio_stages.iter().map(|s| s.render()).collect();
        let mut graph = format!("[1:a]{}[{}]", audio_chain.join(","), AUDIO_LABEL);

        if let Some(video_stage) = &self.video_stage {
            graph.push_str(&format!(";[0:v]{}[{}]", video_stage.render(), VIDEO_LABEL));
        }

        graph
    }

    /// Whether the graph carries a terminal video label
    pub fn has_video_output(&self) -> bool {
        self.video_stage.is_some()
    }
}

/// Builder translating a plan into a filter graph
pub struct FilterGraphBuilder;

impl FilterGraphBuilder {
    /// Create a new filter graph builder
    pub fn new() -> Self {
        Self
    }

    /// Build the filter graph for an alignment plan
    pub fn build(&self, plan: &AlignmentPlan) -> FilterGraph {
        let mut audio_stages = Vec::new();

        // Under the loop strategy the offset is consumed by an
        // input-level seek, so no skip stage is inserted here.
        if plan.has_audio_offset && plan.strategy != Strategy::VideoRespectLoop {
            audio_stages.push(AudioStage::TrimFromOffset {
                start: plan.audio_offset,
            });
            audio_stages.push(AudioStage::ResetTimestamps);
        }

        match plan.strategy {
            Strategy::AudioRespectFit | Strategy::AudioRespectExtend => {
                // Output truncation is handled by the emitter's -t flag
                audio_stages.push(AudioStage::Delay {
                    per_channel_ms: plan.per_channel_delay_ms.clone(),
                });
            }
            Strategy::VideoRespectPad => {
                audio_stages.push(AudioStage::Delay {
                    per_channel_ms: plan.per_channel_delay_ms.clone(),
                });
                audio_stages.push(AudioStage::Pad);
                audio_stages.push(AudioStage::TrimToDuration {
                    end: plan.output_duration,
                });
            }
            Strategy::VideoRespectLoop => {
                // The looped source is cut to the remaining video time
                // first, then shifted to the insertion point.
                audio_stages.push(AudioStage::TrimToDuration {
                    end: plan.needed_duration,
                });
                audio_stages.push(AudioStage::ResetTimestamps);
                audio_stages.push(AudioStage::Delay {
                    per_channel_ms: plan.per_channel_delay_ms.clone(),
                });
            }
        }

        let video_stage = if plan.needs_video_extend {
            Some(VideoStage::CloneLastFrame {
                stop_duration: plan.video_extend_duration,
            })
        } else {
            None
        };

        FilterGraph {
            audio_stages,
            video_stage,
        }
    }
}

impl Default for FilterGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(strategy: Strategy) -> AlignmentPlan {
        AlignmentPlan {
            strategy,
            output_duration: 120.0,
            needs_video_extend: false,
            video_extend_duration: 0.0,
            needed_duration: 30.0,
            audio_offset: 0.0,
            has_audio_offset: false,
            per_channel_delay_ms: vec![90_000, 90_000],
        }
    }

    #[test]
    fn pad_chain_delays_pads_and_trims() {
        let graph = FilterGraphBuilder::new().build(&plan(Strategy::VideoRespectPad));
        assert_eq!(
            graph.audio_stages,
            vec![
                AudioStage::Delay {
                    per_channel_ms: vec![90_000, 90_000]
                },
                AudioStage::Pad,
                AudioStage::TrimToDuration { end: 120.0 },
            ]
        );
        assert!(!graph.has_video_output());
        assert_eq!(
            graph.render(),
            "[1:a]adelay=90000|90000,apad,atrim=end=120[aout]"
        );
    }

    #[test]
    fn loop_chain_trims_before_delaying() {
        let graph = FilterGraphBuilder::new().build(&plan(Strategy::VideoRespectLoop));
        assert_eq!(
            graph.render(),
            "[1:a]atrim=end=30,asetpts=PTS-STARTPTS,adelay=90000|90000[aout]"
        );
    }

    #[test]
    fn fit_chain_is_delay_only() {
        let graph = FilterGraphBuilder::new().build(&plan(Strategy::AudioRespectFit));
        assert_eq!(graph.render(), "[1:a]adelay=90000|90000[aout]");
        assert!(!graph.has_video_output());
    }

    #[test]
    fn extend_adds_video_chain() {
        let mut p = plan(Strategy::AudioRespectExtend);
        p.needs_video_extend = true;
        p.video_extend_duration = 20.0;
        let graph = FilterGraphBuilder::new().build(&p);
        assert!(graph.has_video_output());
        assert_eq!(
            graph.render(),
            "[1:a]adelay=90000|90000[aout];[0:v]tpad=stop_mode=clone:stop_duration=20[vout]"
        );
    }

    #[test]
    fn audio_offset_inserts_leading_skip() {
        let mut p = plan(Strategy::VideoRespectPad);
        p.audio_offset = 1.5;
        p.has_audio_offset = true;
        let graph = FilterGraphBuilder::new().build(&p);
        assert_eq!(
            graph.render(),
            "[1:a]atrim=start=1.5,asetpts=PTS-STARTPTS,adelay=90000|90000,apad,atrim=end=120[aout]"
        );
    }

    #[test]
    fn loop_strategy_leaves_offset_to_input_seek() {
        let mut p = plan(Strategy::VideoRespectLoop);
        p.audio_offset = 1.5;
        p.has_audio_offset = true;
        let graph = FilterGraphBuilder::new().build(&p);
        assert!(!graph
            .audio_stages
            .iter()
            .any(|s| matches!(s, AudioStage::TrimFromOffset { .. })));
    }
}
