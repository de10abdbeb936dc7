//! Engine command assembly and invocation module
//!
//! Maps a plan and filter graph to the ordered ffmpeg argument list,
//! renders it for dry-run inspection, or runs the engine as a blocking
//! subprocess.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{OverlayError, OverlayResult};
use crate::filter::{FilterGraph, AUDIO_LABEL, VIDEO_LABEL};
use crate::planner::{AlignmentPlan, AlignmentRequest, Strategy};
use crate::probe::MediaAsset;

/// Name of the external transcoding engine binary
const ENGINE_BINARY: &str = "ffmpeg";

/// Assembles and runs the external engine command
pub struct CommandEmitter;

impl CommandEmitter {
    /// Create a new command emitter
    pub fn new() -> Self {
        Self
    }

    /// Assemble the ordered argument list for the engine invocation
    pub fn emit(
        &self,
        plan: &AlignmentPlan,
        graph: &FilterGraph,
        request: &AlignmentRequest,
        video: &MediaAsset,
        audio: &MediaAsset,
        output_path: &str,
    ) -> Vec<String> {
        let mut args: Vec<String> = vec!["-y".into(), "-i".into(), video.path.clone()];

        if plan.strategy == Strategy::VideoRespectLoop {
            // The seek must precede the loop wrapper so the offset is
            // consumed once, not on every repetition.
            if plan.has_audio_offset {
                args.push("-ss".into());
                args.push(plan.audio_offset.to_string());
            }
            args.push("-stream_loop".into());
            args.push("-1".into());
        }

        args.push("-i".into());
        args.push(audio.path.clone());

        args.push("-filter_complex".into());
        args.push(graph.render());

        args.push("-map".into());
        if graph.has_video_output() {
            args.push(format!("[{}]", VIDEO_LABEL));
        } else {
            args.push("0:v".into());
        }
        args.push("-map".into());
        args.push(format!("[{}]", AUDIO_LABEL));

        // Frame cloning needs decoded frames; every other strategy
        // passes the video stream through untouched.
        if !plan.needs_video_extend {
            args.push("-c:v".into());
            args.push("copy".into());
        }

        args.push("-c:a".into());
        args.push(request.audio_codec.clone());
        args.push("-b:a".into());
        args.push(request.audio_bitrate.clone());

        match plan.strategy {
            Strategy::AudioRespectFit | Strategy::AudioRespectExtend => {
                args.push("-t".into());
                args.push(plan.output_duration.to_string());
            }
            Strategy::VideoRespectPad | Strategy::VideoRespectLoop => {
                args.push("-shortest".into());
            }
        }

        args.push(output_path.to_string());
        args
    }

    /// Render the argument list as a human-readable command line
    pub fn render(&self, args: &[String]) -> String {
        let mut rendered = vec![ENGINE_BINARY.to_string()];
        rendered.extend(args.iter().map(|arg| quote(arg)));
        rendered.join(" ")
    }

    /// Run the engine and verify that the declared output was produced
    pub fn execute(&self, args: &[String], output_path: &str) -> OverlayResult<()> {
        info!("Invoking {} with {} arguments", ENGINE_BINARY, args.len());
        debug!("Engine command: {}", self.render(args));

        let output = Command::new(ENGINE_BINARY).args(args).output()?;

        if !output.status.success() {
            return Err(OverlayError::EngineInvocationFailed {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // A zero exit with no output file is a silent no-op, surfaced
        // distinctly from invocation failure.
        if !Path::new(output_path).exists() {
            return Err(OverlayError::OutputNotProduced {
                path: output_path.to_string(),
            });
        }

        info!("Engine completed, output written to {}", output_path);
        Ok(())
    }
}

impl Default for CommandEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Quote an argument for display when it contains shell-significant text
fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains(|c: char| c.is_whitespace() || "[];|,".contains(c)) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}
