//! Command implementation

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::Cli;
use crate::engine::CommandEmitter;
use crate::filter::FilterGraphBuilder;
use crate::planner::{AlignmentPlanner, AlignmentRequest};
use crate::probe::{FfprobeProbe, MediaProbe};
use crate::utils::time::TimeSpec;

/// Execute the overlay operation
pub fn overlay(cli: Cli) -> Result<()> {
    info!("Starting overlay operation");
    info!("Video: {}", cli.video);
    info!("Audio: {}", cli.audio);
    info!("Output: {}", cli.output);

    // Parse time arguments before touching any media
    let start_index = TimeSpec::parse(&cli.start_index)
        .with_context(|| format!("Invalid start index '{}'", cli.start_index))?;
    let audio_offset = TimeSpec::parse(&cli.audio_offset)
        .with_context(|| format!("Invalid audio offset '{}'", cli.audio_offset))?;

    // Validate input files exist
    if !Path::new(&cli.video).exists() {
        return Err(anyhow::anyhow!("Video file does not exist: {}", cli.video));
    }
    if !Path::new(&cli.audio).exists() {
        return Err(anyhow::anyhow!("Audio file does not exist: {}", cli.audio));
    }

    let request = AlignmentRequest {
        start_index,
        audio_offset,
        respect_length: cli.respect_length.into(),
        loop_audio: cli.loop_audio,
        audio_codec: cli.audio_codec,
        audio_bitrate: cli.audio_bitrate,
    };

    // Probe both assets
    let probe = FfprobeProbe::new();
    let video = probe
        .probe(&cli.video)
        .context("Failed to probe video file")?;
    let audio = probe
        .probe(&cli.audio)
        .context("Failed to probe audio file")?;

    info!(
        "Video: {:.3}s, audio: {:.3}s ({} channels)",
        video.duration, audio.duration, audio.channels
    );

    // Plan the alignment
    let planner = AlignmentPlanner::new();
    let plan = planner
        .plan(&request, &video, &audio)
        .context("Failed to plan alignment")?;

    // Build the filter graph and engine command
    let graph = FilterGraphBuilder::new().build(&plan);
    let emitter = CommandEmitter::new();
    let args = emitter.emit(&plan, &graph, &request, &video, &audio, &cli.output);

    if cli.dry_run {
        println!("{}", emitter.render(&args));
        info!("Dry run, engine not invoked");
        return Ok(());
    }

    emitter
        .execute(&args, &cli.output)
        .context("Overlay execution failed")?;

    info!("Overlay operation completed successfully");
    Ok(())
}
