//! OverlayX CLI Audio Overlay
//!
//! A command-line tool for merging an audio track into a video's timeline.
//!
//! # Features
//!
//! - Four-way strategy selection (pad/loop/fit/extend)
//! - Stream copy of the video wherever the timeline is untouched
//! - Per-channel audio delay for multi-channel sources
//! - Multiple time format support
//! - Dry-run rendering of the engine command
//!
//! # Usage
//!
//! ```bash
//! overlayx -i video.mp4 -a track.wav -o merged.mp4 --start-index 00:01:30
//! overlayx -i video.mp4 -a track.wav -o merged.mp4 --loop-audio --dry-run
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use overlayx_cli::cli::{commands, Cli};

/// Main entry point for the OverlayX CLI application
fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; --verbose lowers the default filter to debug
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting OverlayX CLI Audio Overlay");

    commands::overlay(cli)?;

    info!("OverlayX CLI completed successfully");
    Ok(())
}
