//! CLI module for OverlayX
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, ValueEnum};

use crate::planner::RespectLength;

pub mod commands;

/// OverlayX CLI Audio Overlay
///
/// A command-line tool for merging an audio track into a video's timeline
/// with stream-copy-preserving strategy selection.
#[derive(Parser, Debug)]
#[command(name = "overlayx")]
#[command(about = "OverlayX CLI - Overlay an audio track onto a video timeline")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Input audio file path
    #[arg(short, long)]
    pub audio: String,

    /// Input video file path
    #[arg(short = 'i', long)]
    pub video: String,

    /// Output video file path
    #[arg(short, long)]
    pub output: String,

    /// Video time at which the audio begins (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(long, default_value = "0")]
    pub start_index: String,

    /// Offset into the audio file to skip before overlaying
    #[arg(long, default_value = "0")]
    pub audio_offset: String,

    /// Which input's duration the output must preserve
    #[arg(long, value_enum, default_value = "video")]
    pub respect_length: RespectArg,

    /// Loop the audio to fill the video duration (respect-length=video only)
    #[arg(long)]
    pub loop_audio: bool,

    /// Audio codec for the output
    #[arg(long, default_value = "aac")]
    pub audio_codec: String,

    /// Audio bitrate for the output
    #[arg(long, default_value = "192k")]
    pub audio_bitrate: String,

    /// Print the engine command without executing it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,
}

/// Duration-preservation selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespectArg {
    /// Preserve the video duration exactly
    Video,
    /// Follow the audio duration, extending the video if needed
    Audio,
}

impl From<RespectArg> for RespectLength {
    fn from(arg: RespectArg) -> Self {
        match arg {
            RespectArg::Video => RespectLength::Video,
            RespectArg::Audio => RespectLength::Audio,
        }
    }
}
