//! OverlayX CLI Audio Overlay Library
//!
//! A command-line tool for merging an audio track into a video's timeline
//! with intelligent strategy selection: stream-copy where possible,
//! re-encode only when the timeline must be extended.

pub mod cli;
pub mod engine;
pub mod error;
pub mod filter;
pub mod planner;
pub mod probe;
pub mod utils;

// Re-export commonly used types
pub use error::{OverlayError, OverlayResult};
pub use filter::{FilterGraph, FilterGraphBuilder};
pub use planner::{AlignmentPlan, AlignmentPlanner, AlignmentRequest, RespectLength, Strategy};
pub use probe::{FfprobeProbe, MediaAsset, MediaProbe};
pub use utils::time::TimeSpec;
