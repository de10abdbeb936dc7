//! Utility modules for OverlayX

pub mod time;
