//! Time parsing and formatting utilities

use serde::Serialize;

use crate::error::{OverlayError, OverlayResult};

/// An elapsed duration in seconds, parsed from a user-supplied time
/// expression. Immutable once parsed; always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSpec {
    seconds: f64,
}

impl TimeSpec {
    /// Parse a time expression into a TimeSpec.
    ///
    /// Accepted shapes: `HH:MM:SS.ms`, `MM:SS.ms`, `SS.ms`, or bare
    /// seconds. Each segment may carry a fractional component.
    pub fn parse(text: &str) -> OverlayResult<Self> {
        let text = text.trim();

        if text.is_empty() {
            return Err(OverlayError::InvalidTimeFormat {
                time: text.to_string(),
            });
        }

        // Bare decimal number is taken as seconds directly
        if let Ok(seconds) = text.parse::<f64>() {
            return Self::from_seconds_checked(text, seconds);
        }

        let segments: Vec<&str> = text.split(':').collect();
        let parsed: Vec<f64> = segments
            .iter()
            .map(|s| s.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| OverlayError::InvalidTimeFormat {
                time: text.to_string(),
            })?;

        let seconds = match parsed.as_slice() {
            [s] => *s,
            [m, s] => m * 60.0 + s,
            [h, m, s] => h * 3600.0 + m * 60.0 + s,
            _ => {
                return Err(OverlayError::InvalidTimeFormat {
                    time: text.to_string(),
                })
            }
        };

        Self::from_seconds_checked(text, seconds)
    }

    fn from_seconds_checked(text: &str, seconds: f64) -> OverlayResult<Self> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(OverlayError::InvalidTimeFormat {
                time: text.to_string(),
            });
        }
        Ok(Self { seconds })
    }

    /// Construct a TimeSpec directly from a seconds value
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Elapsed time in seconds
    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Elapsed time in whole milliseconds
    pub fn as_millis(&self) -> u64 {
        (self.seconds * 1000.0).round() as u64
    }

    /// Whether this represents a zero duration
    pub fn is_zero(&self) -> bool {
        self.seconds == 0.0
    }
}

/// Format seconds to an HH:MM:SS.ms string for log output
pub fn format_time(seconds: f64) -> String {
    let hours = (seconds / 3600.0) as u32;
    let minutes = ((seconds % 3600.0) / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    let milliseconds = ((seconds % 1.0) * 1000.0).round() as u32;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, milliseconds)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, secs, milliseconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_seconds() {
        assert_eq!(TimeSpec::parse("45").unwrap().as_seconds(), 45.0);
        assert_eq!(TimeSpec::parse("90.5").unwrap().as_seconds(), 90.5);
        assert_eq!(TimeSpec::parse("0").unwrap().as_seconds(), 0.0);
    }

    #[test]
    fn parses_minutes_seconds() {
        assert_eq!(TimeSpec::parse("01:30").unwrap().as_seconds(), 90.0);
        assert_eq!(TimeSpec::parse("01:30.500").unwrap().as_seconds(), 90.5);
    }

    #[test]
    fn parses_hours_minutes_seconds() {
        assert_eq!(TimeSpec::parse("00:01:30.5").unwrap().as_seconds(), 90.5);
        assert_eq!(
            TimeSpec::parse("01:00:00").unwrap().as_seconds(),
            3600.0
        );
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        assert_eq!(TimeSpec::parse("  01:30 ").unwrap().as_seconds(), 90.0);
    }

    #[test]
    fn rejects_malformed_expressions() {
        assert!(TimeSpec::parse("").is_err());
        assert!(TimeSpec::parse("abc").is_err());
        assert!(TimeSpec::parse("1:2:3:4").is_err());
        assert!(TimeSpec::parse("1:xx").is_err());
        assert!(TimeSpec::parse("-5").is_err());
    }

    #[test]
    fn converts_to_milliseconds() {
        assert_eq!(TimeSpec::parse("90.5").unwrap().as_millis(), 90500);
        assert_eq!(TimeSpec::parse("0.0015").unwrap().as_millis(), 2);
    }

    #[test]
    fn formats_time_for_display() {
        assert_eq!(format_time(90.5), "01:30.500");
        assert_eq!(format_time(3661.25), "01:01:01.250");
    }
}
