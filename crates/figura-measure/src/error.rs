use serde::Serialize;
use std::fmt;

/// Errors raised while loading or checking a [`crate::PipelineConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "io error: {msg}"),
            ConfigError::Parse(msg) => write!(f, "parse error: {msg}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Why an analysis produced no score. Every variant is user-retriable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// The pose model returned no landmarks.
    NoPersonDetected,
    /// A required landmark is missing or below its visibility threshold.
    InsufficientLandmarkConfidence,
    /// Anchors collapsed onto each other; segment lengths sum to ~0.
    DegenerateGeometry,
}

impl FailureReason {
    /// Short retry guidance for the person in front of the camera.
    pub fn retry_message(&self) -> &'static str {
        match self {
            FailureReason::NoPersonDetected => {
                "No person found. Step back so your whole body is in frame and try again."
            }
            FailureReason::InsufficientLandmarkConfidence => {
                "Shoulders, hips and feet must be clearly visible. Please retake the photo."
            }
            FailureReason::DegenerateGeometry => {
                "The pose could not be measured. Stand upright facing the camera and retake."
            }
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoPersonDetected => write!(f, "no person detected"),
            FailureReason::InsufficientLandmarkConfidence => {
                write!(f, "insufficient landmark confidence")
            }
            FailureReason::DegenerateGeometry => write!(f, "degenerate geometry"),
        }
    }
}

/// A capture-session transition that is not allowed in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// A countdown or analysis is already in flight.
    Busy,
    /// Countdowns must last at least one second.
    InvalidCountdown,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Busy => write!(f, "capture already in progress"),
            SessionError::InvalidCountdown => write!(f, "countdown must be at least 1 second"),
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display_is_short_tag() {
        assert_eq!(FailureReason::NoPersonDetected.to_string(), "no person detected");
        assert_eq!(
            FailureReason::DegenerateGeometry.to_string(),
            "degenerate geometry"
        );
    }

    #[test]
    fn test_every_failure_has_distinct_retry_message() {
        let reasons = [
            FailureReason::NoPersonDetected,
            FailureReason::InsufficientLandmarkConfidence,
            FailureReason::DegenerateGeometry,
        ];
        for reason in reasons {
            assert!(!reason.retry_message().is_empty());
            assert_ne!(reason.retry_message(), reason.to_string());
        }
        assert_ne!(reasons[0].retry_message(), reasons[1].retry_message());
        assert_ne!(reasons[1].retry_message(), reasons[2].retry_message());
    }
}
