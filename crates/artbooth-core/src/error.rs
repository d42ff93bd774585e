//! Error types for the Artbooth application.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Classification of a failure reported by an external model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// The provider throttled the request (HTTP 429 or equivalent).
    RateLimited,
    /// Credentials were missing, invalid, or lacked permission.
    Authentication,
    /// Any other provider or transport error.
    Api,
    /// The call did not return within its configured timeout.
    Timeout,
    /// The call succeeded but produced no usable output.
    EmptyOutput,
}

/// A failure reported by one pipeline stage (describe or synthesize).
///
/// `message` is surfaced to the user verbatim, so it must never contain secrets.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct StageFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl StageFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(FailureKind::RateLimited, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Authentication, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Api, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn empty_output(message: impl Into<String>) -> Self {
        Self::new(FailureKind::EmptyOutput, message)
    }
}

/// Which limit an oversized image violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageLimit {
    /// Payload length exceeded the configured byte maximum.
    Bytes { size: usize, max: usize },
    /// A pixel dimension exceeded the configured maximum.
    Dimensions { width: u32, height: u32, max: u32 },
}

impl std::fmt::Display for ImageLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageLimit::Bytes { size, max } => {
                write!(f, "{} bytes exceeds the {} byte limit", size, max)
            }
            ImageLimit::Dimensions { width, height, max } => {
                write!(f, "{}x{} exceeds the {} pixel limit", width, height, max)
            }
        }
    }
}

/// A shared error type for the entire Artbooth application.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoothError {
    /// The requested style id is not in the catalog.
    #[error("Unknown style: '{0}'")]
    InvalidStyle(String),

    /// An image was submitted before a style was chosen.
    #[error("No style selected")]
    NoStyleSelected,

    /// A pipeline run is already in flight for this session.
    #[error("Session is already processing an image")]
    AlreadyProcessing,

    #[error("Image too large: {0}")]
    ImageTooLarge(ImageLimit),

    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    #[error("Image analysis failed: {0}")]
    DescribeFailed(StageFailure),

    #[error("Image generation failed: {0}")]
    SynthesizeFailed(StageFailure),

    /// Every publish strategy failed; carries the last attempted strategy's reason.
    #[error("Publishing failed: {reason}")]
    PublishFailed { reason: String },

    /// The reference does not fit in a scannable code.
    #[error("Reference of {length} bytes exceeds the scannable code capacity of {capacity} bytes")]
    CodeTooLarge { length: usize, capacity: usize },

    /// The action is not permitted from the session's current state.
    #[error("Cannot {action} while {from}")]
    InvalidTransition { from: String, action: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BoothError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn invalid_transition(from: impl std::fmt::Display, action: &'static str) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            action,
        }
    }

    pub fn publish_failed(reason: impl Into<String>) -> Self {
        Self::PublishFailed {
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The message shown to the user for a failed pipeline stage.
    ///
    /// Model failures keep the provider's message verbatim; every other error
    /// falls back to its display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::DescribeFailed(failure) | Self::SynthesizeFailed(failure) => {
                failure.message.clone()
            }
            Self::PublishFailed { reason } => reason.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for BoothError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for BoothError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BoothError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, BoothError>`.
pub type Result<T> = std::result::Result<T, BoothError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_failure_message_is_verbatim() {
        let err = BoothError::SynthesizeFailed(StageFailure::rate_limited("rate limit"));
        assert_eq!(err.user_message(), "rate limit");
        assert_eq!(err.to_string(), "Image generation failed: rate limit");
    }

    #[test]
    fn test_image_limit_display() {
        let limit = ImageLimit::Dimensions {
            width: 4097,
            height: 100,
            max: 4096,
        };
        assert_eq!(limit.to_string(), "4097x100 exceeds the 4096 pixel limit");
    }

    #[test]
    fn test_failure_kind_round_trips_through_strum() {
        assert_eq!(FailureKind::RateLimited.to_string(), "rate_limited");
        assert_eq!(
            "empty_output".parse::<FailureKind>().unwrap(),
            FailureKind::EmptyOutput
        );
    }
}
