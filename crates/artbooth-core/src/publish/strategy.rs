use super::artifact::Artifact;
use std::time::Duration;
use thiserror::Error;

/// Why a single publish strategy did not produce a reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    /// Required configuration (e.g. storage credentials) is missing.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The host answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The upload payload could not be prepared.
    #[error("could not prepare upload: {0}")]
    Preparation(String),

    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The host returned an empty or unusable reference.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The reference is too long for a scannable code.
    #[error("reference of {length} bytes exceeds scannable code capacity of {capacity} bytes")]
    CodeTooLarge { length: usize, capacity: usize },
}

impl StrategyError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// One mechanism for making an artifact reachable by reference.
///
/// Strategies are tried one at a time by the publisher; a strategy must not
/// retry internally.
#[async_trait::async_trait]
pub trait PublishStrategy: Send + Sync {
    /// Short stable name used in logs and configuration (e.g. `file_host`).
    fn name(&self) -> &str;

    /// Publishes the artifact and returns its reference.
    async fn publish(&self, artifact: &Artifact) -> Result<String, StrategyError>;
}
