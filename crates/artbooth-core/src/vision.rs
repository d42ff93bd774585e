//! Consumed model interfaces.
//!
//! The booth never talks to a model provider directly; it receives
//! implementations of these traits at construction time.

use crate::error::StageFailure;
use crate::photo::ValidatedImage;

/// Turns a photo into a textual scene description.
#[async_trait::async_trait]
pub trait VisionDescriber: Send + Sync {
    /// Describes the photo.
    ///
    /// Failures are reported, never retried internally.
    async fn describe(&self, image: &ValidatedImage) -> Result<String, StageFailure>;
}

/// Turns a text prompt into a new image.
#[async_trait::async_trait]
pub trait StyleSynthesizer: Send + Sync {
    /// Synthesizes an image and returns its encoded bytes.
    ///
    /// An empty result must be reported as `FailureKind::EmptyOutput`.
    async fn synthesize(&self, prompt: &str) -> Result<Vec<u8>, StageFailure>;
}
