use artbooth_core::publish::{Artifact, PublishStrategy, StrategyError};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Encodes the artifact as a `data:` URI.
pub fn data_uri(artifact: &Artifact) -> String {
    format!(
        "data:{};base64,{}",
        artifact.content_type(),
        STANDARD.encode(artifact.bytes())
    )
}

/// Publishes by inlining the image in the reference itself.
///
/// Needs no network access, but only tiny images fit into a scannable code;
/// larger ones are rejected by the publisher's capacity check.
pub struct DataUriStrategy;

#[async_trait]
impl PublishStrategy for DataUriStrategy {
    fn name(&self) -> &str {
        "data_uri"
    }

    async fn publish(&self, artifact: &Artifact) -> Result<String, StrategyError> {
        if artifact.bytes().is_empty() {
            return Err(StrategyError::Preparation("artifact is empty".to_string()));
        }
        Ok(data_uri(artifact))
    }
}
