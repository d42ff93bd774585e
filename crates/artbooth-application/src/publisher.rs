//! ArtifactPublisher - ordered fallback chain over publish strategies.

use crate::code::ScannableCodeRenderer;
use artbooth_core::config::CodeConfig;
use artbooth_core::error::{BoothError, Result};
use artbooth_core::publish::{Artifact, Publication, PublishStrategy, StrategyError};
use std::sync::Arc;
use std::time::Duration;

/// Publishes artifacts by trying each strategy in priority order.
///
/// Strategies run one at a time; the next one is attempted only when the
/// current one fails, times out, is unavailable, or yields a reference that
/// cannot be encoded. The first success wins.
pub struct ArtifactPublisher {
    strategies: Vec<Arc<dyn PublishStrategy>>,
    attempt_timeout: Duration,
    renderer: ScannableCodeRenderer,
}

impl ArtifactPublisher {
    pub fn new(
        strategies: Vec<Arc<dyn PublishStrategy>>,
        attempt_timeout: Duration,
        code: CodeConfig,
    ) -> Self {
        Self {
            strategies,
            attempt_timeout,
            renderer: ScannableCodeRenderer::new(code),
        }
    }

    /// Publishes a prepared artifact.
    ///
    /// Fails with `PublishFailed` carrying the last attempted strategy's
    /// reason when every strategy fails.
    pub async fn publish_artifact(&self, artifact: &Artifact) -> Result<Publication> {
        let mut last_reason = None;

        for strategy in &self.strategies {
            let name = strategy.name();
            tracing::debug!("[Publisher] Trying '{}' for {}", name, artifact.file_name());

            match self.attempt(strategy.as_ref(), artifact).await {
                Ok((reference, scannable_code)) => {
                    tracing::info!("[Publisher] Published {} via '{}'", artifact.file_name(), name);
                    return Ok(Publication {
                        strategy: name.to_string(),
                        reference,
                        scannable_code,
                    });
                }
                Err(err) if err.is_unavailable() => {
                    tracing::debug!("[Publisher] Skipping '{}': {}", name, err);
                    last_reason = Some(format!("{}: {}", name, err));
                }
                Err(err) => {
                    tracing::warn!("[Publisher] '{}' failed: {}", name, err);
                    last_reason = Some(format!("{}: {}", name, err));
                }
            }
        }

        let reason = last_reason.unwrap_or_else(|| "no publish strategies configured".to_string());
        tracing::error!("[Publisher] All strategies failed for {}", artifact.file_name());
        Err(BoothError::publish_failed(reason))
    }

    async fn attempt(
        &self,
        strategy: &dyn PublishStrategy,
        artifact: &Artifact,
    ) -> std::result::Result<(String, Vec<u8>), StrategyError> {
        let reference = tokio::time::timeout(self.attempt_timeout, strategy.publish(artifact))
            .await
            .map_err(|_| StrategyError::Timeout(self.attempt_timeout))??;

        let reference = reference.trim();
        if reference.is_empty() {
            return Err(StrategyError::InvalidReference(
                "strategy returned an empty reference".to_string(),
            ));
        }

        let scannable_code = self.renderer.render(reference).map_err(|err| match err {
            BoothError::CodeTooLarge { length, capacity } => {
                StrategyError::CodeTooLarge { length, capacity }
            }
            other => StrategyError::InvalidReference(other.to_string()),
        })?;

        Ok((reference.to_string(), scannable_code))
    }
}
