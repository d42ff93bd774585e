//! Wires configuration, secrets and collaborators into a `BoothContext`.

use anyhow::{Context, Result, anyhow};
use artbooth_application::{ArtifactPublisher, BoothContext};
use artbooth_core::config::{BoothConfig, SecretConfig};
use artbooth_core::photo::ImageValidator;
use artbooth_core::secret::SecretService;
use artbooth_infrastructure::publish::{build_strategies, http_client};
use artbooth_infrastructure::{ConfigService, SecretServiceImpl};
use artbooth_interaction::{OpenAIImageSynthesizer, OpenAIVisionDescriber};
use std::path::PathBuf;
use std::sync::Arc;

/// Optional overrides for the default file locations.
#[derive(Debug, Clone, Default)]
pub struct Paths {
    pub config: Option<PathBuf>,
    pub secrets: Option<PathBuf>,
}

pub fn load_config(paths: &Paths) -> Result<BoothConfig> {
    let service = match &paths.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new(),
    };
    service.get_config().map_err(|e| anyhow!(e))
}

pub async fn load_secrets(paths: &Paths) -> Result<SecretConfig> {
    let service = match &paths.secrets {
        Some(path) => SecretServiceImpl::with_path(path.clone()),
        None => SecretServiceImpl::new(),
    };
    service.load_secrets().await.map_err(|e| anyhow!(e))
}

pub fn publisher(config: &BoothConfig, secrets: &SecretConfig) -> Result<ArtifactPublisher> {
    let strategies = build_strategies(&config.publish, secrets, http_client()?)?;
    tracing::debug!(
        "[Bootstrap] Publish strategies: {}",
        strategies
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(" → ")
    );
    Ok(ArtifactPublisher::new(
        strategies,
        config.timeouts.publish(),
        config.code,
    ))
}

/// Builds the full booth context, including the model clients.
pub async fn booth_context(paths: &Paths) -> Result<Arc<BoothContext>> {
    let config = load_config(paths)?;
    let secrets = load_secrets(paths).await?;

    let catalog = config.catalog().context("Invalid style configuration")?;
    let describer = OpenAIVisionDescriber::try_from_secrets(&secrets)?;
    let synthesizer = OpenAIImageSynthesizer::try_from_secrets(&secrets)?;
    tracing::info!(
        "[Bootstrap] Using {} for description and {} for synthesis",
        describer.model(),
        synthesizer.model()
    );

    Ok(Arc::new(BoothContext::new(
        catalog,
        ImageValidator::new(config.limits),
        Arc::new(describer),
        Arc::new(synthesizer),
        publisher(&config, &secrets)?,
        config.timeouts,
    )))
}
