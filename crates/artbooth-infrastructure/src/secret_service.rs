//! Secret service implementation.
//!
//! Reads secret.json and fills any missing section from environment
//! variables. Priority: secret.json > environment.

use crate::paths::BoothPaths;
use crate::storage::load_secret_file;
use artbooth_core::config::{ObjectStorageConfig, OpenAIConfig, SecretConfig};
use artbooth_core::secret::SecretService;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_VISION_MODEL: &str = "OPENAI_VISION_MODEL";
pub const ENV_OPENAI_IMAGE_MODEL: &str = "OPENAI_IMAGE_MODEL";
pub const ENV_STORAGE_ENDPOINT: &str = "ARTBOOTH_STORAGE_ENDPOINT";
pub const ENV_STORAGE_BUCKET: &str = "ARTBOOTH_STORAGE_BUCKET";
pub const ENV_STORAGE_TOKEN: &str = "ARTBOOTH_STORAGE_TOKEN";
pub const ENV_STORAGE_PUBLIC_URL: &str = "ARTBOOTH_STORAGE_PUBLIC_URL";

/// Service for loading secret configuration.
///
/// The merged result is cached for the lifetime of the service.
#[derive(Clone)]
pub struct SecretServiceImpl {
    storage_path: Option<PathBuf>,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Creates a service reading the default secret.json path.
    pub fn new() -> Self {
        Self {
            storage_path: None,
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading an explicit secret file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            storage_path: Some(path),
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    fn load_from_file(&self) -> Result<SecretConfig, String> {
        let path = match &self.storage_path {
            Some(path) => path.clone(),
            None => BoothPaths::secret_file().map_err(|e| e.to_string())?,
        };

        match load_secret_file(&path) {
            Ok(Some(config)) => Ok(config),
            Ok(None) => {
                tracing::debug!(
                    "[SecretService] No secret file at {}, using environment only",
                    path.display()
                );
                Ok(SecretConfig::default())
            }
            Err(e) => Err(format!("Failed to load secrets: {}", e)),
        }
    }
}

impl Default for SecretServiceImpl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        {
            let cached = self.secrets.read().await;
            if let Some(ref config) = *cached {
                return Ok(config.clone());
            }
        }

        let from_file = self.load_from_file()?;
        let merged = merge_env(from_file, |key| env::var(key).ok());

        let mut cached = self.secrets.write().await;
        *cached = Some(merged.clone());
        Ok(merged)
    }
}

/// Fills sections missing from `config` using `lookup` (normally `env::var`).
///
/// A section is only created from the environment when all of its required
/// values are present; blank values count as missing.
pub fn merge_env<F>(mut config: SecretConfig, lookup: F) -> SecretConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if config.openai.is_none() {
        config.openai = get(ENV_OPENAI_API_KEY).map(|api_key| OpenAIConfig {
            api_key,
            vision_model: get(ENV_OPENAI_VISION_MODEL),
            image_model: get(ENV_OPENAI_IMAGE_MODEL),
        });
    }

    if config.object_storage.is_none() {
        config.object_storage = match (
            get(ENV_STORAGE_ENDPOINT),
            get(ENV_STORAGE_BUCKET),
            get(ENV_STORAGE_TOKEN),
            get(ENV_STORAGE_PUBLIC_URL),
        ) {
            (Some(endpoint), Some(bucket), Some(access_token), Some(public_base_url)) => {
                Some(ObjectStorageConfig {
                    endpoint,
                    bucket,
                    access_token,
                    public_base_url,
                })
            }
            _ => None,
        };
    }

    config
}
