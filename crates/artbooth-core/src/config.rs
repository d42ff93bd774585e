//! Configuration models.
//!
//! `BoothConfig` mirrors `config.toml`; `SecretConfig` mirrors `secret.json`.
//! Every field has a default so partial files load cleanly.

use crate::error::Result;
use crate::photo::ImageLimits;
use crate::style::{StyleCatalog, StyleEntry};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoothConfig {
    pub limits: ImageLimits,
    pub timeouts: TimeoutConfig,
    pub publish: PublishConfig,
    pub code: CodeConfig,
    /// Replaces the built-in catalog when non-empty.
    #[serde(rename = "style", skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<StyleEntry>,
}

impl BoothConfig {
    /// Builds the process-wide style catalog.
    pub fn catalog(&self) -> Result<StyleCatalog> {
        if self.styles.is_empty() {
            Ok(StyleCatalog::builtin())
        } else {
            StyleCatalog::new(self.styles.clone())
        }
    }
}

/// Per-stage timeouts, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub describe_secs: u64,
    pub synthesize_secs: u64,
    /// Applied to each publish attempt separately.
    pub publish_secs: u64,
}

impl TimeoutConfig {
    pub fn describe(&self) -> Duration {
        Duration::from_secs(self.describe_secs)
    }

    pub fn synthesize(&self) -> Duration {
        Duration::from_secs(self.synthesize_secs)
    }

    pub fn publish(&self) -> Duration {
        Duration::from_secs(self.publish_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            describe_secs: 30,
            synthesize_secs: 60,
            publish_secs: 30,
        }
    }
}

/// Publishing strategies understood by the infrastructure layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    /// PUT the image into object storage with public-read access.
    ObjectStorage,
    /// Post an HTML download page embedding the image to a paste service.
    DocumentHost,
    /// Upload the raw image to an anonymous file host.
    FileHost,
    /// Use a `data:` URI; only viable for very small images.
    DataUri,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Strategies in priority order.
    pub strategies: Vec<StrategyKind>,
    pub document_host_url: String,
    pub file_host_url: String,
    /// How long hosted documents are kept, where the host supports it.
    pub expiry_days: u32,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            strategies: vec![
                StrategyKind::ObjectStorage,
                StrategyKind::DocumentHost,
                StrategyKind::FileHost,
            ],
            document_host_url: "https://dpaste.com/api/v2/".to_string(),
            file_host_url: "https://0x0.st".to_string(),
            expiry_days: 7,
        }
    }
}

/// Scannable code rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    /// Pixels per module.
    pub module_scale: u32,
    /// Quiet zone width, in modules.
    pub border: u32,
    /// Longest reference, in bytes, that will be encoded.
    pub max_reference_len: usize,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            module_scale: 12,
            border: 4,
            max_reference_len: 1024,
        }
    }
}

/// Root of `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub openai: Option<OpenAIConfig>,
    #[serde(default)]
    pub object_storage: Option<ObjectStorageConfig>,
}

/// OpenAI API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default)]
    pub vision_model: Option<String>,
    #[serde(default)]
    pub image_model: Option<String>,
}

/// Object storage credentials.
///
/// Objects are written to `{endpoint}/{bucket}/{key}` and served from
/// `{public_base_url}/{key}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_token: String,
    pub public_base_url: String,
}
