//! Configuration service implementation.
//!
//! Loads `BoothConfig` from ~/.config/artbooth/config.toml once and caches it.

use crate::storage::ConfigStorage;
use artbooth_core::config::BoothConfig;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the booth configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<BoothConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config path.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading an explicit config file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// # Errors
    ///
    /// Returns a message if the file exists but cannot be read or parsed.
    /// A missing file yields the defaults.
    pub fn get_config(&self) -> Result<BoothConfig, String> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_config(&self) -> Result<BoothConfig, String> {
        let storage = match &self.path {
            Some(path) => ConfigStorage::with_path(path.clone()),
            None => ConfigStorage::new().map_err(|e| e.to_string())?,
        };

        let config = storage.load().map_err(|e| {
            format!(
                "Failed to load configuration from {}: {}",
                storage.path().display(),
                e
            )
        })?;

        tracing::info!(
            "[ConfigService] Loaded configuration from {}",
            storage.path().display()
        );
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
