//! config.toml storage.

use crate::paths::BoothPaths;
use artbooth_core::config::BoothConfig;
use std::fs;
use std::path::PathBuf;

/// Errors that can occur while reading config.toml.
#[derive(Debug)]
pub enum ConfigStorageError {
    IoError(std::io::Error),
    ParseError(toml::de::Error),
    ConfigDirNotFound,
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigStorageError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<std::io::Error> for ConfigStorageError {
    fn from(e: std::io::Error) -> Self {
        ConfigStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigStorageError {
    fn from(e: toml::de::Error) -> Self {
        ConfigStorageError::ParseError(e)
    }
}

/// Read-only storage for config.toml.
///
/// A missing or blank file is not an error: it yields `BoothConfig::default()`.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new() -> Result<Self, ConfigStorageError> {
        let path = BoothPaths::config_file().map_err(|_| ConfigStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<BoothConfig, ConfigStorageError> {
        if !self.path.exists() {
            return Ok(BoothConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BoothConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artbooth_core::config::StrategyKind;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(storage.load().unwrap(), BoothConfig::default());
    }

    #[test]
    fn test_load_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            "[timeouts]\nsynthesize_secs = 90\n\n[publish]\nstrategies = [\"document_host\"]\n",
        )
        .unwrap();

        let config = ConfigStorage::with_path(path).load().unwrap();
        assert_eq!(config.timeouts.synthesize_secs, 90);
        assert_eq!(config.timeouts.describe_secs, 30);
        assert_eq!(config.publish.strategies, vec![StrategyKind::DocumentHost]);
    }

    #[test]
    fn test_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[limits\nmax_dimension = ").unwrap();

        let result = ConfigStorage::with_path(path).load();
        assert!(matches!(result, Err(ConfigStorageError::ParseError(_))));
    }
}
