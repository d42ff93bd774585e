//! secret.json storage.

use artbooth_core::config::SecretConfig;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretStorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reads and parses a secret file. A missing file yields `None`.
///
/// Credentials are not validated here.
pub fn load_secret_file(path: &Path) -> Result<Option<SecretConfig>, SecretStorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    Ok(Some(serde_json::from_str(&content)?))
}
