//! Publish strategy implementations.
//!
//! Each strategy implements `artbooth_core::publish::PublishStrategy`;
//! [`build_strategies`] assembles them in the configured priority order.

mod data_uri;
mod document_host;
mod file_host;
mod object_storage;

pub use data_uri::{DataUriStrategy, data_uri};
pub use document_host::DocumentHostStrategy;
pub use file_host::FileHostStrategy;
pub use object_storage::ObjectStorageStrategy;

use artbooth_core::config::{PublishConfig, SecretConfig, StrategyKind};
use artbooth_core::error::{BoothError, Result};
use artbooth_core::publish::{PublishStrategy, StrategyError};
use reqwest::{Client, StatusCode};
use std::sync::Arc;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Builds the shared HTTP client used by every strategy.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("artbooth/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| BoothError::config(format!("Failed to build HTTP client: {}", e)))
}

/// Instantiates the configured strategies in priority order.
///
/// Duplicate entries are ignored after their first occurrence. Strategies
/// whose credentials are missing are still included; they report
/// `StrategyError::Unavailable` when tried.
pub fn build_strategies(
    config: &PublishConfig,
    secrets: &SecretConfig,
    client: Client,
) -> Result<Vec<Arc<dyn PublishStrategy>>> {
    let mut seen = Vec::new();
    let mut strategies: Vec<Arc<dyn PublishStrategy>> = Vec::new();

    for kind in &config.strategies {
        if seen.contains(kind) {
            tracing::warn!("[Publish] Ignoring duplicate strategy '{}'", kind);
            continue;
        }
        seen.push(*kind);

        let strategy: Arc<dyn PublishStrategy> = match kind {
            StrategyKind::ObjectStorage => Arc::new(ObjectStorageStrategy::new(
                client.clone(),
                secrets.object_storage.clone(),
            )),
            StrategyKind::DocumentHost => Arc::new(DocumentHostStrategy::new(
                client.clone(),
                config.document_host_url.clone(),
                config.expiry_days,
            )?),
            StrategyKind::FileHost => Arc::new(FileHostStrategy::new(
                client.clone(),
                config.file_host_url.clone(),
            )),
            StrategyKind::DataUri => Arc::new(DataUriStrategy),
        };
        strategies.push(strategy);
    }

    if strategies.is_empty() {
        return Err(BoothError::config("no publish strategies configured"));
    }

    Ok(strategies)
}

/// Interprets a host's response as a reference.
///
/// Hosts used here answer with the public URL as the whole body.
pub(crate) fn parse_reference(status: StatusCode, body: &str) -> std::result::Result<String, StrategyError> {
    let body = body.trim();
    if !status.is_success() {
        return Err(rejected(status, body));
    }
    if body.is_empty() {
        return Err(StrategyError::InvalidReference(
            "host returned an empty body".to_string(),
        ));
    }
    Ok(body.to_string())
}

pub(crate) fn rejected(status: StatusCode, body: &str) -> StrategyError {
    StrategyError::Rejected {
        status: status.as_u16(),
        body: body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}

pub(crate) async fn read_reference(response: reqwest::Response) -> std::result::Result<String, StrategyError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| StrategyError::transport(format!("failed to read response: {}", e)))?;
    parse_reference(status, &body)
}

pub(crate) fn send_error(err: reqwest::Error) -> StrategyError {
    StrategyError::transport(format!("request failed: {}", err))
}
