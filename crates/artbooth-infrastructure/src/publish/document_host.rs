use super::{read_reference, send_error};
use crate::document::DownloadPage;
use artbooth_core::error::{BoothError, Result};
use artbooth_core::publish::{Artifact, PublishStrategy, StrategyError};
use async_trait::async_trait;
use reqwest::Client;

/// Posts an HTML download page to a dpaste-compatible paste service.
///
/// The page embeds the image, so the returned paste URL is all a phone
/// needs to view and save it.
pub struct DocumentHostStrategy {
    client: Client,
    url: String,
    expiry_days: u32,
    page: DownloadPage,
}

impl DocumentHostStrategy {
    pub fn new(client: Client, url: impl Into<String>, expiry_days: u32) -> Result<Self> {
        let page = DownloadPage::new()
            .map_err(|e| BoothError::config(format!("Failed to load download page template: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
            expiry_days,
            page,
        })
    }

    fn form(&self, artifact: &Artifact) -> std::result::Result<Vec<(&'static str, String)>, StrategyError> {
        let content = self
            .page
            .render(artifact)
            .map_err(|e| StrategyError::Preparation(format!("failed to render page: {}", e)))?;
        Ok(vec![
            ("content", content),
            ("syntax", "html".to_string()),
            ("expiry_days", self.expiry_days.to_string()),
        ])
    }
}

#[async_trait]
impl PublishStrategy for DocumentHostStrategy {
    fn name(&self) -> &str {
        "document_host"
    }

    async fn publish(&self, artifact: &Artifact) -> std::result::Result<String, StrategyError> {
        let form = self.form(artifact)?;
        tracing::debug!("[DocumentHost] POST {} ({} byte page)", self.url, form[0].1.len());

        let response = self
            .client
            .post(&self.url)
            .form(&form)
            .send()
            .await
            .map_err(send_error)?;

        read_reference(response).await
    }
}
