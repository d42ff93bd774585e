use super::{read_reference, send_error};
use artbooth_core::publish::{Artifact, PublishStrategy, StrategyError};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};

/// Uploads the raw image to a 0x0.st-style anonymous file host.
pub struct FileHostStrategy {
    client: Client,
    url: String,
}

impl FileHostStrategy {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn form(artifact: &Artifact) -> Result<Form, StrategyError> {
        let part = Part::bytes(artifact.bytes().to_vec())
            .file_name(artifact.file_name().to_string())
            .mime_str(artifact.content_type())
            .map_err(|e| StrategyError::Preparation(format!("invalid content type: {}", e)))?;
        Ok(Form::new().part("file", part))
    }
}

#[async_trait]
impl PublishStrategy for FileHostStrategy {
    fn name(&self) -> &str {
        "file_host"
    }

    async fn publish(&self, artifact: &Artifact) -> Result<String, StrategyError> {
        let form = Self::form(artifact)?;
        tracing::debug!(
            "[FileHost] POST {} ({}, {} bytes)",
            self.url,
            artifact.file_name(),
            artifact.bytes().len()
        );

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;

        read_reference(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn test_form_builds_for_sniffed_type() {
        let artifact = Artifact::new(vec![0xFFu8, 0xD8, 0xFF, 0xE0], "anime", Local::now());
        let form = FileHostStrategy::form(&artifact).unwrap();
        assert!(!form.boundary().is_empty());
    }
}
