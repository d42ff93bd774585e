use super::{rejected, send_error};
use artbooth_core::config::ObjectStorageConfig;
use artbooth_core::publish::{Artifact, PublishStrategy, StrategyError, Visibility};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

/// Uploads the image to an S3-compatible bucket with public-read access.
pub struct ObjectStorageStrategy {
    client: Client,
    config: Option<ObjectStorageConfig>,
}

impl ObjectStorageStrategy {
    pub fn new(client: Client, config: Option<ObjectStorageConfig>) -> Self {
        Self { client, config }
    }

    fn config(&self) -> Result<&ObjectStorageConfig, StrategyError> {
        self.config
            .as_ref()
            .ok_or_else(|| StrategyError::unavailable("object storage credentials not configured"))
    }

    /// Writes `bytes` under `key` and returns the object's public URL.
    pub async fn put(
        &self,
        bytes: Vec<u8>,
        key: &str,
        content_type: &str,
        visibility: Visibility,
    ) -> Result<String, StrategyError> {
        let config = self.config()?;
        let url = object_url(config, key);
        let acl = match visibility {
            Visibility::PublicRead => "public-read",
            Visibility::Private => "private",
        };

        tracing::debug!("[ObjectStorage] PUT {} ({} bytes)", url, bytes.len());

        let response = self
            .client
            .put(&url)
            .bearer_auth(&config.access_token)
            .header("x-amz-acl", acl)
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(rejected(status, &body));
        }

        Ok(public_url(config, key))
    }
}

fn object_url(config: &ObjectStorageConfig, key: &str) -> String {
    format!(
        "{}/{}/{}",
        config.endpoint.trim_end_matches('/'),
        config.bucket.trim_matches('/'),
        key
    )
}

fn public_url(config: &ObjectStorageConfig, key: &str) -> String {
    format!("{}/{}", config.public_base_url.trim_end_matches('/'), key)
}

#[async_trait]
impl PublishStrategy for ObjectStorageStrategy {
    fn name(&self) -> &str {
        "object_storage"
    }

    async fn publish(&self, artifact: &Artifact) -> Result<String, StrategyError> {
        self.put(
            artifact.bytes().to_vec(),
            artifact.file_name(),
            artifact.content_type(),
            Visibility::PublicRead,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn config() -> ObjectStorageConfig {
        ObjectStorageConfig {
            endpoint: "https://s3.example.com/".into(),
            bucket: "booth".into(),
            access_token: "token".into(),
            public_base_url: "https://cdn.example.com/".into(),
        }
    }

    #[tokio::test]
    async fn test_unavailable_without_credentials() {
        let strategy = ObjectStorageStrategy::new(Client::new(), None);
        let artifact = Artifact::new(vec![1u8, 2, 3], "anime", Local::now());

        let err = strategy.publish(&artifact).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_urls() {
        let config = config();
        assert_eq!(
            object_url(&config, "styled_anime_1.png"),
            "https://s3.example.com/booth/styled_anime_1.png"
        );
        assert_eq!(
            public_url(&config, "styled_anime_1.png"),
            "https://cdn.example.com/styled_anime_1.png"
        );
    }
}
