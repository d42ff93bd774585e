//! OpenAIImageSynthesizer - styled image generation through the Images API.

use crate::openai::{OpenAIClient, map_http_error, map_send_error, openai_config};
use artbooth_core::config::SecretConfig;
use artbooth_core::error::{BoothError, StageFailure};
use artbooth_core::vision::StyleSynthesizer;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

const IMAGE_SIZE: &str = "1024x1024";
const IMAGE_QUALITY: &str = "hd";

/// Generates images with an OpenAI image model.
#[derive(Clone)]
pub struct OpenAIImageSynthesizer {
    client: OpenAIClient,
    model: String,
}

impl OpenAIImageSynthesizer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
            model: model.into(),
        }
    }

    /// Builds a synthesizer from loaded secrets.
    ///
    /// The model defaults to `dall-e-3` when `image_model` is not set.
    pub fn try_from_secrets(secrets: &SecretConfig) -> Result<Self, BoothError> {
        let config = openai_config(secrets)?;
        let model = config
            .image_model
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.into());
        Ok(Self::new(config.api_key.clone(), model))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ImageGenerationRequest<'a> {
        ImageGenerationRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: IMAGE_SIZE,
            quality: IMAGE_QUALITY,
            response_format: "b64_json",
        }
    }

    /// Fetches an image the API returned by URL instead of inline.
    async fn download(&self, url: &str) -> Result<Vec<u8>, StageFailure> {
        let response = self
            .client
            .http()
            .get(url)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| StageFailure::api(format!("Failed to download generated image: {err}")))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl StyleSynthesizer for OpenAIImageSynthesizer {
    async fn synthesize(&self, prompt: &str) -> Result<Vec<u8>, StageFailure> {
        tracing::debug!(
            "[OpenAIImageSynthesizer] Generating with {} ({} char prompt)",
            self.model,
            prompt.chars().count()
        );

        let response: ImageGenerationResponse = self
            .client
            .post_json("images/generations", &self.build_request(prompt))
            .await?;

        let bytes = match first_image(response)? {
            GeneratedImage::Inline(bytes) => bytes,
            GeneratedImage::Remote(url) => self.download(&url).await?,
        };

        if bytes.is_empty() {
            return Err(StageFailure::empty_output("OpenAI API returned an empty image"));
        }
        Ok(bytes)
    }
}

#[derive(Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'static str,
    quality: &'static str,
    response_format: &'static str,
}

#[derive(Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: Option<String>,
    url: Option<String>,
}

#[derive(Debug, PartialEq)]
enum GeneratedImage {
    Inline(Vec<u8>),
    Remote(String),
}

fn first_image(response: ImageGenerationResponse) -> Result<GeneratedImage, StageFailure> {
    let data = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| StageFailure::empty_output("OpenAI API returned no image"))?;

    if let Some(encoded) = data.b64_json.filter(|s| !s.is_empty()) {
        let bytes = BASE64_STANDARD
            .decode(encoded.as_bytes())
            .map_err(|err| StageFailure::api(format!("Failed to decode generated image: {err}")))?;
        return Ok(GeneratedImage::Inline(bytes));
    }

    data.url
        .filter(|url| !url.is_empty())
        .map(GeneratedImage::Remote)
        .ok_or_else(|| StageFailure::empty_output("OpenAI API returned no image"))
}
