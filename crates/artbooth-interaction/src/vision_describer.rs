//! OpenAIVisionDescriber - scene description through the Chat Completions API.

use crate::openai::{OpenAIClient, openai_config};
use artbooth_core::config::SecretConfig;
use artbooth_core::error::{BoothError, StageFailure};
use artbooth_core::photo::ValidatedImage;
use artbooth_core::vision::VisionDescriber;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";

/// Instruction sent alongside the photo.
pub const DESCRIBE_INSTRUCTION: &str = "Describe this image focusing on pose, facial features, clothing, background, and composition. Be specific about positioning for accurate recreation.";

const MAX_TOKENS: u32 = 400;

/// Describes photos with a vision-capable chat model.
#[derive(Clone)]
pub struct OpenAIVisionDescriber {
    client: OpenAIClient,
    model: String,
    max_tokens: u32,
}

impl OpenAIVisionDescriber {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
            model: model.into(),
            max_tokens: MAX_TOKENS,
        }
    }

    /// Builds a describer from loaded secrets.
    ///
    /// The model defaults to `gpt-4o` when `vision_model` is not set.
    pub fn try_from_secrets(secrets: &SecretConfig) -> Result<Self, BoothError> {
        let config = openai_config(secrets)?;
        let model = config
            .vision_model
            .clone()
            .unwrap_or_else(|| DEFAULT_VISION_MODEL.into());
        Ok(Self::new(config.api_key.clone(), model))
    }

    /// Points the client at an OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, image: &ValidatedImage) -> ChatCompletionRequest {
        let data_url = format!(
            "data:{};base64,{}",
            image.mime_type(),
            BASE64_STANDARD.encode(image.bytes())
        );

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    MessageContent::Text {
                        text: DESCRIBE_INSTRUCTION.to_string(),
                    },
                    MessageContent::ImageUrl {
                        image_url: ImageUrl {
                            url: data_url,
                            detail: "high",
                        },
                    },
                ],
            }],
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl VisionDescriber for OpenAIVisionDescriber {
    async fn describe(&self, image: &ValidatedImage) -> Result<String, StageFailure> {
        let request = self.build_request(image);
        tracing::debug!(
            "[OpenAIVisionDescriber] Describing {} byte {} image with {}",
            image.len(),
            image.mime_type(),
            self.model
        );

        let response: ChatCompletionResponse =
            self.client.post_json("chat/completions", &request).await?;
        extract_description(response)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<MessageContent>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MessageContent {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
    detail: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn extract_description(response: ChatCompletionResponse) -> Result<String, StageFailure> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| StageFailure::empty_output("OpenAI API returned no description"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use artbooth_core::error::FailureKind;
    use artbooth_core::photo::{ImageLimits, ImageValidator};
    use std::io::Cursor;

    fn png() -> ValidatedImage {
        let mut bytes = Vec::new();
        image::RgbImage::new(2, 2)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        ImageValidator::new(ImageLimits::default())
            .validate(bytes)
            .unwrap()
    }

    #[test]
    fn test_request_shape() {
        let describer = OpenAIVisionDescriber::new("sk-test", DEFAULT_VISION_MODEL);
        let request = serde_json::to_value(describer.build_request(&png())).unwrap();

        assert_eq!(request["model"], "gpt-4o");
        assert_eq!(request["max_tokens"], 400);
        let content = &request["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], DESCRIBE_INSTRUCTION);
        assert_eq!(content[1]["type"], "image_url");
        assert_eq!(content[1]["image_url"]["detail"], "high");
        assert!(
            content[1]["image_url"]["url"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );
    }

    #[test]
    fn test_extract_description() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"  a person smiling \n"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_description(response).unwrap(), "a person smiling");
    }

    #[test]
    fn test_blank_description_is_empty_output() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
        ] {
            let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
            let failure = extract_description(response).unwrap_err();
            assert_eq!(failure.kind, FailureKind::EmptyOutput);
        }
    }

    #[test]
    fn test_model_from_secrets() {
        let secrets: SecretConfig = serde_json::from_str(
            r#"{"openai":{"api_key":"sk-test","vision_model":"gpt-4o-mini"}}"#,
        )
        .unwrap();
        let describer = OpenAIVisionDescriber::try_from_secrets(&secrets).unwrap();
        assert_eq!(describer.model(), "gpt-4o-mini");
    }
}
