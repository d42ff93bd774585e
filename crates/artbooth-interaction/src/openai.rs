//! HTTP plumbing shared by the OpenAI clients.

use artbooth_core::config::{OpenAIConfig, SecretConfig};
use artbooth_core::error::{BoothError, StageFailure};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

pub(crate) const API_BASE: &str = "https://api.openai.com/v1";

/// Authenticated OpenAI HTTP client.
#[derive(Clone)]
pub(crate) struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    pub(crate) fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: API_BASE.to_string(),
        }
    }

    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// POSTs `body` to `{base_url}/{path}` and decodes the JSON response.
    pub(crate) async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, StageFailure>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            let status = response.status();
            if let Some(delay) = parse_retry_after(response.headers().get("retry-after")) {
                tracing::warn!("[OpenAI] {} asked to retry after {:?}", path, delay);
            }
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        response
            .json()
            .await
            .map_err(|err| StageFailure::api(format!("Failed to parse OpenAI response: {err}")))
    }
}

/// Picks the OpenAI section out of the loaded secrets.
pub(crate) fn openai_config(secrets: &SecretConfig) -> Result<&OpenAIConfig, BoothError> {
    secrets
        .openai
        .as_ref()
        .filter(|config| !config.api_key.trim().is_empty())
        .ok_or_else(|| {
            BoothError::config(
                "OpenAI API key not found in secret.json or the OPENAI_API_KEY environment variable",
            )
        })
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub(crate) fn map_http_error(status: StatusCode, body: &str) -> StageFailure {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = if message.is_empty() {
        format!("OpenAI API returned HTTP {}", status.as_u16())
    } else {
        message
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => StageFailure::rate_limited(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StageFailure::authentication(message),
        _ => StageFailure::api(message),
    }
}

pub(crate) fn map_send_error(err: reqwest::Error) -> StageFailure {
    if err.is_timeout() {
        StageFailure::timeout(format!("OpenAI API request timed out: {err}"))
    } else {
        StageFailure::api(format!("OpenAI API request failed: {err}"))
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use artbooth_core::error::FailureKind;

    #[test]
    fn test_rate_limit_keeps_provider_message() {
        let body = r#"{"error":{"message":"Rate limit reached for dall-e-3","type":"requests","code":"rate_limit_exceeded"}}"#;
        let failure = map_http_error(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(failure.kind, FailureKind::RateLimited);
        assert_eq!(failure.message, "Rate limit reached for dall-e-3");
    }

    #[test]
    fn test_auth_errors() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let failure = map_http_error(status, "nope");
            assert_eq!(failure.kind, FailureKind::Authentication);
            assert_eq!(failure.message, "nope");
        }
    }

    #[test]
    fn test_other_errors_are_api_failures() {
        let failure = map_http_error(StatusCode::BAD_GATEWAY, "");
        assert_eq!(failure.kind, FailureKind::Api);
        assert_eq!(failure.message, "OpenAI API returned HTTP 502");
    }

    #[test]
    fn test_parse_retry_after() {
        let value = HeaderValue::from_static("12");
        assert_eq!(parse_retry_after(Some(&value)), Some(Duration::from_secs(12)));
        let date = HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(Some(&date)), None);
        assert_eq!(parse_retry_after(None), None);
    }

    #[test]
    fn test_openai_config_requires_key() {
        let secrets = SecretConfig {
            openai: Some(OpenAIConfig {
                api_key: "  ".into(),
                vision_model: None,
                image_model: None,
            }),
            object_storage: None,
        };
        assert!(openai_config(&secrets).is_err());
        assert!(openai_config(&SecretConfig::default()).is_err());
    }
}
