//! OpenAI-backed implementation of the `VisionTagger` port.
//!
//! Fetches the image bytes back from storage, ships them to a vision-capable
//! chat model as a base64 data URL, and parses the comma-separated keyword
//! reply. Every failure mode here is swallowed by the ingestion pipeline, so
//! errors only need enough detail for the logs.

use async_trait::async_trait;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use domains::{AppError, Result, VisionTagger};

/// Images above this size are refused rather than base64-inflated.
const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

const TAGGING_PROMPT: &str = "Analyze this image in detail and generate 10-15 descriptive \
    tags/keywords. Include: 1) Main subjects (people, animals, objects), 2) Clothing items and \
    colors (e.g., 'black t-shirt', 'blue jeans'), 3) Actions or activities, 4) Setting/location, \
    5) Mood or atmosphere, 6) Notable details. Return ONLY comma-separated tags in lowercase, \
    no explanations or extra text.";

#[derive(Clone)]
pub struct VisionConfig {
    pub api_key: SecretString,
    pub model: String,
    pub endpoint: String,
}

pub struct OpenAiVisionTagger {
    http: reqwest::Client,
    config: VisionConfig,
}

impl OpenAiVisionTagger {
    pub fn new(http: reqwest::Client, config: VisionConfig) -> Self {
        Self { http, config }
    }

    async fn fetch_image(&self, image_url: &str) -> Result<(Vec<u8>, String)> {
        let response = self
            .http
            .get(image_url)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("failed to fetch image: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamRejection {
                status: status.as_u16(),
                body: "failed to fetch image for tagging".into(),
            });
        }
        let mime = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Transport(format!("failed to read image body: {e}")))?;
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::Validation(format!(
                "image too large for tagging: {} bytes",
                bytes.len()
            )));
        }
        Ok((bytes.to_vec(), mime))
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Splits the model's reply on commas; trims, lowercases, drops empties.
fn parse_tags(reply: &str) -> Vec<String> {
    reply
        .split(',')
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[async_trait]
impl VisionTagger for OpenAiVisionTagger {
    async fn tag(&self, image_url: &str, bearer: &str) -> Result<Vec<String>> {
        if bearer.is_empty() {
            return Err(AppError::Unauthorized(
                "tagging requires the caller's authorization context".into(),
            ));
        }
        if self.config.api_key.expose_secret().is_empty() {
            return Err(AppError::NotConfigured("vision tagger API key".into()));
        }

        let (image, mime) = self.fetch_image(image_url).await?;
        debug!(size = image.len(), %mime, "image fetched for tagging");
        let encoded = base64::engine::general_purpose::STANDARD.encode(&image);

        let body = json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": TAGGING_PROMPT },
                    { "type": "image_url", "image_url": { "url": format!("data:{mime};base64,{encoded}") } },
                ],
            }],
            "max_tokens": 150,
        });

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("vision API unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamRejection {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamRejection {
                status: status.as_u16(),
                body: format!("unparseable vision API response: {e}"),
            })?;
        let reply = parsed
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or_default();

        Ok(parse_tags(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tags_trims_lowercases_and_drops_empties() {
        assert_eq!(
            parse_tags("Beach, Golden Hour ,  , sunset,"),
            vec!["beach", "golden hour", "sunset"]
        );
    }

    #[test]
    fn parse_tags_of_empty_reply_is_empty() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_network_call() {
        let tagger = OpenAiVisionTagger::new(
            reqwest::Client::new(),
            VisionConfig {
                api_key: SecretString::from(""),
                model: "gpt-4o-mini".into(),
                endpoint: "https://api.openai.com/v1/chat/completions".into(),
            },
        );
        let result = tagger.tag("https://example.com/a.jpg", "token").await;
        assert!(matches!(result, Err(AppError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn empty_bearer_is_rejected() {
        let tagger = OpenAiVisionTagger::new(
            reqwest::Client::new(),
            VisionConfig {
                api_key: SecretString::from("sk-test"),
                model: "gpt-4o-mini".into(),
                endpoint: "https://api.openai.com/v1/chat/completions".into(),
            },
        );
        let result = tagger.tag("https://example.com/a.jpg", "").await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
