//! services/app/src/adapters/image_llm.rs
//!
//! This module contains the adapter for decorative recipe images. It
//! implements the `ImageGenerationService` port from the `core` crate.
//!
//! Images are best-effort: any failure at all (transport, timeout, empty
//! payload, no image in the response) resolves to the fixed fallback image
//! reference. A missing picture must never block plan adoption, so this
//! adapter never returns an error.

use std::time::{Duration, Instant};

use async_openai::{
    config::OpenAIConfig,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;

use chefsync_core::domain::FALLBACK_IMAGE_URL;
use chefsync_core::ports::{ImageGenerationService, PortError, PortResult};

use crate::analytics;

/// Fixed style suffix appended to every image prompt.
const STYLE_SUFFIX: &str = ". Cinematic food photography, warm lighting.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that renders recipe images through an OpenAI-compatible image
/// model, with a quality-tiered model choice.
#[derive(Clone)]
pub struct GeminiImageAdapter {
    client: Client<OpenAIConfig>,
    standard_model: String,
    high_quality_model: String,
    timeout: Duration,
}

impl GeminiImageAdapter {
    /// Creates a new `GeminiImageAdapter`.
    pub fn new(
        client: Client<OpenAIConfig>,
        standard_model: String,
        high_quality_model: String,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            standard_model,
            high_quality_model,
            timeout,
        }
    }

    async fn request_image(&self, prompt: &str, model: &str) -> PortResult<String> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(format!("{prompt}{STYLE_SUFFIX}"))
            .build()
            .map_err(|e| PortError::Generation(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Generation(e.to_string()))?;

        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| PortError::Generation("image request timed out".to_string()))?
            .map_err(|e| PortError::Generation(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| PortError::Generation("image response had no content".to_string()))?;

        extract_image_payload(&content)
            .ok_or_else(|| PortError::Generation("no image part in response".to_string()))
    }
}

/// Pulls an inline `data:image/...` payload out of a response body, whether
/// it arrives bare or embedded in surrounding markup.
fn extract_image_payload(content: &str) -> Option<String> {
    let start = content.find("data:image/")?;
    let tail = &content[start..];
    let end = tail
        .find(|c: char| c.is_whitespace() || matches!(c, ')' | '"' | '\''))
        .unwrap_or(tail.len());
    let payload = &tail[..end];
    // A bare scheme with no payload is not an image.
    if payload.contains("base64,") && !payload.ends_with("base64,") {
        Some(payload.to_string())
    } else {
        None
    }
}

//=========================================================================================
// `ImageGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageGenerationService for GeminiImageAdapter {
    async fn generate_image(&self, prompt: &str, high_quality: bool) -> PortResult<String> {
        let started = Instant::now();
        let model = if high_quality {
            &self.high_quality_model
        } else {
            &self.standard_model
        };

        match self.request_image(prompt, model).await {
            Ok(image) => {
                analytics::measure("generate_image", started, true);
                Ok(image)
            }
            Err(err) => {
                analytics::measure("generate_image", started, false);
                analytics::log_error(
                    &format!("image generation with {model}, using fallback image"),
                    &err,
                );
                Ok(FALLBACK_IMAGE_URL.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_data_url_is_extracted() {
        let content = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(extract_image_payload(content).unwrap(), content);
    }

    #[test]
    fn data_url_inside_markdown_is_extracted() {
        let content = "Here you go: ![dish](data:image/png;base64,iVBORw0KGgo=) enjoy";
        assert_eq!(
            extract_image_payload(content).unwrap(),
            "data:image/png;base64,iVBORw0KGgo="
        );
    }

    #[test]
    fn plain_text_yields_no_image() {
        assert!(extract_image_payload("I cannot draw that.").is_none());
        assert!(extract_image_payload("data:image/png;base64,").is_none());
    }
}
