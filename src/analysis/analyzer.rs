//! Generative-AI content analysis.

use crate::error::{GranskaError, Result};
use crate::media::image_mime_type;
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageUrlArgs,
};
use base64::Engine;
use std::path::Path;
use tracing::{debug, instrument};

/// Submits analysis prompts, optionally with an image attachment, to a
/// vision-capable chat model.
///
/// The analyzer always returns a displayable string: generated text on
/// success, or an `"Analysis Failed: ..."` sentinel on any backend failure.
/// Every caller relies on this contract.
pub struct ContentAnalyzer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl ContentAnalyzer {
    /// Create an analyzer with default settings.
    pub fn new() -> Self {
        Self::with_config("gpt-4o-mini", 0.7)
    }

    /// Create an analyzer with a custom model and temperature.
    pub fn with_config(model: &str, temperature: f32) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
            temperature,
        }
    }

    /// Analyze content and return displayable text.
    ///
    /// A supplied transcript is appended to the prompt as a labeled section.
    /// A supplied image is read from disk and attached inline with its MIME
    /// type. Failures become the `"Analysis Failed: ..."` sentinel, never an
    /// error.
    #[instrument(skip_all, fields(model = %self.model, image = image_path.is_some()))]
    pub async fn analyze(
        &self,
        prompt: &str,
        image_path: Option<&Path>,
        transcript: Option<&str>,
    ) -> String {
        match self.request(prompt, image_path, transcript).await {
            Ok(text) => text,
            Err(e) => format!("Analysis Failed: {}", e),
        }
    }

    async fn request(
        &self,
        prompt: &str,
        image_path: Option<&Path>,
        transcript: Option<&str>,
    ) -> Result<String> {
        let content = compose_prompt(prompt, transcript);

        let message: ChatCompletionRequestMessage = match image_path {
            Some(path) => {
                let image_bytes = tokio::fs::read(path).await?;
                let encoded = base64::engine::general_purpose::STANDARD.encode(&image_bytes);
                let data_url = format!("data:{};base64,{}", image_mime_type(path), encoded);

                let parts: Vec<ChatCompletionRequestUserMessageContentPart> = vec![
                    ChatCompletionRequestMessageContentPartTextArgs::default()
                        .text(content)
                        .build()
                        .map_err(|e| GranskaError::OpenAI(e.to_string()))?
                        .into(),
                    ChatCompletionRequestMessageContentPartImageArgs::default()
                        .image_url(
                            ImageUrlArgs::default()
                                .url(data_url)
                                .build()
                                .map_err(|e| GranskaError::OpenAI(e.to_string()))?,
                        )
                        .build()
                        .map_err(|e| GranskaError::OpenAI(e.to_string()))?
                        .into(),
                ];

                ChatCompletionRequestUserMessageArgs::default()
                    .content(parts)
                    .build()
                    .map_err(|e| GranskaError::OpenAI(e.to_string()))?
                    .into()
            }
            None => ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| GranskaError::OpenAI(e.to_string()))?
                .into(),
        };

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message])
            .temperature(self.temperature)
            .build()
            .map_err(|e| GranskaError::OpenAI(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| GranskaError::OpenAI(e.to_string()))?;

        let text = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| GranskaError::OpenAI("Empty response from model".to_string()))?
            .clone();

        debug!("Generated {} characters", text.len());
        Ok(text)
    }
}

impl Default for ContentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the full prompt text, appending the transcript as a labeled section.
fn compose_prompt(prompt: &str, transcript: Option<&str>) -> String {
    match transcript {
        Some(t) => format!("{}\n\nTranscription: {}", prompt, t),
        None => prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_prompt_without_transcript() {
        assert_eq!(compose_prompt("Describe this.", None), "Describe this.");
    }

    #[test]
    fn test_compose_prompt_labels_transcript() {
        let composed = compose_prompt("Analyze this video.", Some("hello world"));
        assert_eq!(
            composed,
            "Analyze this video.\n\nTranscription: hello world"
        );
    }

    #[tokio::test]
    async fn test_missing_image_yields_sentinel() {
        let analyzer = ContentAnalyzer::new();
        let result = analyzer
            .analyze(
                "Provide a detailed analysis of the image.",
                Some(Path::new("/nonexistent/photo.jpg")),
                None,
            )
            .await;
        assert!(result.starts_with("Analysis Failed: "), "got: {result}");
    }
}
