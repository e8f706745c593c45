//! OpenAI Whisper transcription implementation.

use super::{Transcriber, SENTINEL_NOT_UNDERSTOOD};
use crate::media::{extract_audio, waveform_path};
use crate::openai::create_client;
use async_openai::error::OpenAIError;
use async_openai::types::CreateTranscriptionRequestArgs;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Internal failure classification, mapped to sentinel strings by `transcribe`.
enum RecognizeFailure {
    /// The speech backend could not be reached or rejected the request.
    Request(String),
    /// Anything else: transcode issues, unreadable waveform, bad request build.
    Other(String),
}

/// OpenAI Whisper-based transcriber.
pub struct WhisperTranscriber {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl WhisperTranscriber {
    /// Create a new Whisper transcriber with the default model.
    pub fn new() -> Self {
        Self::with_model("whisper-1")
    }

    /// Create a new Whisper transcriber with a custom model.
    pub fn with_model(model: &str) -> Self {
        Self {
            client: create_client(),
            model: model.to_string(),
        }
    }

    /// Extract the waveform and run recognition on it.
    async fn recognize(
        &self,
        video_path: &Path,
        audio_path: &Path,
    ) -> std::result::Result<String, RecognizeFailure> {
        extract_audio(video_path, audio_path)
            .await
            .map_err(|e| RecognizeFailure::Other(e.to_string()))?;

        // A failed extraction above still returns Ok; it surfaces here
        // as an unreadable or empty waveform.
        let waveform = tokio::fs::read(audio_path)
            .await
            .map_err(|e| RecognizeFailure::Other(e.to_string()))?;

        let filename = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        let request = CreateTranscriptionRequestArgs::default()
            .file(async_openai::types::AudioInput::from_vec_u8(
                filename, waveform,
            ))
            .model(&self.model)
            .build()
            .map_err(|e| RecognizeFailure::Other(e.to_string()))?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| match e {
                OpenAIError::ApiError(_) | OpenAIError::Reqwest(_) => {
                    RecognizeFailure::Request(e.to_string())
                }
                other => RecognizeFailure::Other(other.to_string()),
            })?;

        debug!("Recognized {} characters", response.text.len());
        Ok(response.text)
    }
}

impl Default for WhisperTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, video_path: &Path) -> String {
        let audio_path = waveform_path(video_path);

        let outcome = self.recognize(video_path, &audio_path).await;

        // The waveform is removed no matter how recognition went.
        let _ = tokio::fs::remove_file(&audio_path).await;

        match outcome {
            Ok(text) if text.trim().is_empty() => SENTINEL_NOT_UNDERSTOOD.to_string(),
            Ok(text) => text,
            Err(RecognizeFailure::Request(e)) => format!("Could not request results; {}", e),
            Err(RecognizeFailure::Other(e)) => format!("Transcribe Failed {}", e),
        }
    }
}

/// Check if the OpenAI API key is configured.
pub fn is_api_key_configured() -> bool {
    std::env::var("OPENAI_API_KEY").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_input_yields_sentinel_and_removes_waveform() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("noise.mp4");
        std::fs::write(&video, b"definitely not a video").unwrap();

        let transcriber = WhisperTranscriber::new();
        let text = transcriber.transcribe(&video).await;

        // Every failure path produces one of the fixed sentinels.
        assert!(
            text.starts_with("Transcribe Failed")
                || text.starts_with("Could not request results;")
                || text == SENTINEL_NOT_UNDERSTOOD,
            "unexpected transcript: {text}"
        );

        // The intermediate waveform never survives the attempt.
        assert!(!waveform_path(&video).exists());
    }

    #[test]
    fn test_api_key_check() {
        let _ = is_api_key_configured();
    }
}
