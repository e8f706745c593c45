//! Transcription module for Granska.
//!
//! Extracts a video's audio track and runs speech-to-text on it. The
//! transcriber never fails: every outcome is a displayable string, with
//! fixed sentinel messages for the failure cases, so callers can always
//! show the result to the user.

mod whisper;

pub use whisper::{is_api_key_configured, WhisperTranscriber};

use async_trait::async_trait;
use std::path::Path;

/// Sentinel returned when the backend produced no recognizable speech.
pub const SENTINEL_NOT_UNDERSTOOD: &str = "Could not understand audio";

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio track of a video file.
    ///
    /// Always returns displayable text: the recognized speech on success,
    /// or a sentinel message describing the failure.
    async fn transcribe(&self, video_path: &Path) -> String;
}
