//! First-frame extraction for video thumbnails.

use crate::error::{GranskaError, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Decode the first frame of a video and write it as a JPEG still.
///
/// The thumbnail lands next to the source at `<video_path>_thumb.jpg`.
/// Returns `None` when no frame could be decoded (corrupt or empty input);
/// this is a reported condition, not an error. The decoder runs as a child
/// process, so its resources are released on every path.
#[instrument(skip_all, fields(video = %video_path.display()))]
pub async fn extract_first_frame(video_path: &Path) -> Result<Option<PathBuf>> {
    let thumb_path = PathBuf::from(format!("{}_thumb.jpg", video_path.display()));

    let result = Command::new("ffmpeg")
        .arg("-i").arg(video_path)
        .arg("-frames:v").arg("1")
        .arg("-q:v").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(&thumb_path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    let status = match result {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GranskaError::ToolNotFound("ffmpeg".into()));
        }
        Err(e) => {
            return Err(GranskaError::Media(format!("ffmpeg execution failed: {e}")));
        }
    };

    let has_frame = status.success()
        && thumb_path
            .metadata()
            .map(|m| m.len() > 0)
            .unwrap_or(false);

    if has_frame {
        debug!("Wrote thumbnail to {}", thumb_path.display());
        Ok(Some(thumb_path))
    } else {
        debug!("No decodable frame");
        // ffmpeg can leave a zero-byte output behind on failure
        let _ = std::fs::remove_file(&thumb_path);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_frame_from_garbage_input() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("broken.mp4");
        std::fs::write(&video, b"not a real video container").unwrap();

        match extract_first_frame(&video).await {
            Ok(frame) => {
                assert!(frame.is_none());
                // No zero-byte thumbnail left behind
                let thumb = PathBuf::from(format!("{}_thumb.jpg", video.display()));
                assert!(!thumb.exists());
            }
            // Environments without ffmpeg surface the tool error instead
            Err(GranskaError::ToolNotFound(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
