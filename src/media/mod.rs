//! Media handling for Granska.
//!
//! Covers uploaded asset storage, video frame extraction, and audio track
//! extraction. All decoding work is delegated to ffmpeg.

mod audio;
mod frames;
mod store;

pub use audio::{extract_audio, waveform_path};
pub use frames::extract_first_frame;
pub use store::TempFileStore;

use std::path::Path;

/// Supported image upload extensions.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Supported video upload extensions.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi"];

/// Kind of an uploaded media asset, dispatched on file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a file by its extension, if supported.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    /// Classify a path by its extension, if supported.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Derive the image MIME type for a path from its extension.
///
/// Defaults to JPEG for unknown extensions, which is what the
/// thumbnail encoder produces.
pub fn image_mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_from_extension() {
        assert_eq!(MediaKind::from_extension("jpg"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("JPEG"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_extension("mp4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_extension("MOV"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_extension("pdf"), None);
    }

    #[test]
    fn test_media_kind_from_path() {
        assert_eq!(
            MediaKind::from_path(Path::new("/tmp/clip.avi")),
            Some(MediaKind::Video)
        );
        assert_eq!(MediaKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_image_mime_type() {
        assert_eq!(image_mime_type(Path::new("a.png")), "image/png");
        assert_eq!(image_mime_type(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(image_mime_type(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(image_mime_type(Path::new("a_thumb.jpg")), "image/jpeg");
    }
}
