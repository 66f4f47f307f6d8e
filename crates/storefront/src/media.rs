//! Upload persistence for product media.
//!
//! Product videos may arrive inline as `data:video/<type>;base64,<payload>`
//! URIs. Those are decoded and written under `<upload_dir>/videos/`, and the
//! product stores the public path (`/uploads/videos/<file>`) instead. Any
//! other string (URL, existing upload path) is kept as given.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use rand::RngCore;
use thiserror::Error;
use tracing::{debug, instrument};

/// URL prefix the upload directory is served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

const VIDEO_SUBDIR: &str = "videos";
const DEFAULT_VIDEO_EXTENSION: &str = "mp4";

/// Errors raised while persisting uploaded media.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The data URI is not of the form `data:<type>;base64,<payload>`.
    #[error("malformed data URI")]
    MalformedDataUri,

    /// The data URI carries something other than a video.
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),

    /// The payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Writing to the upload directory failed.
    #[error("upload I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Whether the error was caused by the request payload.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Writes uploaded media to disk.
#[derive(Debug, Clone)]
pub struct MediaStore {
    upload_dir: PathBuf,
}

impl MediaStore {
    /// Create a media store rooted at `upload_dir`.
    #[must_use]
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Directory uploads are written to and served from.
    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Create the upload directories if missing.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Io` if the directories cannot be created.
    pub async fn ensure_dirs(&self) -> Result<(), MediaError> {
        tokio::fs::create_dir_all(self.upload_dir.join(VIDEO_SUBDIR)).await?;
        Ok(())
    }

    /// Persist every inline video in `videos`, keeping order.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` on the first video that cannot be decoded or written.
    pub async fn persist_videos(&self, videos: Vec<String>) -> Result<Vec<String>, MediaError> {
        let mut stored = Vec::with_capacity(videos.len());
        for video in videos {
            if video.starts_with("data:") {
                stored.push(self.save_video(&video).await?);
            } else {
                stored.push(video);
            }
        }
        Ok(stored)
    }

    /// Decode a `data:video/...;base64,` URI and write it to disk.
    ///
    /// Returns the public path of the written file.
    ///
    /// # Errors
    ///
    /// Returns `MediaError` if the URI is malformed, is not a video, or the
    /// file cannot be written.
    #[instrument(skip(self, data_uri), fields(len = data_uri.len()))]
    pub async fn save_video(&self, data_uri: &str) -> Result<String, MediaError> {
        let (mime, payload) = split_data_uri(data_uri)?;
        let extension = video_extension(mime)?;
        let bytes = STANDARD.decode(payload.trim())?;

        let filename = format!(
            "{}-{}.{extension}",
            Utc::now().timestamp_millis(),
            random_hex(8)
        );
        let dir = self.upload_dir.join(VIDEO_SUBDIR);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&filename), &bytes).await?;

        debug!(%filename, bytes = bytes.len(), "Stored uploaded video");
        Ok(format!("{UPLOADS_ROUTE}/{VIDEO_SUBDIR}/{filename}"))
    }
}

/// Split `data:<mime>;base64,<payload>` into its media type and payload.
fn split_data_uri(uri: &str) -> Result<(&str, &str), MediaError> {
    let rest = uri.strip_prefix("data:").ok_or(MediaError::MalformedDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(MediaError::MalformedDataUri)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(MediaError::MalformedDataUri)?;
    Ok((mime, payload))
}

/// File extension for a video media type.
fn video_extension(mime: &str) -> Result<String, MediaError> {
    let subtype = mime
        .strip_prefix("video/")
        .ok_or_else(|| MediaError::UnsupportedType(mime.to_string()))?;
    // Parameters such as `;codecs=...` are not part of the subtype.
    let subtype = subtype.split(';').next().unwrap_or_default();

    let extension = match subtype {
        "quicktime" => "mov".to_string(),
        "x-matroska" => "mkv".to_string(),
        "x-msvideo" => "avi".to_string(),
        other => other
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase(),
    };

    if extension.is_empty() {
        Ok(DEFAULT_VIDEO_EXTENSION.to_string())
    } else {
        Ok(extension)
    }
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(len * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_data_uri() {
        let (mime, payload) = split_data_uri("data:video/mp4;base64,AAEC").unwrap();
        assert_eq!(mime, "video/mp4");
        assert_eq!(payload, "AAEC");

        assert!(matches!(
            split_data_uri("data:video/mp4,AAEC"),
            Err(MediaError::MalformedDataUri)
        ));
    }

    #[test]
    fn test_video_extension() {
        assert_eq!(video_extension("video/webm").unwrap(), "webm");
        assert_eq!(video_extension("video/quicktime").unwrap(), "mov");
        assert_eq!(video_extension("video/../etc").unwrap(), "etc");
        assert!(matches!(
            video_extension("image/png"),
            Err(MediaError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_random_hex_length() {
        let hex = random_hex(8);
        assert_eq!(hex.len(), 16);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_save_video_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());

        let path = media
            .save_video(&format!("data:video/mp4;base64,{}", STANDARD.encode(b"movie")))
            .await
            .unwrap();

        assert!(path.starts_with("/uploads/videos/"));
        assert!(path.ends_with(".mp4"));
        let file = path.trim_start_matches("/uploads/");
        let written = tokio::fs::read(dir.path().join(file)).await.unwrap();
        assert_eq!(written, b"movie");
    }

    #[tokio::test]
    async fn test_persist_videos_keeps_urls_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());

        let stored = media
            .persist_videos(vec![
                "https://cdn.example.com/a.mp4".to_string(),
                format!("data:video/webm;base64,{}", STANDARD.encode(b"b")),
                "/uploads/videos/existing.mp4".to_string(),
            ])
            .await
            .unwrap();

        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0], "https://cdn.example.com/a.mp4");
        assert!(stored[1].ends_with(".webm"));
        assert_eq!(stored[2], "/uploads/videos/existing.mp4");
    }

    #[tokio::test]
    async fn test_bad_payload_is_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());

        let err = media
            .save_video("data:video/mp4;base64,@@@")
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
