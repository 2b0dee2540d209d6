//! Multipart extraction and temporary upload storage.

use axum::{
    body::Bytes,
    extract::{Multipart, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use super::state::ServerConfig;
use crate::error::BrailleError;

/// Name of the multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Errors surfaced to HTTP clients by the upload endpoint.
#[derive(Debug, Error)]
pub enum UploadError {
    /// No `image` field in the form
    #[error("No image uploaded.")]
    MissingInput,

    /// The `image` field is not an accepted MIME type
    #[error("Please upload only images.")]
    UnsupportedMedia(String),

    /// The request body could not be parsed or was too large
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// Storing, decoding or rasterizing the upload failed
    #[error("Error processing image.")]
    Processing(#[from] BrailleError),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::MissingInput => StatusCode::BAD_REQUEST,
            UploadError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            UploadError::Multipart(e) => e.status(),
            UploadError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match &self {
            UploadError::Processing(e) => tracing::error!(error = %e, "upload processing failed"),
            UploadError::UnsupportedMedia(mime) => {
                tracing::info!(mime = %mime, "rejected non-image upload")
            }
            other => tracing::info!(error = %other, "rejected upload"),
        }
        (self.status(), self.to_string()).into_response()
    }
}

/// The image field pulled out of a multipart form.
#[derive(Debug)]
pub struct ImageField {
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
}

/// Find the `image` field, check its MIME type and read its contents.
///
/// Other fields are skipped. The MIME check runs before the field body is
/// read, so rejected uploads are never buffered or stored. When the client
/// sends no content type, one is guessed from the file name.
pub async fn read_image_field(
    multipart: &mut Multipart,
    config: &ServerConfig,
) -> Result<ImageField, UploadError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("unknown").to_string();
        let mime = match field.content_type() {
            Some(ct) => ct.to_string(),
            None => mime_guess::from_path(&file_name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string(),
        };

        if !config.accepts_mime(&mime) {
            return Err(UploadError::UnsupportedMedia(mime));
        }

        let bytes = field.bytes().await?;
        return Ok(ImageField {
            file_name,
            mime,
            bytes,
        });
    }

    Err(UploadError::MissingInput)
}

/// An upload written to disk, removed again when the guard is dropped.
///
/// Dropping covers every exit path of a request: success, decode failure,
/// a panicking worker, or the client going away mid-request.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Write `bytes` to a fresh file under `dir`.
    pub async fn persist(dir: &Path, bytes: &[u8]) -> Result<Self, BrailleError> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let name = format!("{}-{}-{}.upload", IMAGE_FIELD, millis, Uuid::new_v4().simple());

        // Guard first so a partial write is cleaned up too.
        let upload = Self {
            path: dir.join(name),
        };
        tokio::fs::write(&upload.path, bytes).await?;
        tracing::debug!(path = %upload.path.display(), size = bytes.len(), "stored upload");
        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to delete upload"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_temp_upload_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let upload = TempUpload::persist(dir.path(), b"payload").await.unwrap();

        assert_eq!(std::fs::read(upload.path()).unwrap(), b"payload");
        assert_eq!(entries(dir.path()), 1);

        drop(upload);
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_temp_upload_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = TempUpload::persist(dir.path(), b"a").await.unwrap();
        let b = TempUpload::persist(dir.path(), b"b").await.unwrap();

        assert_ne!(a.path(), b.path());
        assert!(
            a.path()
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("image-")
        );
    }

    #[tokio::test]
    async fn test_drop_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let upload = TempUpload::persist(dir.path(), b"x").await.unwrap();
        std::fs::remove_file(upload.path()).unwrap();
        drop(upload);
    }

    #[tokio::test]
    async fn test_persist_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = TempUpload::persist(&missing, b"x").await.unwrap_err();
        assert!(matches!(err, BrailleError::Io(_)));
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(UploadError::MissingInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            UploadError::UnsupportedMedia("text/plain".into()).status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            UploadError::Processing(BrailleError::Decode("bad".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_processing_error_hides_detail() {
        let err = UploadError::Processing(BrailleError::Decode("secret path".into()));
        assert_eq!(err.to_string(), "Error processing image.");
    }
}
