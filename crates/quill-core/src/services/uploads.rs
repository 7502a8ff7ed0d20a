//! Image upload validation, naming and retrieval.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;

use crate::error::DomainError;
use crate::ports::{FileStore, TokenClaims};

/// Upload size ceiling: 5 MiB.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Declared MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// File extensions accepted for upload, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub filename: String,
    pub url: String,
    pub size: usize,
    pub content_type: String,
}

/// File contents ready to be served.
#[derive(Debug, Clone)]
pub struct ServedFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Content type for a stored image, from its extension (JPEG by default).
pub fn content_type_for(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// Only plain names are ever resolved against the store.
fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains("..")
        && !name.contains(['/', '\\', '\0'])
}

fn generate_filename(extension: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..=1_000_000_000);
    format!(
        "blog-{}-{}.{}",
        Utc::now().timestamp_millis(),
        suffix,
        extension
    )
}

/// Stores, serves and deletes uploaded images.
#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn FileStore>,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self {
            store,
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Validate type, extension and size, then write under a fresh name.
    pub async fn store(
        &self,
        bytes: &[u8],
        mime_type: &str,
        original_filename: &str,
        actor: &TokenClaims,
    ) -> Result<StoredUpload, DomainError> {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        let extension = original_filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

        let Some(extension) = extension.filter(|_| ALLOWED_MIME_TYPES.contains(&mime_type.as_str()))
        else {
            return Err(DomainError::validation(
                "file type not allowed; only JPEG, PNG, GIF and WebP images are accepted",
            ));
        };

        if bytes.len() > self.max_bytes {
            return Err(DomainError::validation(format!(
                "file too large; maximum size is {} bytes",
                self.max_bytes
            )));
        }

        let filename = generate_filename(extension);
        self.store.write(&filename, bytes).await?;
        tracing::info!(
            filename = %filename,
            size = bytes.len(),
            actor = %actor.username,
            "Image uploaded"
        );

        Ok(StoredUpload {
            url: format!("/uploads/{filename}"),
            filename,
            size: bytes.len(),
            content_type: mime_type,
        })
    }

    /// Delete an uploaded file. Posts referencing it are left untouched.
    pub async fn remove(&self, filename: &str, actor: &TokenClaims) -> Result<(), DomainError> {
        if !is_plain_filename(filename) {
            return Err(DomainError::validation("invalid filename"));
        }
        if !self.store.delete(filename).await? {
            return Err(DomainError::not_found("File", filename));
        }
        tracing::info!(filename = %filename, actor = %actor.username, "Image deleted");
        Ok(())
    }

    pub async fn serve(&self, filename: &str) -> Result<ServedFile, DomainError> {
        if !is_plain_filename(filename) {
            return Err(DomainError::not_found("File", filename));
        }
        let bytes = self
            .store
            .read(filename)
            .await?
            .ok_or_else(|| DomainError::not_found("File", filename))?;

        Ok(ServedFile {
            bytes,
            content_type: content_type_for(filename),
        })
    }
}
