//! Attachment storage.
//!
//! One capability, several interchangeable backends. The backend is chosen once
//! at startup from [`StorageConfig`]; nothing downstream branches on it.

pub mod database;
pub mod local;
pub mod memory;
pub mod object;

use async_trait::async_trait;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{StorageBackend, StorageConfig};
use crate::database::models::NewAttachment;

pub use database::PgBlobStore;
pub use local::LocalDiskStore;
pub use memory::MemoryAttachmentStore;
pub use object::ObjectStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid attachment reference: {0}")]
    InvalidReference(String),

    #[error("Storage misconfigured: {0}")]
    Config(String),

    #[error("Object storage returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Metadata(#[from] serde_json::Error),
}

/// A file received from a client, not yet stored
#[derive(Debug, Clone)]
pub struct Upload {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// A file loaded back from a backend
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub reference: String,
    pub original_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Sidecar metadata kept next to the bytes by backends that have no native
/// place for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMeta {
    pub original_name: String,
    pub content_type: String,
    pub size: i64,
    pub sha256: String,
}

impl FileMeta {
    pub fn for_upload(upload: &Upload) -> Self {
        Self {
            original_name: upload.original_name.clone(),
            content_type: upload.content_type.clone(),
            size: upload.bytes.len() as i64,
            sha256: checksum(&upload.bytes),
        }
    }
}

#[async_trait]
pub trait AttachmentStore: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Persist the upload and return the attachment entry that references it
    async fn put(&self, upload: Upload) -> Result<NewAttachment, StorageError>;

    /// Load a stored file; `Ok(None)` when nothing is stored under `reference`
    async fn get(&self, reference: &str) -> Result<Option<StoredFile>, StorageError>;

    /// Remove a stored file; `Ok(false)` when nothing was stored under `reference`
    async fn delete(&self, reference: &str) -> Result<bool, StorageError>;
}

/// Build the configured backend. `pool` is required by the database backend only.
pub fn from_config(config: &StorageConfig, pool: Option<PgPool>) -> Result<Arc<dyn AttachmentStore>, StorageError> {
    let store: Arc<dyn AttachmentStore> = match config.backend {
        StorageBackend::Local => Arc::new(LocalDiskStore::new(config.local_dir.clone())),
        StorageBackend::Database => {
            let pool = pool.ok_or_else(|| {
                StorageError::Config("database attachment storage needs a Postgres record store".to_string())
            })?;
            Arc::new(PgBlobStore::new(pool))
        }
        StorageBackend::Object => {
            let base = config
                .object_base_url
                .as_deref()
                .ok_or_else(|| StorageError::Config("STORAGE_OBJECT_BASE_URL is not set".to_string()))?;
            Arc::new(ObjectStore::new(base, config.object_token.clone())?)
        }
        StorageBackend::Memory => Arc::new(MemoryAttachmentStore::new()),
    };
    tracing::info!("Attachment storage backend: {}", store.backend());
    Ok(store)
}

/// Generate a fresh opaque reference, keeping a sanitized extension so the
/// stored object stays recognisable.
pub fn new_reference(original_name: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    match extension(original_name) {
        Some(ext) => format!("{}.{}", id, ext),
        None => id,
    }
}

/// References are generated by [`new_reference`]; anything else is refused
/// before it can reach a filesystem path or URL.
pub fn validate_reference(reference: &str) -> Result<(), StorageError> {
    let valid = !reference.is_empty()
        && reference.len() <= 128
        && !reference.starts_with('.')
        && !reference.contains("..")
        && reference.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidReference(reference.to_string()))
    }
}

fn extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

pub fn is_image(content_type: &str) -> bool {
    content_type.trim().to_ascii_lowercase().starts_with("image/")
}

/// Best-effort content type for uploads that arrive without one
pub fn guess_content_type(name: &str) -> &'static str {
    match extension(name).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("csv") => "text/csv",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
