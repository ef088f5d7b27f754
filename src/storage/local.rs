use async_trait::async_trait;
use axum::body::Bytes;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use super::{new_reference, validate_reference, AttachmentStore, FileMeta, StorageError, StoredFile, Upload};
use crate::database::models::NewAttachment;

/// Files under a directory on local disk, each with a `<reference>.meta.json` sidecar
pub struct LocalDiskStore {
    root: PathBuf,
}

impl LocalDiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn paths(&self, reference: &str) -> (PathBuf, PathBuf) {
        (self.root.join(reference), self.root.join(format!("{}.meta.json", reference)))
    }
}

#[async_trait]
impl AttachmentStore for LocalDiskStore {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn put(&self, upload: Upload) -> Result<NewAttachment, StorageError> {
        fs::create_dir_all(&self.root).await?;

        let reference = new_reference(&upload.original_name);
        let meta = FileMeta::for_upload(&upload);
        let (data_path, meta_path) = self.paths(&reference);

        fs::write(&data_path, &upload.bytes).await?;
        fs::write(&meta_path, serde_json::to_vec(&meta)?).await?;

        tracing::debug!("Stored {} ({} bytes) at {}", reference, meta.size, data_path.display());
        Ok(NewAttachment {
            reference,
            original_name: meta.original_name,
            content_type: meta.content_type,
            size: meta.size,
        })
    }

    async fn get(&self, reference: &str) -> Result<Option<StoredFile>, StorageError> {
        validate_reference(reference)?;
        let (data_path, meta_path) = self.paths(reference);

        let bytes = match fs::read(&data_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let meta: Option<FileMeta> = match fs::read(&meta_path).await {
            Ok(raw) => Some(serde_json::from_slice(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let (original_name, content_type) = match meta {
            Some(meta) => (meta.original_name, meta.content_type),
            None => (reference.to_string(), super::guess_content_type(reference).to_string()),
        };

        Ok(Some(StoredFile {
            reference: reference.to_string(),
            original_name,
            content_type,
            bytes: Bytes::from(bytes),
        }))
    }

    async fn delete(&self, reference: &str) -> Result<bool, StorageError> {
        validate_reference(reference)?;
        let (data_path, meta_path) = self.paths(reference);

        let removed = match fs::remove_file(&data_path).await {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        match fs::remove_file(&meta_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(removed)
    }
}
