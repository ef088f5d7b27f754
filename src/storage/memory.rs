use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{new_reference, AttachmentStore, StorageError, StoredFile, Upload};
use crate::database::models::NewAttachment;

/// Attachments held in process memory
#[derive(Default)]
pub struct MemoryAttachmentStore {
    files: RwLock<HashMap<String, StoredFile>>,
}

impl MemoryAttachmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files currently held
    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl AttachmentStore for MemoryAttachmentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, upload: Upload) -> Result<NewAttachment, StorageError> {
        let reference = new_reference(&upload.original_name);
        let attachment = NewAttachment {
            reference: reference.clone(),
            original_name: upload.original_name.clone(),
            content_type: upload.content_type.clone(),
            size: upload.bytes.len() as i64,
        };

        self.files.write().await.insert(
            reference.clone(),
            StoredFile {
                reference,
                original_name: upload.original_name,
                content_type: upload.content_type,
                bytes: upload.bytes,
            },
        );
        Ok(attachment)
    }

    async fn get(&self, reference: &str) -> Result<Option<StoredFile>, StorageError> {
        Ok(self.files.read().await.get(reference).cloned())
    }

    async fn delete(&self, reference: &str) -> Result<bool, StorageError> {
        Ok(self.files.write().await.remove(reference).is_some())
    }
}
