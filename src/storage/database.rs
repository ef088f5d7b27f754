use async_trait::async_trait;
use axum::body::Bytes;
use sqlx::PgPool;

use super::{new_reference, validate_reference, AttachmentStore, FileMeta, StorageError, StoredFile, Upload};
use crate::database::models::NewAttachment;

/// Attachments stored as blobs in the `attachment_blobs` table of the grievance database
pub struct PgBlobStore {
    pool: PgPool,
}

impl PgBlobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BlobRow {
    original_name: String,
    content_type: String,
    data: Vec<u8>,
}

#[async_trait]
impl AttachmentStore for PgBlobStore {
    fn backend(&self) -> &'static str {
        "database"
    }

    async fn put(&self, upload: Upload) -> Result<NewAttachment, StorageError> {
        let reference = new_reference(&upload.original_name);
        let meta = FileMeta::for_upload(&upload);

        sqlx::query(
            "INSERT INTO attachment_blobs (reference, original_name, content_type, size, sha256, data)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&reference)
        .bind(&meta.original_name)
        .bind(&meta.content_type)
        .bind(meta.size)
        .bind(&meta.sha256)
        .bind(upload.bytes.as_ref())
        .execute(&self.pool)
        .await?;

        Ok(NewAttachment {
            reference,
            original_name: meta.original_name,
            content_type: meta.content_type,
            size: meta.size,
        })
    }

    async fn get(&self, reference: &str) -> Result<Option<StoredFile>, StorageError> {
        validate_reference(reference)?;

        let row = sqlx::query_as::<_, BlobRow>(
            "SELECT original_name, content_type, data FROM attachment_blobs WHERE reference = $1",
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| StoredFile {
            reference: reference.to_string(),
            original_name: row.original_name,
            content_type: row.content_type,
            bytes: Bytes::from(row.data),
        }))
    }

    async fn delete(&self, reference: &str) -> Result<bool, StorageError> {
        validate_reference(reference)?;
        let result = sqlx::query("DELETE FROM attachment_blobs WHERE reference = $1")
            .bind(reference)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
