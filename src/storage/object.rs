use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use url::Url;

use super::{new_reference, validate_reference, AttachmentStore, FileMeta, StorageError, StoredFile, Upload};
use crate::database::models::NewAttachment;

const ORIGINAL_NAME_HEADER: &str = "x-object-meta-original-name";
const CHECKSUM_HEADER: &str = "x-object-meta-sha256";

/// Cloud object storage reached over plain HTTP: `PUT {base}/{reference}` to
/// store, `GET {base}/{reference}` to load. Metadata travels in
/// `x-object-meta-*` headers.
pub struct ObjectStore {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ObjectStore {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, StorageError> {
        let mut base = Url::parse(base_url)
            .map_err(|e| StorageError::Config(format!("invalid object storage URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(StorageError::Config(format!("object storage URL '{}' cannot be a base", base_url)));
        }
        // Url::join replaces the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base,
            token,
        })
    }

    fn object_url(&self, reference: &str) -> Result<Url, StorageError> {
        validate_reference(reference)?;
        self.base
            .join(reference)
            .map_err(|_| StorageError::InvalidReference(reference.to_string()))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn encode_header(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn decode_header(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(name)?.to_str().ok()?;
    url::form_urlencoded::parse(format!("v={}", raw).as_bytes())
        .next()
        .map(|(_, v)| v.into_owned())
}

#[async_trait]
impl AttachmentStore for ObjectStore {
    fn backend(&self) -> &'static str {
        "object"
    }

    async fn put(&self, upload: Upload) -> Result<NewAttachment, StorageError> {
        let reference = new_reference(&upload.original_name);
        let url = self.object_url(&reference)?;
        let meta = FileMeta::for_upload(&upload);

        let content_type = HeaderValue::from_str(&meta.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

        let response = self
            .authorize(self.client.put(url))
            .header(CONTENT_TYPE, content_type)
            .header(ORIGINAL_NAME_HEADER, encode_header(&meta.original_name))
            .header(CHECKSUM_HEADER, &meta.sha256)
            .body(upload.bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!("Object storage rejected {}: {} {}", reference, status, message);
            return Err(StorageError::Remote { status: status.as_u16(), message });
        }

        Ok(NewAttachment {
            reference,
            original_name: meta.original_name,
            content_type: meta.content_type,
            size: meta.size,
        })
    }

    async fn get(&self, reference: &str) -> Result<Option<StoredFile>, StorageError> {
        let url = self.object_url(reference)?;
        let response = self.authorize(self.client.get(url)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Remote { status: status.as_u16(), message });
        }

        let headers = response.headers().clone();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| super::guess_content_type(reference).to_string());
        let original_name = decode_header(&headers, ORIGINAL_NAME_HEADER).unwrap_or_else(|| reference.to_string());
        let bytes = response.bytes().await?;

        Ok(Some(StoredFile {
            reference: reference.to_string(),
            original_name,
            content_type,
            bytes,
        }))
    }

    async fn delete(&self, reference: &str) -> Result<bool, StorageError> {
        let url = self.object_url(reference)?;
        let response = self.authorize(self.client.delete(url)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::Remote { status: status.as_u16(), message });
        }
        Ok(true)
    }
}
