// handlers/protected/grievances/attachment.rs - GET /api/grievances/attachments/:reference

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Extension,
};

use crate::error::ApiError;
use crate::services::GrievanceService;
use crate::state::AppState;
use crate::storage::{is_image, StoredFile};
use crate::types::Principal;

/// Raster images are rendered inline; anything else, SVG included, downloads
/// under its original name.
pub async fn attachment_get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(reference): Path<String>,
) -> Result<Response, ApiError> {
    let file = GrievanceService::from_state(&state)
        .attachment(&principal, &reference)
        .await?;
    Ok(file_response(file))
}

/// Content types are client supplied; scriptable image formats never render inline
fn serves_inline(content_type: &str) -> bool {
    is_image(content_type) && !content_type.to_ascii_lowercase().contains("svg")
}

fn file_response(file: StoredFile) -> Response {
    let content_type = HeaderValue::from_str(&file.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let inline = serves_inline(&file.content_type);
    let original_name = file.original_name;

    let mut response = ([(header::CONTENT_TYPE, content_type)], file.bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::CONTENT_SECURITY_POLICY, HeaderValue::from_static("sandbox"));

    if !inline {
        let disposition = format!("attachment; filename=\"{}\"", quoted_filename(&original_name));
        let disposition = HeaderValue::from_str(&disposition)
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    response
}

/// Header-safe rendition of an uploaded file name
fn quoted_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c == '"' || c == '\\' || !(' '..='~').contains(&c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn stored(name: &str, content_type: &str) -> StoredFile {
        StoredFile {
            reference: "abc.bin".into(),
            original_name: name.into(),
            content_type: content_type.into(),
            bytes: Bytes::from_static(b"data"),
        }
    }

    #[test]
    fn images_inline_documents_download() {
        let image = file_response(stored("ac.png", "image/png"));
        assert_eq!(image.headers()[header::CONTENT_TYPE], "image/png");
        assert!(image.headers().get(header::CONTENT_DISPOSITION).is_none());
        assert_eq!(image.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

        let doc = file_response(stored("report \"final\".pdf", "application/pdf"));
        assert_eq!(
            doc.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"report _final_.pdf\""
        );
    }

    #[test]
    fn svg_is_never_rendered_inline() {
        let svg = file_response(stored("logo.svg", "image/svg+xml"));
        assert_eq!(
            svg.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"logo.svg\""
        );
        assert_eq!(svg.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(svg.headers()[header::CONTENT_SECURITY_POLICY], "sandbox");
    }
}
