// handlers/protected/grievances/form.rs - Grievance payload extractor
//
// Create and update accept either `multipart/form-data` (text fields plus
// repeatable `photo` file fields) or a JSON body.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Json,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::services::{CreateGrievance, UpdateGrievance};
use crate::storage::{guess_content_type, Upload};

pub const PHOTO_FIELD: &str = "photo";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrievancePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "assigned_to")]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Default)]
pub struct GrievanceForm {
    pub fields: GrievancePayload,
    pub uploads: Vec<Upload>,
}

impl GrievanceForm {
    pub fn into_create(self) -> CreateGrievance {
        CreateGrievance {
            title: self.fields.title,
            description: self.fields.description,
            category: self.fields.category,
            priority: self.fields.priority,
            uploads: self.uploads,
        }
    }

    pub fn into_update(self) -> UpdateGrievance {
        UpdateGrievance {
            title: self.fields.title,
            description: self.fields.description,
            category: self.fields.category,
            priority: self.fields.priority,
            status: self.fields.status,
            assigned_to: self.fields.assigned_to,
            uploads: self.uploads,
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = GrievanceForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or("").to_string();
            if name == PHOTO_FIELD {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
                    .map(str::to_string)
                    .unwrap_or_else(|| guess_content_type(&original_name).to_string());
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.is_empty() {
                    continue;
                }
                form.uploads.push(Upload {
                    original_name,
                    content_type,
                    bytes,
                });
                continue;
            }

            let slot = match name.as_str() {
                "title" => &mut form.fields.title,
                "description" => &mut form.fields.description,
                "category" => &mut form.fields.category,
                "priority" => &mut form.fields.priority,
                "status" => &mut form.fields.status,
                "assignedTo" | "assigned_to" => &mut form.fields.assigned_to,
                _ => continue,
            };
            *slot = Some(field.text().await.map_err(multipart_error)?);
        }

        Ok(form)
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::bad_request(err.body_text())
    }
}

#[async_trait]
impl<S> FromRequest<S> for GrievanceForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(e.body_text()))?;
            return Self::from_multipart(multipart).await;
        }

        let Json(fields) = Json::<GrievancePayload>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(GrievanceForm {
            fields,
            uploads: vec![],
        })
    }
}
