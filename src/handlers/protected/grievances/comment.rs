// handlers/protected/grievances/comment.rs - POST /api/grievances/:id/comments

use axum::extract::{rejection::JsonRejection, Path, State};
use axum::{Extension, Json};
use serde::Deserialize;

use super::parse_id;
use crate::database::models::GrievanceView;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::GrievanceService;
use crate::state::AppState;
use crate::types::Principal;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub text: Option<String>,
}

pub async fn comment_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    body: Result<Json<CommentBody>, JsonRejection>,
) -> ApiResult<GrievanceView> {
    let id = parse_id(&id)?;
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let grievance = GrievanceService::from_state(&state)
        .add_comment(&principal, id, body.text)
        .await?;
    Ok(ApiResponse::success(grievance).with_message("Comment added"))
}
