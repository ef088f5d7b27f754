// handlers/protected/grievances/update.rs - PUT /api/grievances/:id

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use serde_json::json;

use super::form::GrievanceForm;
use super::parse_id;
use crate::error::ApiError;
use crate::middleware::ApiResponse;
use crate::services::{GrievanceService, UpdateOutcome};
use crate::state::AppState;
use crate::types::Principal;

pub async fn grievance_put(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    form: GrievanceForm,
) -> Result<Response, ApiError> {
    let id = parse_id(&id)?;
    let outcome = GrievanceService::from_state(&state)
        .update(&principal, id, form.into_update())
        .await?;

    Ok(match outcome {
        UpdateOutcome::Updated(grievance) => ApiResponse::success(grievance).into_response(),
        UpdateOutcome::Deleted(id) => ApiResponse::success(json!({ "id": id, "deleted": true }))
            .with_message("Grievance rejected and removed")
            .into_response(),
    })
}
