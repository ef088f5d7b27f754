// handlers/protected/grievances/create.rs - POST /api/grievances, POST /api/grievances/create

use axum::{extract::State, Extension};

use super::form::GrievanceForm;
use crate::database::models::GrievanceView;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::GrievanceService;
use crate::state::AppState;
use crate::types::Principal;

pub async fn grievance_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    form: GrievanceForm,
) -> ApiResult<GrievanceView> {
    let grievance = GrievanceService::from_state(&state)
        .create(&principal, form.into_create())
        .await?;
    Ok(ApiResponse::created(grievance).with_message("Grievance submitted"))
}
