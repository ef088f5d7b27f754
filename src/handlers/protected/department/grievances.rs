// handlers/protected/department/grievances.rs - GET /api/department/grievances

use axum::{extract::State, Extension};

use crate::database::models::GrievanceView;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::GrievanceService;
use crate::state::AppState;
use crate::types::Principal;

/// Queue of grievances routed to the caller's department, newest first
pub async fn grievances_get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Vec<GrievanceView>> {
    let grievances = GrievanceService::from_state(&state)
        .list_for_department(&principal)
        .await?;
    Ok(ApiResponse::list(grievances))
}
