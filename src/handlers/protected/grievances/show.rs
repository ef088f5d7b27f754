// handlers/protected/grievances/show.rs - GET /api/grievances/:id

use axum::extract::{Path, State};
use axum::Extension;

use super::parse_id;
use crate::database::models::GrievanceView;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::GrievanceService;
use crate::state::AppState;
use crate::types::Principal;

pub async fn grievance_get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<GrievanceView> {
    let id = parse_id(&id)?;
    let grievance = GrievanceService::from_state(&state).get(&principal, id).await?;
    Ok(ApiResponse::success(grievance))
}
