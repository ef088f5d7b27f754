// handlers/protected/grievances/delete.rs - DELETE /api/grievances/:id (admin only)

use axum::extract::{Path, State};
use axum::Extension;
use serde_json::{json, Value};

use super::parse_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::GrievanceService;
use crate::state::AppState;
use crate::types::Principal;

pub async fn grievance_delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let id = GrievanceService::from_state(&state).delete(&principal, id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })).with_message("Grievance deleted"))
}
