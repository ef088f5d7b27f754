// handlers/protected/grievances/list.rs - GET /api/grievances?status&category&priority&sort

use axum::extract::{Query, State};
use axum::Extension;

use crate::database::models::GrievanceView;
use crate::error::ApiError;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::GrievanceService;
use crate::state::AppState;
use crate::types::Principal;

pub async fn grievances_get(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<FilterData>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Vec<GrievanceView>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let grievances = GrievanceService::from_state(&state).list(&principal, query).await?;
    Ok(ApiResponse::list(grievances))
}
