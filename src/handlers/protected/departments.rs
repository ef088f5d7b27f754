// handlers/protected/departments.rs - GET /api/departments

use axum::extract::State;

use crate::database::models::Department;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::DepartmentService;
use crate::state::AppState;

pub async fn departments_get(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    let departments = DepartmentService::new(state.store.clone()).list().await?;
    Ok(ApiResponse::list(departments))
}
