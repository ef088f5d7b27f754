use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::state::AppState;
use crate::types::Principal;

/// JWT authentication middleware: validates the bearer token and injects the
/// caller's [`Principal`] into request extensions
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token, &state.security.jwt_secret)?;

    let principal = claims.principal();
    tracing::debug!("Authenticated {:?} {}", principal.role(), principal.id());
    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Gate for routes that only department accounts may use
pub async fn require_department(request: Request, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<Principal>() {
        Some(Principal::Department { .. }) => Ok(next.run(request).await),
        Some(other) => {
            tracing::warn!("{:?} {} denied department route", other.role(), other.id());
            Err(ApiError::forbidden("Department account required"))
        }
        None => Err(ApiError::unauthorized("Authentication required")),
    }
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
