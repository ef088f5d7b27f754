use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, require_department};
use crate::state::AppState;

/// Build the full HTTP application over `state`
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(grievance_routes())
        .merge(department_routes())
        .route("/api/departments", get(protected::departments_get))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .merge(protected)
        // Global middleware
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(cors_layer(&state.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn grievance_routes() -> Router<AppState> {
    use protected::grievances;

    Router::new()
        .route(
            "/api/grievances",
            get(grievances::grievances_get).post(grievances::grievance_post),
        )
        .route("/api/grievances/create", post(grievances::grievance_post))
        .route(
            "/api/grievances/attachments/:reference",
            get(grievances::attachment_get),
        )
        .route(
            "/api/grievances/:id",
            get(grievances::grievance_get)
                .put(grievances::grievance_put)
                .delete(grievances::grievance_delete),
        )
        .route("/api/grievances/:id/comments", post(grievances::comment_post))
}

fn department_routes() -> Router<AppState> {
    Router::new()
        .route("/api/department/grievances", get(protected::department::grievances_get))
        .route_layer(middleware::from_fn(require_department))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
