use grievance_api::config::DatabaseBackend;
use grievance_api::auth::{generate_jwt, Claims};
use grievance_api::services::{DepartmentService, UserService};
use grievance_api::types::Role;
use grievance_api::{app, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "grievance_api=info,tower_http=info".into()),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = grievance_api::config::config();
    tracing::info!("Starting Grievance API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set");
    }

    if grievance_api::is_development!() {
        tracing::debug!(
            "database={:?} storage={:?} delete_on_reject={}",
            config.database.backend,
            config.storage.backend,
            config.policy.delete_on_reject
        );
    }

    let state = AppState::from_config(config).await?;

    // The in-memory store starts empty; give it the department directory so
    // category routing works out of the box, plus demo users with tokens.
    if config.database.backend == DatabaseBackend::Memory {
        DepartmentService::new(state.store.clone()).seed_directory().await?;
        for user in UserService::new(state.store.clone()).seed_demo().await? {
            let role: Role = user.role.parse().map_err(anyhow::Error::msg)?;
            let claims = Claims::new(user.id, role, Some(user.name), config.security.jwt_expiry_hours);
            tracing::info!("Demo {} token: {}", role.as_str(), generate_jwt(&claims, &config.security.jwt_secret)?);
        }
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Grievance API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
