use serde_json::json;
use std::sync::Arc;

use crate::cli::utils::{connect_pool, output_success};
use crate::cli::OutputFormat;
use crate::database::{schema, PgGrievanceStore};
use crate::services::DepartmentService;

pub async fn migrate(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect_pool().await?;
    schema::migrate(&pool).await?;
    output_success(
        &output_format,
        "Schema applied",
        Some(json!({ "statements": schema::SCHEMA.len() })),
    )
}

pub async fn seed_departments(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect_pool().await?;
    let departments = DepartmentService::new(Arc::new(PgGrievanceStore::new(pool)))
        .seed_directory()
        .await?;

    let listing = departments
        .iter()
        .map(|d| (d.code.clone(), json!(d.id.to_string())))
        .collect::<serde_json::Map<_, _>>();
    output_success(
        &output_format,
        &format!("{} departments registered", departments.len()),
        Some(listing.into()),
    )
}
