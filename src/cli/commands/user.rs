use chrono::Utc;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::utils::{connect_pool, output_success};
use crate::cli::OutputFormat;
use crate::database::models::User;
use crate::database::{GrievanceStore, PgGrievanceStore};
use crate::types::Role;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create or update a user record used for identity projections")]
    Upsert {
        #[arg(long, help = "User id (generated when omitted)")]
        id: Option<Uuid>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "student")]
        role: String,
        #[arg(long, help = "Student registration number")]
        student_id: Option<String>,
        #[arg(long, help = "Department code for department staff")]
        department: Option<String>,
    },
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Upsert {
            id,
            name,
            email,
            role,
            student_id,
            department,
        } => {
            let role: Role = role.parse().map_err(anyhow::Error::msg)?;
            let id = id.unwrap_or_else(Uuid::new_v4);
            let store = PgGrievanceStore::new(connect_pool().await?);
            store
                .upsert_user(User {
                    id,
                    name,
                    email,
                    student_id,
                    role: role.as_str().to_string(),
                    department,
                    created_at: Utc::now(),
                })
                .await?;
            output_success(
                &output_format,
                "User saved",
                Some(json!({ "id": id.to_string(), "role": role.as_str() })),
            )
        }
    }
}
