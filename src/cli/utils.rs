use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            if let Some(Value::Object(map)) = data {
                for (key, value) in map {
                    match value {
                        Value::String(s) => println!("  {}: {}", key, s),
                        other => println!("  {}: {}", key, other),
                    }
                }
            }
        }
    }
    Ok(())
}

/// Connect to the configured Postgres database, refusing the memory backend
pub async fn connect_pool() -> anyhow::Result<sqlx::PgPool> {
    let config = crate::config::config();
    if config.database.backend != crate::config::DatabaseBackend::Postgres {
        anyhow::bail!("DATABASE_BACKEND must be postgres for this command");
    }
    Ok(crate::database::DatabaseManager::connect(&config.database).await?)
}
