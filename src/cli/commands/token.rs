use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::types::Role;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "Principal role: student, admin or department")]
    pub role: String,
    #[arg(long, help = "User id, or department id for department accounts")]
    pub id: Uuid,
    #[arg(long, help = "Display name embedded in the token")]
    pub name: Option<String>,
    #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &crate::config::config().security;
    if security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET is not set");
    }

    let role: Role = args.role.parse().map_err(anyhow::Error::msg)?;
    let hours = args.hours.unwrap_or(security.jwt_expiry_hours);
    let claims = Claims::new(args.id, role, args.name, hours);
    let token = generate_jwt(&claims, &security.jwt_secret)?;

    match output_format {
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({
                "token": token,
                "role": role.as_str(),
                "sub": args.id,
                "expires_in_hours": hours,
            })),
        ),
    }
}
