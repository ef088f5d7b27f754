pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "grievance")]
#[command(about = "Grievance CLI - database and token administration for the Grievance API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply the Postgres schema")]
    Migrate,

    #[command(about = "Register the static department directory (idempotent)")]
    SeedDepartments,

    #[command(about = "Mint a signed access token")]
    Token(commands::token::TokenArgs),

    #[command(about = "User directory management")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::db::migrate(output_format).await,
        Commands::SeedDepartments => commands::db::seed_departments(output_format).await,
        Commands::Token(args) => commands::token::handle(args, output_format),
        Commands::User { cmd } => commands::user::handle(cmd, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_token_command() {
        let cli = Cli::try_parse_from([
            "grievance",
            "--json",
            "token",
            "--role",
            "admin",
            "--id",
            "6f1c1b8e-8d7e-4c7a-9a51-6f1f6f0b9e11",
        ])
        .unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::Token(args) => {
                assert_eq!(args.role, "admin");
                assert!(args.name.is_none());
            }
            _ => panic!("expected token command"),
        }
    }

    #[test]
    fn parses_seed_departments() {
        let cli = Cli::try_parse_from(["grievance", "seed-departments"]).unwrap();
        assert!(matches!(cli.command, Commands::SeedDepartments));
    }
}
