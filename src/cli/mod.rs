pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "kitsune-api")]
#[command(about = "Kitsune API - credential verification and session token service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve,

    #[command(about = "Read a password from stdin and print its bcrypt digest")]
    HashPassword {
        #[arg(long, help = "bcrypt cost factor (defaults to HASH_COST)")]
        cost: Option<u32>,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            crate::telemetry::init(&config.logging)?;
            commands::serve::handle(config).await
        }
        Commands::HashPassword { cost } => commands::hash_password::handle(&config, cost).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let cli = Cli::try_parse_from(["kitsune-api"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["kitsune-api", "serve"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Serve));
    }

    #[test]
    fn hash_password_accepts_cost_override() {
        let cli = Cli::try_parse_from(["kitsune-api", "hash-password", "--cost", "11"]).unwrap();
        assert_eq!(cli.command, Some(Commands::HashPassword { cost: Some(11) }));
    }
}
