//! Boutique CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! boutique migrate
//!
//! # Load the fixture catalog into an empty database
//! boutique seed
//!
//! # Load it even if categories already exist
//! boutique seed --force
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "boutique")]
#[command(author, version, about = "Boutique CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed the database with the fixture catalog
    Seed {
        /// Seed even if the catalog already has categories
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed { force } => commands::seed::run(force).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_force_flag() {
        let cli = Cli::try_parse_from(["boutique", "seed", "--force"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(cli.command, Commands::Seed { force: true }));
    }
}
