// src/cli.rs
//! CLI definitions for the recipe server
//!
//! The command implementations live in `main.rs`.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recipebox")]
#[command(version)]
#[command(about = "Recipe management API with image hosting", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to bind to (overrides config and environment)
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Store connection string: sqlite://PATH, PATH or memory://
        #[arg(short, long)]
        database: Option<String>,
    },

    /// Create or migrate the recipe database
    Init {
        /// Store connection string: sqlite://PATH or PATH
        #[arg(short, long, default_value = "sqlite://recipebox.db")]
        database: String,
    },

    /// Load and validate a configuration file, then print a summary
    CheckConfig {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::parse_from([
            "recipebox",
            "serve",
            "--bind",
            "127.0.0.1:4000",
            "--database",
            "memory://",
        ]);
        match cli.command {
            Some(Commands::Serve { bind, database, config }) => {
                assert_eq!(bind.unwrap().port(), 4000);
                assert_eq!(database.as_deref(), Some("memory://"));
                assert!(config.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_init_default_database() {
        let cli = Cli::parse_from(["recipebox", "init"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Init { ref database }) if database == "sqlite://recipebox.db"
        ));
    }
}
