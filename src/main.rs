// src/main.rs

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use recipebox::server::{RecipeboxConfig, run_server};
use std::path::Path;
use tracing::info;

/// Config file (or defaults) with environment overrides applied
fn load_config(path: Option<&Path>) -> Result<RecipeboxConfig> {
    let mut config = match path {
        Some(path) => RecipeboxConfig::load(path)?,
        None => RecipeboxConfig::new(),
    };
    config.apply_env();
    Ok(config)
}

/// Strip the `sqlite://` scheme; `memory://` has nothing to initialize
fn sqlite_path(database: &str) -> Result<&str> {
    let path = database.strip_prefix("sqlite://").unwrap_or(database);
    if path.is_empty() || path.contains("://") {
        anyhow::bail!("Not a SQLite database: {}", database);
    }
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            config,
            bind,
            database,
        }) => {
            let mut file_config = load_config(config.as_deref())?;
            if let Some(bind) = bind {
                file_config.server.bind = bind.to_string();
            }
            if let Some(database) = database {
                file_config.storage.database = database;
            }

            let server_config = file_config
                .to_server_config()
                .context("Invalid server configuration")?;
            run_server(server_config).await
        }
        Some(Commands::Init { database }) => {
            let path = sqlite_path(&database)?;
            info!("Initializing recipe database at: {}", path);
            recipebox::db::init(path)?;
            println!("Database initialized successfully at: {}", path);
            Ok(())
        }
        Some(Commands::CheckConfig { config }) => {
            let file_config = load_config(Some(&config))?;
            let server_config = file_config
                .to_server_config()
                .with_context(|| format!("Invalid configuration: {}", config.display()))?;

            println!("Configuration OK: {}", config.display());
            println!("  Bind:       {}", server_config.bind_addr);
            println!("  Database:   {}", server_config.database_url);
            println!("  Media:      {}", server_config.media.provider.as_str());
            println!("  Image cap:  {} bytes", server_config.max_image_bytes);
            if server_config.cors_allowed_origins.is_empty() {
                println!("  CORS:       any origin");
            } else {
                println!("  CORS:       {}", server_config.cors_allowed_origins.join(", "));
            }
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("Recipebox v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'recipebox --help' for usage information");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_path() {
        assert_eq!(sqlite_path("sqlite://data/recipes.db").unwrap(), "data/recipes.db");
        assert_eq!(sqlite_path("recipes.db").unwrap(), "recipes.db");
        assert!(sqlite_path("memory://").is_err());
        assert!(sqlite_path("sqlite://").is_err());
    }
}
