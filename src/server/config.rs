// src/server/config.rs
//! Configuration file parsing for the recipe server
//!
//! Supports TOML configuration files with the following sections:
//! - [server] - Bind address, public client URL, CORS origins
//! - [storage] - Database connection string
//! - [media] - Image host provider and credentials
//! - [upload] - Image size cap
//!
//! Every section is optional. Environment variables are applied on top of
//! the file (see [`RecipeboxConfig::apply_env`]).

use crate::media::{MediaConfig, MediaProvider};
use crate::server::ServerConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Bind address override
pub const ENV_BIND: &str = "RECIPEBOX_BIND";
/// Database connection string override
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Public URL of the web client, added to the CORS origins
pub const ENV_PUBLIC_API_URL: &str = "PUBLIC_API_URL";
pub const ENV_CLOUDINARY_NAME: &str = "CLOUDINARY_NAME";
pub const ENV_CLOUDINARY_API_KEY: &str = "CLOUDINARY_API_KEY";
pub const ENV_CLOUDINARY_API_SECRET: &str = "CLOUDINARY_API_SECRET";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize)]
pub struct RecipeboxConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub upload: UploadSection,
}

/// Server configuration section
#[derive(Debug, Deserialize)]
pub struct ServerSection {
    /// Public API bind address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// URL the web client is served from
    #[serde(default)]
    pub public_url: Option<String>,

    /// Allowed CORS origins (empty = any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            public_url: None,
            cors_origins: Vec::new(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

/// Storage configuration section
#[derive(Debug, Deserialize)]
pub struct StorageSection {
    /// `sqlite://<path>`, a bare path, or `memory://`
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

fn default_database() -> String {
    "sqlite://recipebox.db".to_string()
}

/// Upload limits section
#[derive(Debug, Deserialize)]
pub struct UploadSection {
    /// Largest accepted image (e.g. "1MB", "512KB")
    #[serde(default = "default_max_image_size")]
    pub max_image_size: String,
}

impl Default for UploadSection {
    fn default() -> Self {
        Self {
            max_image_size: default_max_image_size(),
        }
    }
}

fn default_max_image_size() -> String {
    "1MB".to_string()
}

impl RecipeboxConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: RecipeboxConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Create a default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; empty values are ignored
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = get(ENV_BIND) {
            self.server.bind = bind;
        }
        if let Some(database) = get(ENV_DATABASE_URL) {
            self.storage.database = database;
        }
        if let Some(url) = get(ENV_PUBLIC_API_URL) {
            self.server.public_url = Some(url);
        }

        if let Some(name) = get(ENV_CLOUDINARY_NAME) {
            self.media.cloud_name = Some(name);
            if self.media.provider == MediaProvider::None {
                self.media.provider = MediaProvider::Cloudinary;
            }
        }
        if let Some(key) = get(ENV_CLOUDINARY_API_KEY) {
            self.media.api_key = Some(key);
        }
        if let Some(secret) = get(ENV_CLOUDINARY_API_SECRET) {
            self.media.api_secret = Some(secret);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.server
            .bind
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid server.bind address: {}", self.server.bind))?;

        if self.storage.database.trim().is_empty() {
            anyhow::bail!("storage.database must not be empty");
        }

        let max_image = parse_size(&self.upload.max_image_size)?;
        if max_image == 0 {
            anyhow::bail!("upload.max_image_size must be greater than zero");
        }

        self.media
            .validate()
            .context("Invalid [media] configuration")?;

        Ok(())
    }

    /// Origins allowed by CORS: the configured list plus the client URL
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = self
            .server
            .cors_origins
            .iter()
            .map(|o| o.trim_end_matches('/').to_string())
            .collect();

        if let Some(url) = &self.server.public_url {
            let url = url.trim_end_matches('/').to_string();
            if !origins.contains(&url) {
                origins.push(url);
            }
        }
        origins
    }

    /// Convert to the internal ServerConfig structure
    pub fn to_server_config(&self) -> Result<ServerConfig> {
        self.validate()?;

        let bind_addr = self.server.bind.parse()?;
        let max_image_bytes = usize::try_from(parse_size(&self.upload.max_image_size)?)
            .context("upload.max_image_size is too large")?;

        Ok(ServerConfig {
            bind_addr,
            database_url: self.storage.database.clone(),
            max_image_bytes,
            cors_allowed_origins: self.cors_origins(),
            media: self.media.clone(),
        })
    }
}

/// Parse a human-readable size string (e.g., "1MB", "512KB", "1.5MB")
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_uppercase();

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1024u64 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1024u64 * 1024)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1024u64)
    } else if let Some(n) = s.strip_suffix('B') {
        (n, 1u64)
    } else {
        // Assume bytes
        (s.as_str(), 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid size number: {}", num_str))?;
    if num < 0.0 {
        anyhow::bail!("Size must not be negative: {}", s);
    }

    Ok((num * multiplier as f64) as u64)
}
