// src/server/mod.rs
//! Recipe HTTP API server
//!
//! This module provides an HTTP server that:
//! - Serves paginated recipe listings and single recipes
//! - Accepts recipe writes as multipart (with an image) or JSON
//! - Hands images to the configured media host before writing
//! - Tracks request counters for `/api/stats`

pub mod config;
mod form;
mod handlers;
pub mod metrics;
pub mod response;
mod routes;

pub use config::RecipeboxConfig;
pub use form::RecipeForm;
pub use metrics::{MetricsSnapshot, ServerMetrics};
pub use response::{ApiError, ApiResponse};
pub use routes::create_router;

use crate::media::MediaConfig;
use crate::recipe::RecipeService;
use crate::store::open_store;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

/// Default image cap (1 MiB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Room left in the body limit for the text fields of a multipart write
pub const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,
    /// Store connection string (see [`crate::store::open_store`])
    pub database_url: String,
    /// Largest accepted image in bytes
    pub max_image_bytes: usize,
    /// CORS allowed origins (empty = any origin)
    pub cors_allowed_origins: Vec<String>,
    /// Media host settings
    pub media: MediaConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            database_url: "sqlite://recipebox.db".to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            cors_allowed_origins: Vec::new(),
            media: MediaConfig::default(),
        }
    }
}

/// Shared server state
pub struct ServerState {
    pub service: RecipeService,
    /// Metrics collector
    pub metrics: Arc<ServerMetrics>,
    pub max_image_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
}

/// State handle passed to every handler
pub type SharedState = Arc<ServerState>;

impl ServerState {
    /// Open the store and media host named in `config`
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let store = open_store(&config.database_url)
            .with_context(|| format!("Failed to open store: {}", config.database_url))?;
        let media = config
            .media
            .build()
            .context("Failed to configure media host")?;

        let mut state = Self::with_service(RecipeService::new(store, media), config.max_image_bytes);
        state.cors_allowed_origins = config.cors_allowed_origins.clone();
        Ok(state)
    }

    /// State around an already-built service
    pub fn with_service(service: RecipeService, max_image_bytes: usize) -> Self {
        Self {
            service,
            metrics: Arc::new(ServerMetrics::new()),
            max_image_bytes,
            cors_allowed_origins: Vec::new(),
        }
    }

    /// Request body limit: the image cap plus room for the text fields
    pub fn body_limit(&self) -> usize {
        self.max_image_bytes.saturating_add(FORM_OVERHEAD_BYTES)
    }
}

/// Start the recipe server and run until Ctrl-C or SIGTERM
pub async fn run_server(config: ServerConfig) -> Result<()> {
    tracing::info!("Starting recipe server on {}", config.bind_addr);
    tracing::info!("Database: {}", config.database_url);
    tracing::info!("Media provider: {}", config.media.provider.as_str());
    tracing::info!("Image size cap: {} bytes", config.max_image_bytes);
    if config.cors_allowed_origins.is_empty() {
        tracing::info!("CORS: any origin");
    } else {
        tracing::info!("CORS: {}", config.cors_allowed_origins.join(", "));
    }

    let state = Arc::new(ServerState::new(&config)?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Recipe server is ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Recipe server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl-C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received SIGTERM, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
