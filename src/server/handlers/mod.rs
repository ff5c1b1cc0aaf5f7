// src/server/handlers/mod.rs
//! HTTP request handlers for the recipe server

pub mod recipes;

use crate::server::SharedState;
use crate::server::metrics::MetricsSnapshot;
use axum::{Json, extract::State};

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Request counters
///
/// GET /api/stats
pub async fn stats(State(state): State<SharedState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
