// src/server/metrics.rs
//! Server metrics tracking
//!
//! Simple atomic counters for request/response statistics, exposed through
//! `GET /api/stats`.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Server metrics collector
#[derive(Default)]
pub struct ServerMetrics {
    /// Total API requests
    requests_total: AtomicU64,
    /// Responses with a 4xx status
    client_errors: AtomicU64,
    /// Responses with a 5xx status
    server_errors: AtomicU64,
    recipes_created: AtomicU64,
    recipes_updated: AtomicU64,
    recipes_deleted: AtomicU64,
    /// Images handed to the media host
    images_uploaded: AtomicU64,
    /// Image bytes received
    image_bytes: AtomicU64,
    /// Server start time
    start_time: std::sync::OnceLock<Instant>,
}

impl ServerMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        let metrics = Self::default();
        let _ = metrics.start_time.set(Instant::now());
        metrics
    }

    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the status class of a failed response
    pub fn record_error(&self, status: u16) {
        if status >= 500 {
            self.server_errors.fetch_add(1, Ordering::Relaxed);
        } else if status >= 400 {
            self.client_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_created(&self) {
        self.recipes_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_updated(&self) {
        self.recipes_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deleted(&self) {
        self.recipes_deleted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an image the media host accepted
    pub fn record_image(&self, bytes: u64) {
        self.images_uploaded.fetch_add(1, Ordering::Relaxed);
        self.image_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let uptime = self
            .start_time
            .get()
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO);

        let image_bytes = self.image_bytes.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            client_errors: self.client_errors.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
            recipes_created: self.recipes_created.load(Ordering::Relaxed),
            recipes_updated: self.recipes_updated.load(Ordering::Relaxed),
            recipes_deleted: self.recipes_deleted.load(Ordering::Relaxed),
            images_uploaded: self.images_uploaded.load(Ordering::Relaxed),
            image_bytes,
            image_bytes_human: human_bytes(image_bytes),
            uptime_secs: uptime.as_secs(),
        }
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub client_errors: u64,
    pub server_errors: u64,
    pub recipes_created: u64,
    pub recipes_updated: u64,
    pub recipes_deleted: u64,
    pub images_uploaded: u64,
    pub image_bytes: u64,
    /// Human-readable image bytes
    pub image_bytes_human: String,
    /// Server uptime in seconds
    pub uptime_secs: u64,
}

/// Format bytes as human-readable string
fn human_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
