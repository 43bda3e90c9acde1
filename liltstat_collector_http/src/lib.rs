//! HTTP beacon collector.
//!
//! This crate provides the externally-facing `/addlog` endpoint.
//!
//! Beacons arrive as cross-origin script-tag requests, so the endpoint
//! is a GET carrying its payload in the query string and answers with
//! JSONP-formatted executable script content rather than plain JSON.

pub mod addlog;
pub mod types;

// Re-export the main types for easier importing
pub use types::{AddLogParams, IngestMode};

use std::sync::Arc;

use axum::{Router, routing::get};
use liltstat_collector_core::{InsertQueue, SiteResolver};

use crate::addlog::addlog_handler;

/// HTTP collector server that receives beacons via GET requests.
pub struct HttpCollector {
    state: HttpCollectorState,
}

#[derive(Clone)]
pub struct HttpCollectorState {
    resolver: Arc<SiteResolver>,
    queue: Arc<InsertQueue>,
    mode: IngestMode,
}

impl HttpCollector {
    /// Create a new HTTP collector over the given resolver and queue.
    pub fn new(resolver: Arc<SiteResolver>, queue: Arc<InsertQueue>, mode: IngestMode) -> Self {
        let state = HttpCollectorState {
            resolver,
            queue,
            mode,
        };

        Self { state }
    }

    pub fn into_router(self) -> Router {
        Router::new()
            .route("/addlog", get(addlog_handler))
            .with_state(self.state)
    }
}
