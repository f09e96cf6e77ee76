//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::MatchService;
use crate::ws::LiveHub;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Match service for all business logic.
    pub match_service: Arc<MatchService>,
    /// Live WebSocket hub for real-time fanout.
    pub live_hub: Arc<LiveHub>,
}
