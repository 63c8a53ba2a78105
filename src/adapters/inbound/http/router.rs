use std::sync::Arc;

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;

use super::handlers::handle_action;
use crate::adapters::outbound::storage::BunnyStorageProvider;

/// Application state shared by the handlers
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<BunnyStorageProvider>,
    /// Shared secret every action request must carry as `nonce`
    pub action_token: String,
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ajax", post(handle_action))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
