//! API routes module

pub mod mail;

use std::sync::Arc;

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<AppState>;

/// Create the combined API router.
///
/// Routes are mounted at the root because the renderer requests
/// `/graph`, `/search`, and `/mail` directly.
pub fn router() -> Router<SharedState> {
    Router::new()
        // Mail graph, search, and participant routes
        .merge(mail::router())
}
