pub mod health;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::events::handlers as events;
use crate::matching::handlers as recommendations;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Chat-platform webhook
        .route(
            "/events",
            post(events::handle_event).layer(middleware::from_fn(events::skip_retries)),
        )
        // Recommendations API
        .route(
            "/api/v1/recommendations",
            post(recommendations::handle_recommend),
        )
        .route(
            "/api/v1/recommendations/:class",
            post(recommendations::handle_recommend_class),
        )
        .route("/api/v1/model/reload", post(recommendations::handle_reload))
        .with_state(state)
}
