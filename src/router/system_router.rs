use axum::{Router, routing::get};
use std::sync::Arc;

use crate::handler::system_handler::{api_test_handler, health_handler, root_handler, SystemState};

pub fn system_router(state: Arc<SystemState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/test", get(api_test_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
