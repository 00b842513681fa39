use axum::{Router, routing::post};
use std::sync::Arc;

use crate::handler::quote_handler::create_quote_handler;
use crate::service::quote_service::QuoteServiceImpl;

pub fn quote_router(service: Arc<QuoteServiceImpl>) -> Router {
    Router::new()
        .route("/api/quote-request", post(create_quote_handler))
        .with_state(service)
}
