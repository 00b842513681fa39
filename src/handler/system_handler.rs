use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::service::quote_service::{QuoteService, QuoteServiceImpl};

pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// State for the unauthenticated probe routes.
pub struct SystemState {
    pub quote_service: Arc<QuoteServiceImpl>,
    pub started_at: Instant,
}

impl SystemState {
    pub fn new(quote_service: Arc<QuoteServiceImpl>) -> Self {
        SystemState { quote_service, started_at: Instant::now() }
    }
}

fn database_label(connected: bool) -> &'static str {
    if connected { "Bağlı ✅" } else { "Bağlı Değil ❌" }
}

// Handler: Service banner
pub async fn root_handler(State(state): State<Arc<SystemState>>) -> impl IntoResponse {
    info!("[root_handler] Banner requested");
    let connected = state.quote_service.database_connected().await;
    Json(json!({
        "status": "success",
        "message": "🚀 Nefes Depo Backend Çalışıyor!",
        "version": SERVICE_VERSION,
        "database": database_label(connected),
        "endpoints": {
            "test": "GET /api/test",
            "quoteRequest": "POST /api/quote-request",
            "adminLogin": "POST /api/admin/login",
            "adminStats": "GET /api/admin/stats",
            "adminQuotes": "GET /api/admin/quotes",
            "health": "GET /health"
        },
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// Handler: Liveness probe
pub async fn api_test_handler(State(state): State<Arc<SystemState>>) -> impl IntoResponse {
    let connected = state.quote_service.database_connected().await;
    Json(json!({
        "status": "success",
        "message": "Nefes Depo Backend çalışıyor!",
        "database": database_label(connected),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// Handler: Health check
pub async fn health_handler(State(state): State<Arc<SystemState>>) -> impl IntoResponse {
    let connected = state.quote_service.database_connected().await;
    Json(json!({
        "status": "healthy",
        "database": if connected { "connected" } else { "disconnected" },
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// Fallback for unmatched routes
pub async fn not_found_handler(method: Method, uri: Uri) -> impl IntoResponse {
    info!("404: {} {}", method, uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": "Endpoint bulunamadı",
            "path": uri.path(),
        })),
    )
}

/// Turns a handler panic into the generic 500 body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Handler panicked: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "error", "message": "Sunucu hatası" })),
    )
        .into_response()
}
