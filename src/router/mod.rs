pub mod admin_router;
pub mod quote_router;
pub mod system_router;

use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::system_handler::{not_found_handler, panic_response, SystemState};
use crate::middlewares::admin_middleware::AdminAuthState;
use crate::service::quote_service::QuoteServiceImpl;

/// Every route of the service, with the JSON 404 fallback for unknown paths and methods and panic guard.
pub fn app_router(service: Arc<QuoteServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    let system_state = Arc::new(SystemState::new(service.clone()));
    Router::new()
        .merge(system_router::system_router(system_state))
        .merge(quote_router::quote_router(service.clone()))
        .merge(admin_router::admin_router(service, admin_auth_state))
        .method_not_allowed_fallback(not_found_handler)
        .fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(panic_response))
}
