use axum::{Router, routing::{get, post}, middleware};
use std::sync::Arc;

use crate::handler::admin_handler::{
    get_quote_handler,
    list_quotes_handler,
    login_handler,
    stats_handler,
    update_quote_status_handler,
};
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};
use crate::service::quote_service::QuoteServiceImpl;

pub fn admin_router(service: Arc<QuoteServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    // Public login route
    let public = Router::new()
        .route("/api/admin/login", post(login_handler))
        .with_state(admin_auth_state.clone());

    // Admin-protected routes
    let admin = Router::new()
        .route("/api/admin/stats", get(stats_handler))
        .route("/api/admin/quotes", get(list_quotes_handler))
        .route("/api/admin/quotes/{id}", get(get_quote_handler).put(update_quote_status_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth))
        .with_state(service);

    public.merge(admin)
}
