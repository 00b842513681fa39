use axum::{body::Body, extract::{Query, State}, http::Request, middleware::Next, response::Response};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::util::error::HandlerError;

pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";
pub const ADMIN_PASSWORD_QUERY: &str = "password";

pub struct AdminAuthState {
    admin_password: String,
}

impl AdminAuthState {
    pub fn new(admin_password: String) -> Self {
        AdminAuthState { admin_password }
    }

    /// Empty credentials never match, whatever the configured secret.
    pub fn verify(&self, provided: Option<&str>) -> bool {
        match provided {
            Some(candidate) if !candidate.is_empty() => candidate == self.admin_password,
            _ => false,
        }
    }
}

/// Header first, then the `password` query parameter. An empty header
/// counts as absent.
pub fn credential_from_request<B>(req: &Request<B>) -> Option<String> {
    let header = req
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());
    if let Some(value) = header {
        return Some(value.to_string());
    }
    Query::<HashMap<String, String>>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(mut params)| params.remove(ADMIN_PASSWORD_QUERY))
}

pub async fn admin_auth(
    State(state): State<Arc<AdminAuthState>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let provided = credential_from_request(&req);
    if !state.verify(provided.as_deref()) {
        warn!(path = %req.uri().path(), "Rejected admin request");
        return Err(HandlerError::unauthorized());
    }
    Ok(next.run(req).await)
}
