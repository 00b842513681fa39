use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::dto::admin_dto::{
    ListQuotesParams, LoginRequest, LoginResponse, QuoteListResponse, QuoteResponse, StatsResponse,
    UpdateQuoteStatusRequest, ADMIN_TOKEN,
};
use crate::dto::quote_dto::QuoteView;
use crate::middlewares::admin_middleware::AdminAuthState;
use crate::service::quote_service::{QuoteService, QuoteServiceImpl};
use crate::util::error::HandlerError;

// Handler: Admin login
pub async fn login_handler(
    State(auth): State<Arc<AdminAuthState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let password = payload.ok().and_then(|Json(req)| req.password);
    if !auth.verify(password.as_deref()) {
        warn!("[login_handler] Wrong admin password");
        return Err(HandlerError::new(
            crate::util::error::HandlerErrorKind::Unauthorized,
            "Yanlış şifre",
        ));
    }
    info!("[login_handler] Admin logged in");
    Ok(Json(LoginResponse {
        status: "success".to_string(),
        message: "Giriş başarılı".to_string(),
        token: ADMIN_TOKEN.to_string(),
    }))
}

// Handler: Dashboard counters (admin only)
pub async fn stats_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let stats = service
        .quote_stats()
        .await
        .map_err(|e| HandlerError::from_service(e, "İstatistikler yüklenemedi"))?;
    Ok(Json(StatsResponse { status: "success".to_string(), stats }))
}

// Handler: List Quotes (admin only)
pub async fn list_quotes_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let params = ListQuotesParams::from_query(&params);
    let (quotes, total) = service
        .list_quotes(&params)
        .await
        .map_err(|e| HandlerError::from_service(e, "Teklifler yüklenemedi"))?;

    let quotes: Vec<QuoteView> = quotes.into_iter().map(QuoteView::from).collect();
    Ok(Json(QuoteListResponse {
        status: "success".to_string(),
        count: quotes.len(),
        quotes,
        total,
    }))
}

// Handler: Get Quote (admin only)
pub async fn get_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let quote = service
        .get_quote(&id)
        .await
        .map_err(|e| HandlerError::from_service(e, "Teklif yüklenemedi"))?;
    Ok(Json(QuoteResponse {
        status: "success".to_string(),
        message: None,
        quote: quote.into(),
    }))
}

// Handler: Update Quote Status (admin only)
pub async fn update_quote_status_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateQuoteStatusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload.map_err(|e| {
        warn!("[update_quote_status_handler] Invalid JSON body: {}", e);
        HandlerError::bad_request("Geçersiz durum")
    })?;
    let quote = service
        .update_quote_status(&id, payload.status.as_deref())
        .await
        .map_err(|e| HandlerError::from_service(e, "Durum güncellenemedi"))?;
    Ok(Json(QuoteResponse {
        status: "success".to_string(),
        message: Some("Durum güncellendi".to_string()),
        quote: quote.into(),
    }))
}
