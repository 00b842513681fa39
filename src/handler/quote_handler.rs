use axum::{
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    Form, Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::dto::quote_dto::{QuoteRequest, QuoteSubmissionResponse};
use crate::service::quote_service::{QuoteService, QuoteServiceImpl};
use crate::util::error::HandlerError;

/// Quote body sent either as JSON or as a urlencoded HTML form post.
pub struct QuotePayload(pub QuoteRequest);

fn is_form_post(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

impl<S> FromRequest<S> for QuotePayload
where
    S: Send + Sync,
{
    type Rejection = HandlerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form_post(&req) {
            let Form(request) = Form::<QuoteRequest>::from_request(req, state).await.map_err(|e| {
                warn!("[create_quote_handler] Invalid form body: {}", e);
                HandlerError::bad_request(format!("Geçersiz istek gövdesi: {}", e.body_text()))
            })?;
            return Ok(QuotePayload(request));
        }

        let Json(request) = Json::<QuoteRequest>::from_request(req, state).await.map_err(|e| {
            warn!("[create_quote_handler] Invalid JSON body: {}", e);
            HandlerError::bad_request(format!("Geçersiz istek gövdesi: {}", e.body_text()))
        })?;
        Ok(QuotePayload(request))
    }
}

// Handler: Submit quote request (public)
pub async fn create_quote_handler(
    State(service): State<Arc<QuoteServiceImpl>>,
    QuotePayload(request): QuotePayload,
) -> Result<impl IntoResponse, HandlerError> {
    let quote = service
        .submit_quote(request)
        .await
        .map_err(|e| HandlerError::from_service(e, "Bir hata oluştu. Lütfen tekrar deneyin."))?;

    info!("[create_quote_handler] Quote accepted: {}", quote.quote_number);
    Ok(Json(QuoteSubmissionResponse::accepted(quote.quote_number)))
}
