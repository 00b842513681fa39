use axum::{response::{IntoResponse, Response}, http::StatusCode, Json};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::repository::repository_error::RepositoryError;
use crate::util::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HandlerErrorKind {
    NotFound,
    Validation,
    Internal,
    Unauthorized,
    BadRequest,
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::Validation => "Validation",
            HandlerErrorKind::Internal => "Internal",
            HandlerErrorKind::Unauthorized => "Unauthorized",
            HandlerErrorKind::BadRequest => "BadRequest",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize)]
pub struct HandlerError {
    pub error: HandlerErrorKind,
    pub message: String,
}

impl HandlerError {
    pub fn new<T: Into<String>>(error: HandlerErrorKind, message: T) -> Self {
        HandlerError { error, message: message.into() }
    }

    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::BadRequest, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(HandlerErrorKind::Unauthorized, "Yetkisiz erişim")
    }

    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::NotFound, message)
    }

    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::Internal, message)
    }

    pub fn status_code(&self) -> StatusCode {
        match self.error {
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::Validation | HandlerErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Maps a service failure onto a response, replacing internal details
    /// with `internal_message`.
    pub fn from_service(err: ServiceError, internal_message: &str) -> Self {
        match err {
            ServiceError::MissingField(_) => Self::new(HandlerErrorKind::Validation, "Zorunlu alanları doldurun!"),
            ServiceError::InvalidPhone(_) => Self::new(
                HandlerErrorKind::Validation,
                "Geçerli bir telefon numarası girin (05XX XXX XX XX)",
            ),
            ServiceError::InvalidStatus(_) => Self::bad_request("Geçersiz durum"),
            ServiceError::InvalidInput(msg) => Self::bad_request(msg),
            ServiceError::Unauthorized => Self::unauthorized(),
            ServiceError::NotFound(_) => Self::not_found("Teklif bulunamadı"),
            ServiceError::DuplicateKey(msg) | ServiceError::Internal(msg) => {
                error!("{}: {}", internal_message, msg);
                Self::internal(internal_message)
            }
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let body = json!({
            "status": "error",
            "error": self.error,
            "message": self.message,
        });
        (self.status_code(), Json(body)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid phone: {0}")]
    InvalidPhone(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Internal Error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::ValidationError(msg) => ServiceError::InvalidInput(msg),
            RepositoryError::AlreadyExists(msg) => ServiceError::DuplicateKey(msg),
            RepositoryError::DatabaseError(msg)
            | RepositoryError::ConnectionError(msg)
            | RepositoryError::SerializationError(msg) => ServiceError::Internal(msg),
            RepositoryError::Generic(e) => ServiceError::Internal(e.to_string()),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingField(field) => ServiceError::MissingField(field.to_string()),
            ValidationError::InvalidPhone(phone) => ServiceError::InvalidPhone(phone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ServiceError) -> StatusCode {
        HandlerError::from_service(err, "Bir hata oluştu").status_code()
    }

    #[test]
    fn test_client_errors_map_to_400() {
        assert_eq!(status_of(ServiceError::MissingField("name".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::InvalidPhone("1".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ServiceError::InvalidStatus("archived".into())), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors() {
        assert_eq!(status_of(ServiceError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ServiceError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(ServiceError::DuplicateKey("NF1".into())), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_of(ServiceError::Internal("boom".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = HandlerError::from_service(ServiceError::Internal("socket closed".into()), "Bir hata oluştu");
        assert_eq!(err.message, "Bir hata oluştu");
    }

    #[test]
    fn test_duplicate_key_from_repository() {
        let err: ServiceError = RepositoryError::already_exists("NF1").into();
        assert_eq!(err, ServiceError::DuplicateKey("NF1".into()));
    }

    #[test]
    fn test_validation_conversion() {
        let err: ServiceError = ValidationError::MissingField("service").into();
        assert_eq!(err, ServiceError::MissingField("service".into()));
    }
}
