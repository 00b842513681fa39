use regex::Regex;
use std::sync::LazyLock;

use crate::dto::quote_dto::QuoteRequest;
use crate::model::quote::NewQuote;

/// Turkish mobile number: 05 followed by nine digits.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^05\d{9}$").expect("phone pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
}

/// Removes every whitespace character, so `0532 123 45 67` becomes `05321234567`.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Checks a raw submission and produces the normalized record fields.
///
/// Required fields are checked before the phone format, in form order.
pub fn validate_quote_request(request: QuoteRequest) -> Result<NewQuote, ValidationError> {
    let name = required(request.name, "name")?;
    let phone = required(request.phone, "phone")?;
    let service = required(request.service, "service")?;
    let from = required(request.from, "from")?;
    let to = required(request.to, "to")?;

    let phone = normalize_phone(&phone);
    if !is_valid_phone(&phone) {
        return Err(ValidationError::InvalidPhone(phone));
    }

    Ok(NewQuote {
        name,
        phone,
        email: optional(request.email),
        service,
        from,
        to,
        message: optional(request.message),
    })
}
