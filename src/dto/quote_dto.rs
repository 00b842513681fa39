use crate::model::quote::{Quote, QuoteStatus};
use serde::{Deserialize, Serialize};

pub const ESTIMATED_RESPONSE: &str = "24 saat içinde";

/// Public form submission. Every field is optional at the wire level so a
/// missing value is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub service: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSubmissionResponse {
    pub status: String,
    pub message: String,
    pub quote_number: String,
    pub estimated_response: String,
}

impl QuoteSubmissionResponse {
    pub fn accepted(quote_number: String) -> Self {
        QuoteSubmissionResponse {
            status: "success".to_string(),
            message: "Talebiniz başarıyla alındı!".to_string(),
            quote_number,
            estimated_response: ESTIMATED_RESPONSE.to_string(),
        }
    }
}

/// Wire shape of a stored quote: the ObjectId is rendered as a hex string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub quote_number: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub service: String,
    pub from: String,
    pub to: String,
    pub message: Option<String>,
    pub status: QuoteStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Quote> for QuoteView {
    fn from(quote: Quote) -> Self {
        QuoteView {
            id: quote.id.map(|id| id.to_hex()),
            quote_number: quote.quote_number,
            name: quote.name,
            phone: quote.phone,
            email: quote.email,
            service: quote.service,
            from: quote.from,
            to: quote.to,
            message: quote.message,
            status: quote.status,
            created_at: quote.created_at,
            updated_at: quote.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quote::NewQuote;
    use bson::oid::ObjectId;

    #[test]
    fn test_request_tolerates_missing_fields() {
        let req: QuoteRequest = serde_json::from_str(r#"{"name":"Ali","phone":"05321234567"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Ali"));
        assert!(req.service.is_none());
    }

    #[test]
    fn test_view_renders_hex_id() {
        let id = ObjectId::new();
        let mut quote = Quote::new(
            "NF00000001".to_string(),
            NewQuote {
                name: "Ali".to_string(),
                phone: "05321234567".to_string(),
                email: None,
                service: "ofis".to_string(),
                from: "A".to_string(),
                to: "B".to_string(),
                message: None,
            },
            chrono::Utc::now(),
        );
        quote.id = Some(id);
        let json = serde_json::to_value(QuoteView::from(quote)).unwrap();
        assert_eq!(json["_id"], id.to_hex());
        assert_eq!(json["quoteNumber"], "NF00000001");
    }

    #[test]
    fn test_submission_response_shape() {
        let json = serde_json::to_value(QuoteSubmissionResponse::accepted("NF12345678".to_string())).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["quoteNumber"], "NF12345678");
        assert_eq!(json["estimatedResponse"], ESTIMATED_RESPONSE);
    }
}
