use crate::dto::quote_dto::QuoteView;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

pub const ADMIN_TOKEN: &str = "admin-authenticated";
pub const DEFAULT_LIST_LIMIT: i64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
    pub token: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteStats {
    pub total: u64,
    pub pending: u64,
    pub contacted: u64,
    pub completed: u64,
    pub this_month: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub status: String,
    pub stats: QuoteStats,
}

/// Parsed `GET /api/admin/quotes` query.
#[derive(Debug, Clone, Validate, PartialEq)]
pub struct ListQuotesParams {
    pub status: Option<String>,
    pub search: Option<String>,
    #[validate(range(min = 1, max = 1000))]
    pub limit: i64,
    #[validate(range(min = 0))]
    pub skip: i64,
}

impl ListQuotesParams {
    /// Non-numeric `limit`/`skip` fall back to their defaults.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let limit = params
            .get("limit")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_LIST_LIMIT);
        let skip = params.get("skip").and_then(|v| v.trim().parse().ok()).unwrap_or(0);
        ListQuotesParams {
            status: params.get("status").cloned(),
            search: params.get("search").cloned(),
            limit,
            skip,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteListResponse {
    pub status: String,
    pub quotes: Vec<QuoteView>,
    pub total: u64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub quote: QuoteView,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuoteStatusRequest {
    pub status: Option<String>,
}
