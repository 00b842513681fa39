use bson::oid::ObjectId;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a quote request. Any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Pending,
    Contacted,
    Quoted,
    Completed,
    Cancelled,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 5] = [
        QuoteStatus::Pending,
        QuoteStatus::Contacted,
        QuoteStatus::Quoted,
        QuoteStatus::Completed,
        QuoteStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Contacted => "contacted",
            QuoteStatus::Quoted => "quoted",
            QuoteStatus::Completed => "completed",
            QuoteStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown quote status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for QuoteStatus {
    type Err = UnknownStatus;

    // Exact, case-sensitive match on the stored spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuoteStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A validated submission, ready to be stamped with an identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuote {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub service: String,
    pub from: String,
    pub to: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub quote_number: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub service: String,
    pub from: String,
    pub to: String,
    pub message: Option<String>,
    #[serde(default)]
    pub status: QuoteStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Quote {
    /// Builds a fresh `pending` record. The storage id is assigned on insert.
    pub fn new(quote_number: String, new_quote: NewQuote, now: DateTime<Utc>) -> Self {
        let stamp = format_timestamp(now);
        Quote {
            id: None,
            quote_number,
            name: new_quote.name,
            phone: new_quote.phone,
            email: new_quote.email,
            service: new_quote.service,
            from: new_quote.from,
            to: new_quote.to,
            message: new_quote.message,
            status: QuoteStatus::Pending,
            created_at: stamp.clone(),
            updated_at: stamp,
        }
    }
}

/// Fixed-width RFC 3339 so that string order is chronological order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Next `updatedAt` value: the current time, pushed one millisecond past
/// `previous` when the clock has not moved on.
pub fn next_updated_at(previous: &str, now: DateTime<Utc>) -> String {
    match DateTime::parse_from_rfc3339(previous) {
        Ok(prev) => {
            let prev = prev.with_timezone(&Utc);
            if now > prev {
                format_timestamp(now)
            } else {
                format_timestamp(prev + Duration::milliseconds(1))
            }
        }
        Err(_) => format_timestamp(now),
    }
}

/// Admin listing filter. Both criteria are optional and combine with AND;
/// the search term is an OR across name, phone and quote number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteFilter {
    pub status: Option<String>,
    pub search: Option<String>,
    /// Inclusive lower bound on `createdAt`
    pub created_since: Option<String>,
}

impl QuoteFilter {
    /// Blank values and the literal `all` status mean "no filter".
    pub fn new(status: Option<&str>, search: Option<&str>) -> Self {
        let status = status
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "all")
            .map(str::to_string);
        let search = search.filter(|s| !s.is_empty()).map(str::to_string);
        QuoteFilter { status, search, created_since: None }
    }

    pub fn with_status(status: QuoteStatus) -> Self {
        QuoteFilter { status: Some(status.as_str().to_string()), ..Default::default() }
    }

    pub fn created_since(since: String) -> Self {
        QuoteFilter { created_since: Some(since), ..Default::default() }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        if let Some(status) = &self.status {
            if quote.status.as_str() != status {
                return false;
            }
        }
        if let Some(since) = &self.created_since {
            if quote.created_at.as_str() < since.as_str() {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [&quote.name, &quote.phone, &quote.quote_number]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}
