use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::dto::admin_dto::{ListQuotesParams, QuoteStats};
use crate::dto::quote_dto::QuoteRequest;
use crate::model::quote::{format_timestamp, next_updated_at, Quote, QuoteFilter, QuoteStatus};
use crate::repository::quote_repo::QuoteRepository;
use crate::util::email::QuoteNotifier;
use crate::util::error::ServiceError;
use crate::util::quote_number::{is_quote_number, QuoteNumberGenerator};
use crate::util::validation::validate_quote_request;

#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Validates, stores and confirms a public submission.
    async fn submit_quote(&self, request: QuoteRequest) -> Result<Quote, ServiceError>;
    async fn quote_stats(&self) -> Result<QuoteStats, ServiceError>;
    /// Returns one page of matching quotes and the total match count.
    async fn list_quotes(&self, params: &ListQuotesParams) -> Result<(Vec<Quote>, u64), ServiceError>;
    /// `id` is either the ObjectId hex string or the quote number.
    async fn get_quote(&self, id: &str) -> Result<Quote, ServiceError>;
    async fn update_quote_status(&self, id: &str, status: Option<&str>) -> Result<Quote, ServiceError>;
    async fn database_connected(&self) -> bool;
}

/// Upper bound for the status probes; a down database reads as disconnected
/// instead of stalling `/health`.
pub const DB_STATUS_TIMEOUT: Duration = Duration::from_millis(1500);

pub struct QuoteServiceImpl {
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub notifier: Arc<dyn QuoteNotifier>,
    pub quote_numbers: Arc<dyn QuoteNumberGenerator>,
}

impl QuoteServiceImpl {
    pub fn new(
        quote_repo: Arc<dyn QuoteRepository>,
        notifier: Arc<dyn QuoteNotifier>,
        quote_numbers: Arc<dyn QuoteNumberGenerator>,
    ) -> Self {
        QuoteServiceImpl { quote_repo, notifier, quote_numbers }
    }

    async fn resolve(&self, id: &str) -> Result<Quote, ServiceError> {
        let id = id.trim();
        if let Ok(object_id) = ObjectId::parse_str(id) {
            return Ok(self.quote_repo.get_by_id(object_id).await?);
        }
        if is_quote_number(id) {
            return Ok(self.quote_repo.get_by_quote_number(id).await?);
        }
        Err(ServiceError::NotFound(format!("Quote not found: {}", id)))
    }
}

/// First instant of the month containing `now`, in UTC.
pub fn start_of_month(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
    #[instrument(skip(self, request))]
    async fn submit_quote(&self, request: QuoteRequest) -> Result<Quote, ServiceError> {
        info!("New quote request received");

        let new_quote = validate_quote_request(request).map_err(|e| {
            warn!("Quote request rejected: {}", e);
            ServiceError::from(e)
        })?;

        let quote_number = self.quote_numbers.next_quote_number();
        let quote = Quote::new(quote_number, new_quote, Utc::now());

        let stored = self.quote_repo.create(quote).await.map_err(|e| {
            error!("Failed to store quote: {}", e);
            ServiceError::from(e)
        })?;
        info!(quote_number = %stored.quote_number, "Quote stored");

        // The submission is already persisted; a mail failure must not undo it.
        match self.notifier.send_quote_confirmation(&stored).await {
            Ok(()) => info!(quote_number = %stored.quote_number, "Confirmation sent"),
            Err(e) => warn!(quote_number = %stored.quote_number, "Confirmation not sent: {}", e),
        }

        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn quote_stats(&self) -> Result<QuoteStats, ServiceError> {
        let since = format_timestamp(start_of_month(Utc::now()));
        let repo = &self.quote_repo;

        let total_filter = QuoteFilter::default();
        let pending_filter = QuoteFilter::with_status(QuoteStatus::Pending);
        let contacted_filter = QuoteFilter::with_status(QuoteStatus::Contacted);
        let completed_filter = QuoteFilter::with_status(QuoteStatus::Completed);
        let month_filter = QuoteFilter::created_since(since);

        let (total, pending, contacted, completed, this_month) = tokio::try_join!(
            repo.count(&total_filter),
            repo.count(&pending_filter),
            repo.count(&contacted_filter),
            repo.count(&completed_filter),
            repo.count(&month_filter),
        )
        .map_err(|e| {
            error!("Failed to compute quote stats: {}", e);
            ServiceError::from(e)
        })?;

        Ok(QuoteStats { total, pending, contacted, completed, this_month })
    }

    #[instrument(skip(self))]
    async fn list_quotes(&self, params: &ListQuotesParams) -> Result<(Vec<Quote>, u64), ServiceError> {
        params
            .validate()
            .map_err(|e| ServiceError::InvalidInput(format!("Geçersiz sayfalama: {}", e)))?;

        let filter = QuoteFilter::new(params.status.as_deref(), params.search.as_deref());
        let skip = u64::try_from(params.skip).unwrap_or(0);

        let quotes = self.quote_repo.find(&filter, params.limit, skip).await?;
        let total = self.quote_repo.count(&filter).await?;
        info!("{} quotes returned of {}", quotes.len(), total);
        Ok((quotes, total))
    }

    #[instrument(skip(self))]
    async fn get_quote(&self, id: &str) -> Result<Quote, ServiceError> {
        self.resolve(id).await
    }

    #[instrument(skip(self))]
    async fn update_quote_status(&self, id: &str, status: Option<&str>) -> Result<Quote, ServiceError> {
        let raw = status.unwrap_or_default();
        let status: QuoteStatus = raw
            .parse()
            .map_err(|_| ServiceError::InvalidStatus(raw.to_string()))?;

        let current = self.resolve(id).await?;
        let object_id = current
            .id
            .ok_or_else(|| ServiceError::Internal(format!("Stored quote {} has no id", current.quote_number)))?;

        let updated_at = next_updated_at(&current.updated_at, Utc::now());
        let updated = self.quote_repo.update_status(object_id, status, updated_at).await?;
        info!(quote_number = %updated.quote_number, status = %status, "Quote status updated");
        Ok(updated)
    }

    async fn database_connected(&self) -> bool {
        match tokio::time::timeout(DB_STATUS_TIMEOUT, self.quote_repo.ping()).await {
            Ok(connected) => connected,
            Err(_) => {
                warn!("Database ping timed out after {:?}", DB_STATUS_TIMEOUT);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_month() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        assert_eq!(format_timestamp(start_of_month(now)), "2024-02-01T00:00:00.000Z");
    }
}
