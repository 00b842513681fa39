#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::{Request, StatusCode}, Router};
use bson::oid::ObjectId;
use http_body_util::BodyExt;
use nefes_backend::middlewares::admin_middleware::AdminAuthState;
use nefes_backend::model::quote::{Quote, QuoteFilter, QuoteStatus};
use nefes_backend::repository::quote_repo::QuoteRepository;
use nefes_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use nefes_backend::router::app_router;
use nefes_backend::service::quote_service::QuoteServiceImpl;
use nefes_backend::util::email::{EmailError, QuoteNotifier, Recipient};
use nefes_backend::util::quote_number::{quote_number_from_millis, QuoteNumberGenerator};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const ADMIN_PASSWORD: &str = "nefes-test-secret";

/// Store double with the same filter, sort and uniqueness rules as the
/// MongoDB repository.
#[derive(Default)]
pub struct InMemoryQuoteRepository {
    quotes: Mutex<Vec<Quote>>,
    offline: AtomicBool,
    fail_writes: AtomicBool,
    stall_ping: AtomicBool,
}

impl InMemoryQuoteRepository {
    pub fn all(&self) -> Vec<Quote> {
        self.quotes.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.quotes.lock().unwrap().len()
    }

    pub fn seed(&self, mut quote: Quote) -> Quote {
        quote.id.get_or_insert_with(ObjectId::new);
        self.quotes.lock().unwrap().push(quote.clone());
        quote
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Ping never answers, like a MongoDB that accepts no connections.
    pub fn set_stall_ping(&self, stall: bool) {
        self.stall_ping.store(stall, Ordering::SeqCst);
    }
}

#[async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn create(&self, quote: Quote) -> RepositoryResult<Quote> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::database("write failed"));
        }
        let mut quotes = self.quotes.lock().unwrap();
        if quotes.iter().any(|q| q.quote_number == quote.quote_number) {
            return Err(RepositoryError::already_exists(format!("Duplicate key: {}", quote.quote_number)));
        }
        let mut stored = quote;
        stored.id = Some(ObjectId::new());
        quotes.push(stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Quote> {
        self.quotes
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.id == Some(id))
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(id.to_hex()))
    }

    async fn get_by_quote_number(&self, quote_number: &str) -> RepositoryResult<Quote> {
        self.quotes
            .lock()
            .unwrap()
            .iter()
            .find(|q| q.quote_number == quote_number)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(quote_number))
    }

    async fn find(&self, filter: &QuoteFilter, limit: i64, skip: u64) -> RepositoryResult<Vec<Quote>> {
        let mut matching: Vec<Quote> = self
            .quotes
            .lock()
            .unwrap()
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self, filter: &QuoteFilter) -> RepositoryResult<u64> {
        Ok(self.quotes.lock().unwrap().iter().filter(|q| filter.matches(q)).count() as u64)
    }

    async fn update_status(&self, id: ObjectId, status: QuoteStatus, updated_at: String) -> RepositoryResult<Quote> {
        let mut quotes = self.quotes.lock().unwrap();
        let quote = quotes
            .iter_mut()
            .find(|q| q.id == Some(id))
            .ok_or_else(|| RepositoryError::not_found(id.to_hex()))?;
        quote.status = status;
        quote.updated_at = updated_at;
        Ok(quote.clone())
    }

    async fn ping(&self) -> bool {
        if self.stall_ping.load(Ordering::SeqCst) {
            return std::future::pending::<bool>().await;
        }
        !self.offline.load(Ordering::SeqCst)
    }
}

/// Records every confirmation attempt; optionally fails them all.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(Recipient, String)>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl QuoteNotifier for RecordingNotifier {
    async fn send_quote_confirmation(&self, quote: &Quote) -> Result<(), EmailError> {
        self.sent
            .lock()
            .unwrap()
            .push((Recipient::for_quote(quote), quote.quote_number.clone()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmailError::SmtpError("connection refused".to_string()));
        }
        Ok(())
    }
}

/// Deterministic quote numbers: NF00000001, NF00000002, ...
#[derive(Default)]
pub struct SequenceQuoteNumbers {
    next: AtomicI64,
}

impl QuoteNumberGenerator for SequenceQuoteNumbers {
    fn next_quote_number(&self) -> String {
        quote_number_from_millis(self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Always hands out the same number, to force a collision.
pub struct FixedQuoteNumber(pub &'static str);

impl QuoteNumberGenerator for FixedQuoteNumber {
    fn next_quote_number(&self) -> String {
        self.0.to_string()
    }
}

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryQuoteRepository>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn test_app() -> TestApp {
    test_app_with_numbers(Arc::new(SequenceQuoteNumbers::default()))
}

pub fn test_app_with_numbers(numbers: Arc<dyn QuoteNumberGenerator>) -> TestApp {
    let repo = Arc::new(InMemoryQuoteRepository::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = Arc::new(QuoteServiceImpl::new(repo.clone(), notifier.clone(), numbers));
    let admin = Arc::new(AdminAuthState::new(ADMIN_PASSWORD.to_string()));
    TestApp { router: app_router(service, admin), repo, notifier }
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn admin_request(method: &str, uri: &str, body: Option<&Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-admin-password", ADMIN_PASSWORD);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}
