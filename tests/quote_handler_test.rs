mod common;

use axum::{body::Body, http::{Request, StatusCode}};
use common::{
    json_request, send, test_app, test_app_with_numbers, FixedQuoteNumber, InMemoryQuoteRepository,
    SequenceQuoteNumbers, ADMIN_PASSWORD,
};
use nefes_backend::middlewares::admin_middleware::AdminAuthState;
use nefes_backend::model::quote::QuoteStatus;
use nefes_backend::router::app_router;
use nefes_backend::service::quote_service::QuoteServiceImpl;
use nefes_backend::util::email::{DisabledNotifier, Recipient};
use nefes_backend::util::quote_number::{is_quote_number, EpochQuoteNumberGenerator};
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn valid_body() -> Value {
    json!({
        "name": "Ayşe Yılmaz",
        "phone": "0532 123 45 67",
        "email": "ayse@example.com",
        "service": "evden-eve",
        "from": "Kadıköy, İstanbul",
        "to": "Çankaya, Ankara",
        "message": "3+1 daire, asansör yok"
    })
}

#[tokio::test]
async fn test_valid_submission_is_stored_pending() {
    let app = test_app_with_numbers(Arc::new(EpochQuoteNumberGenerator));
    let (status, body) = send(&app.router, json_request("POST", "/api/quote-request", &valid_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["estimatedResponse"], "24 saat içinde");
    let number = body["quoteNumber"].as_str().unwrap();
    assert!(is_quote_number(number), "unexpected quote number {number}");

    let stored = app.repo.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].quote_number, number);
    assert_eq!(stored[0].status, QuoteStatus::Pending);
    assert_eq!(stored[0].phone, "05321234567");
    assert_eq!(stored[0].from, "Kadıköy, İstanbul");
    assert_eq!(stored[0].created_at, stored[0].updated_at);
}

#[tokio::test]
async fn test_confirmation_goes_to_email() {
    let app = test_app();
    let (status, body) = send(&app.router, json_request("POST", "/api/quote-request", &valid_body())).await;
    assert_eq!(status, StatusCode::OK);

    let sent = app.notifier.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, Recipient::Email("ayse@example.com".to_string()));
    assert_eq!(sent[0].1, body["quoteNumber"].as_str().unwrap());
}

#[tokio::test]
async fn test_confirmation_falls_back_to_phone_without_email() {
    let app = test_app();
    let mut body = valid_body();
    body.as_object_mut().unwrap().remove("email");
    let (status, _) = send(&app.router, json_request("POST", "/api/quote-request", &body)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.repo.all()[0].email, None);
    let sent = app.notifier.sent.lock().unwrap().clone();
    assert_eq!(sent[0].0, Recipient::Phone("05321234567".to_string()));
}

#[tokio::test]
async fn test_notifier_failure_does_not_fail_submission() {
    let app = test_app();
    app.notifier.fail.store(true, Ordering::SeqCst);
    let (status, body) = send(&app.router, json_request("POST", "/api/quote-request", &valid_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(app.repo.len(), 1);
}

#[tokio::test]
async fn test_missing_service_rejected_before_storage() {
    let app = test_app();
    let mut body = valid_body();
    body.as_object_mut().unwrap().remove("service");
    let (status, resp) = send(&app.router, json_request("POST", "/api/quote-request", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "Zorunlu alanları doldurun!");
    assert_eq!(app.repo.len(), 0);
    assert!(app.notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_phone_rejected() {
    let app = test_app();
    let mut body = valid_body();
    body["phone"] = json!("123456");
    let (status, resp) = send(&app.router, json_request("POST", "/api/quote-request", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["message"], "Geçerli bir telefon numarası girin (05XX XXX XX XX)");
    assert_eq!(app.repo.len(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = test_app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/quote-request")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, resp) = send(&app.router, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["status"], "error");
}

#[tokio::test]
async fn test_duplicate_quote_number_is_server_error() {
    let app = test_app_with_numbers(Arc::new(FixedQuoteNumber("NF12345678")));
    let (first, _) = send(&app.router, json_request("POST", "/api/quote-request", &valid_body())).await;
    assert_eq!(first, StatusCode::OK);

    let mut second_body = valid_body();
    second_body["name"] = json!("Mehmet Demir");
    let (second, resp) = send(&app.router, json_request("POST", "/api/quote-request", &second_body)).await;

    assert_eq!(second, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp["message"], "Bir hata oluştu. Lütfen tekrar deneyin.");
    let stored = app.repo.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Ayşe Yılmaz");
}

#[tokio::test]
async fn test_storage_failure_is_server_error() {
    let app = test_app();
    app.repo.set_fail_writes(true);
    let (status, resp) = send(&app.router, json_request("POST", "/api/quote-request", &valid_body())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp["status"], "error");
    assert!(app.notifier.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_form_post_is_accepted() {
    let app = test_app();
    let form = "name=Ay%C5%9Fe+Y%C4%B1lmaz&phone=0532+123+45+67&service=evden-eve&from=Kad%C4%B1k%C3%B6y&to=%C3%87ankaya";
    let req = Request::builder()
        .method("POST")
        .uri("/api/quote-request")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form))
        .unwrap();
    let (status, body) = send(&app.router, req).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    let stored = app.repo.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Ayşe Yılmaz");
    assert_eq!(stored[0].phone, "05321234567");
    assert_eq!(stored[0].to, "Çankaya");
    assert_eq!(stored[0].email, None);
}

#[tokio::test]
async fn test_submission_works_with_mail_disabled() {
    let repo = Arc::new(InMemoryQuoteRepository::default());
    let service = Arc::new(QuoteServiceImpl::new(
        repo.clone(),
        Arc::new(DisabledNotifier::new("EMAIL_USER not set")),
        Arc::new(SequenceQuoteNumbers::default()),
    ));
    let router = app_router(service, Arc::new(AdminAuthState::new(ADMIN_PASSWORD.to_string())));

    let (status, body) = send(&router, json_request("POST", "/api/quote-request", &valid_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quoteNumber"], "NF00000001");
    assert_eq!(repo.len(), 1);
}
