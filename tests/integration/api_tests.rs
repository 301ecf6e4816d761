//! API integration tests
//!
//! Drive the full router in-process against the in-memory store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use librarium_server::{
    api,
    config::AuthConfig,
    repository::Repository,
    services::Services,
    AppState,
};

const SECRET: &str = "integration-secret";

fn app() -> Router {
    let auth = AuthConfig {
        jwt_secret: SECRET.to_string(),
        jwt_expiration_hours: 1,
    };
    let services = Services::new(Repository::in_memory(), auth, Arc::new(mockable::DefaultClock));
    api::create_router(AppState {
        services: Arc::new(services),
    })
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

/// Register a librarian and return a bearer token
async fn get_auth_token(app: &Router) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/signup",
        None,
        Some(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "username": "ada",
            "email": "ada@gmail.com",
            "password": "Engine#1843"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "ada", "password": "Engine#1843" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("No token in response").to_string()
}

async fn add_student(app: &Router, token: &str, email: &str) -> StatusCode {
    let (status, _) = send(
        app,
        "POST",
        "/api/addstudent",
        Some(token),
        Some(json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "email": email,
            "membershipPlan": "Premium",
            "startDate": "2024-02-01"
        })),
    )
    .await;
    status
}

async fn add_book(app: &Router, token: &str, isbn: &str, copies: i32) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/addbook",
        Some(token),
        Some(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": isbn,
            "copies": copies
        })),
    )
    .await
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = app();
    get_auth_token(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({ "username": "ada", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username or password");

    let (status, _) = send(&app, "POST", "/api/login", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_rejects_invalid_and_duplicate() {
    let app = app();
    get_auth_token(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(json!({
            "firstName": "Bob",
            "lastName": "Smith",
            "username": "ada",
            "email": "bob@gmail.com",
            "password": "Engine#1843"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/signup",
        None,
        Some(json!({
            "firstName": "Bob",
            "lastName": "Smith",
            "username": "bob",
            "email": "bob@example.org",
            "password": "Engine#1843"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = app();

    let (status, _) = send(&app, "GET", "/api/listbooks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({ "sub": "1", "librarian_id": 1, "exp": 4_000_000_000_i64, "iat": 0 }),
        &jsonwebtoken::EncodingKey::from_secret(b"someone-else"),
    )
    .expect("token");
    let (status, _) = send(&app, "GET", "/api/listbooks", Some(&forged), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_profile_roundtrip() {
    let app = app();
    let token = get_auth_token(&app).await;

    let (status, body) = send(&app, "GET", "/api/userprofile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");
    assert!(body.get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/api/updateprofile",
        Some(&token),
        Some(json!({ "lastName": "Byron" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastName"], "Byron");

    let (status, _) = send(&app, "POST", "/api/updateprofile", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_book_is_additive() {
    let app = app();
    let token = get_auth_token(&app).await;

    let (status, body) = add_book(&app, &token, "X", 2).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"]["counter"], 2);

    let (status, body) = add_book(&app, &token, "X", 3).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["counter"], 5);

    let (status, _) = add_book(&app, &token, "Y", 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/listbooks", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app();
    let token = get_auth_token(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/addbook")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("Failed to build request");
    let response = app.oneshot(request).await.expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_student_rejected() {
    let app = app();
    let token = get_auth_token(&app).await;

    assert_eq!(add_student(&app, &token, "a@gmail.com").await, StatusCode::CREATED);
    assert_eq!(add_student(&app, &token, "a@gmail.com").await, StatusCode::BAD_REQUEST);
    assert_eq!(add_student(&app, &token, "a@example.org").await, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/liststudents", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["membership"], "Premium");
}

#[tokio::test]
async fn test_lend_and_return_flow() {
    let app = app();
    let token = get_auth_token(&app).await;
    add_student(&app, &token, "a@gmail.com").await;
    add_book(&app, &token, "X", 1).await;

    let lend = json!({
        "bookISBN": "X",
        "borrowerName": "a@gmail.com",
        "borrowDate": "2024-05-01"
    });

    let (status, body) = send(&app, "POST", "/api/lendbook", Some(&token), Some(lend.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loan"]["expectedReturnDate"], "2024-05-08");
    assert_eq!(body["loan"]["borrowerName"], "a@gmail.com");

    let (status, _) = send(&app, "POST", "/api/lendbook", Some(&token), Some(lend)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, books) = send(&app, "GET", "/api/listbooks", Some(&token), None).await;
    assert_eq!(books[0]["counter"], 0);

    let (status, body) = send(&app, "GET", "/api/viewlentbooks", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["bookISBN"], "X");
    assert_eq!(body[0]["status"], "Overdue");

    let ret = json!({ "bookISBN": "X", "borrowerName": "a@gmail.com" });
    let (status, body) = send(&app, "POST", "/api/returnbook", Some(&token), Some(ret.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["actualReturnDate"].is_string());

    let (status, _) = send(&app, "POST", "/api/returnbook", Some(&token), Some(ret)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, books) = send(&app, "GET", "/api/listbooks", Some(&token), None).await;
    assert_eq!(books[0]["counter"], 1);

    let (_, loans) = send(&app, "GET", "/api/viewlentbooks", Some(&token), None).await;
    assert_eq!(loans[0]["status"], "Returned");
}

#[tokio::test]
async fn test_lend_missing_fields() {
    let app = app();
    let token = get_auth_token(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/lendbook",
        Some(&token),
        Some(json!({ "bookISBN": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fees_and_join() {
    let app = app();
    let token = get_auth_token(&app).await;
    add_student(&app, &token, "a@gmail.com").await;
    add_student(&app, &token, "b@gmail.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/managefees",
        Some(&token),
        Some(json!({
            "email": "a@gmail.com",
            "membership": "Standard",
            "fee": 25.5,
            "lastPaymentDate": "2024-01-15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["nextPaymentDate"], "2024-02-15");
    assert_eq!(body["record"]["overdue"], true);

    let (status, _) = send(
        &app,
        "POST",
        "/api/managefees",
        Some(&token),
        Some(json!({ "email": "a@gmail.com", "membership": "Gold", "fee": 1, "lastPaymentDate": "2024-01-15" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/liststudentswithfees", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 2);

    let paid = rows.iter().find(|r| r["email"] == "a@gmail.com").expect("a");
    assert_eq!(paid["fee"], 25.5);
    assert_eq!(paid["lastPaymentDate"], "2024-01-15");

    let unpaid = rows.iter().find(|r| r["email"] == "b@gmail.com").expect("b");
    assert_eq!(unpaid["fee"], 0.0);
    assert_eq!(unpaid["overdue"], false);
    assert_eq!(unpaid["lastPaymentDate"], "");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/lendbook"].is_object());
}

#[tokio::test]
async fn test_lend_with_unrepresentable_date_leaves_counter() {
    let app = app();
    let token = get_auth_token(&app).await;
    add_student(&app, &token, "a@gmail.com").await;
    add_book(&app, &token, "X", 1).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/lendbook",
        Some(&token),
        Some(json!({
            "bookISBN": "X",
            "borrowerName": "a@gmail.com",
            "borrowDate": "+262142-12-30"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, books) = send(&app, "GET", "/api/listbooks", Some(&token), None).await;
    assert_eq!(books[0]["counter"], 1);

    let (status, loans) = send(&app, "GET", "/api/viewlentbooks", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loans.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_fee_with_unrepresentable_date_is_not_stored() {
    let app = app();
    let token = get_auth_token(&app).await;
    add_student(&app, &token, "a@gmail.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/managefees",
        Some(&token),
        Some(json!({
            "email": "a@gmail.com",
            "membership": "Basic",
            "fee": 10,
            "lastPaymentDate": "+262142-12-15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, rows) = send(&app, "GET", "/api/liststudentswithfees", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rows[0]["email"], "a@gmail.com");
    assert_eq!(rows[0]["lastPaymentDate"], "");
}

#[tokio::test]
async fn test_fee_above_column_range_rejected() {
    let app = app();
    let token = get_auth_token(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/managefees",
        Some(&token),
        Some(json!({
            "email": "a@gmail.com",
            "membership": "Basic",
            "fee": 100000000,
            "lastPaymentDate": "2024-01-15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_profile_ignores_invalid_fields() {
    let app = app();
    let token = get_auth_token(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/updateprofile",
        Some(&token),
        Some(json!({ "lastName": "Byron", "username": "ada.b" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lastName"], "Byron");
    assert_eq!(body["username"], "ada");

    let (status, _) = send(
        &app,
        "POST",
        "/api/updateprofile",
        Some(&token),
        Some(json!({ "email": "ada@example.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_return_with_borrower_from_listing() {
    let app = app();
    let token = get_auth_token(&app).await;
    add_student(&app, &token, "a@gmail.com").await;
    add_book(&app, &token, "X", 1).await;
    send(
        &app,
        "POST",
        "/api/lendbook",
        Some(&token),
        Some(json!({ "bookISBN": "X", "borrowerName": "a@gmail.com", "borrowDate": "2024-05-01" })),
    )
    .await;

    let (_, loans) = send(&app, "GET", "/api/viewlentbooks", Some(&token), None).await;
    let loan = &loans[0];
    assert_eq!(loan["borrowerName"], "a@gmail.com");

    let (status, _) = send(
        &app,
        "POST",
        "/api/returnbook",
        Some(&token),
        Some(json!({ "bookISBN": loan["bookISBN"], "borrowerName": loan["borrowerName"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
