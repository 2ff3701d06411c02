//! API Integration Tests
//!
//! Drive the full router (middleware included) against a PostgreSQL
//! database. Run with: DATABASE_URL=postgres://... cargo test -- --ignored

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use mamapesa::api::{self, AppState};
use mamapesa::LoanPolicy;

mod common;

async fn test_app() -> Router {
    let pool = common::setup_test_db().await;
    api::build_router(AppState::new(pool, LoanPolicy::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Correlation-Id", Uuid::new_v4().to_string());
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        other => other.to_string().parse().unwrap(),
    }
}

async fn create_user(app: &Router, name: &str) -> Uuid {
    let (status, json) = send(
        app,
        "POST",
        "/api/v1/users",
        Some(json!({
            "username": name,
            "email": format!("{}.{}@Example.com", name, Uuid::new_v4().simple()),
            "phone_number": format!("07{}", common::unique_digits(8)),
            "id_number": common::unique_digits(12),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "user creation failed: {}", json);
    assert!(json.get("password").is_none());
    json["id"].as_str().unwrap().parse().unwrap()
}

async fn create_item(app: &Router, name: &str) -> Uuid {
    let (status, json) = send(app, "POST", "/api/v1/items", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_health() {
    let app = test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_loan_lifecycle() {
    let app = test_app().await;
    let user_id = create_user(&app, "wanjiru").await;
    let item_id = create_item(&app, "Solar panel").await;

    // 1. Trust score 40 allows 4000
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/users/{}/trust-score", user_id),
        Some(json!({ "score": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(&app, "GET", &format!("/api/v1/users/{}/max-loan-amount", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&json["max_loan_amount"]), dec!(4000));

    // 2. Above the maximum is rejected
    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/loans/apply",
        Some(json!({
            "user_id": user_id,
            "amount": "4500.00",
            "interest_rate": "10",
            "duration_months": 6,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error_code"], "loan_limit_exceeded");

    // 3. Within the maximum is accepted
    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/loans/apply",
        Some(json!({
            "user_id": user_id,
            "amount": "1000.00",
            "interest_rate": "10",
            "duration_months": 6,
            "item_ids": [item_id],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "application failed: {}", json);
    assert_eq!(json["loan_count"], 1);
    let loan_id = json["loan"]["id"].as_str().unwrap().to_string();

    // 4. Derived values
    let (status, json) = send(&app, "GET", &format!("/api/v1/loans/{}/summary", loan_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&json["total_loan_owed"]), dec!(1100.00));
    assert_eq!(decimal(&json["remaining_loan_amount"]), Decimal::ZERO);
    assert_eq!(json["is_item_available"], true);
    assert_eq!(json["loaned_item_ids"], json!([item_id]));

    // 5. Repayment
    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/v1/loans/{}/repay", loan_id),
        Some(json!({ "amount": "250.50" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "repayment failed: {}", json);
    assert_eq!(decimal(&json["loan"]["repaid_amount"]), dec!(250.50));
    assert_eq!(decimal(&json["loan"]["total_paid"]), dec!(250.50));

    let (_, payments) = send(&app, "GET", &format!("/api/v1/loans/{}/payments", loan_id), None).await;
    assert_eq!(payments.as_array().unwrap().len(), 1);
    assert_eq!(payments[0]["is_loan_payment"], true);

    let (_, transactions) =
        send(&app, "GET", &format!("/api/v1/loans/{}/transactions", loan_id), None).await;
    let mut types: Vec<&str> = transactions
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["transaction_type"].as_str().unwrap())
        .collect();
    types.sort();
    assert_eq!(types, vec!["loan", "payment"]);

    // 6. Zero repayment is invalid
    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/v1/loans/{}/repay", loan_id),
        Some(json!({ "amount": "0" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "invalid_amount");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_application_requires_trust_score() {
    let app = test_app().await;
    let user_id = create_user(&app, "kamau").await;

    let (status, json) = send(&app, "GET", &format!("/api/v1/users/{}/max-loan-amount", user_id), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error_code"], "no_trust_score");

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/loans/apply",
        Some(json!({
            "user_id": user_id,
            "amount": "100",
            "interest_rate": "5",
            "duration_months": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error_code"], "no_trust_score");

    // nothing was written
    let (_, loans) = send(&app, "GET", &format!("/api/v1/users/{}/loans", user_id), None).await;
    assert!(loans.as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_blacklisted_user_rejected() {
    let app = test_app().await;
    let user_id = create_user(&app, "njeri").await;

    send(
        &app,
        "POST",
        &format!("/api/v1/users/{}/trust-score", user_id),
        Some(json!({ "score": 90, "is_blacklisted": true })),
    )
    .await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/loans/apply",
        Some(json!({
            "user_id": user_id,
            "amount": "100",
            "interest_rate": "5",
            "duration_months": 1,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error_code"], "blacklisted");

    let (_, user) = send(&app, "GET", &format!("/api/v1/users/{}", user_id), None).await;
    assert_eq!(user["loan_count"], 0);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_savings_deposits_complete_goal() {
    let app = test_app().await;
    let user_id = create_user(&app, "otieno").await;
    let item_id = create_item(&app, "Water tank").await;

    let (status, goal) = send(
        &app,
        "POST",
        "/api/v1/savings-items",
        Some(json!({
            "user_id": user_id,
            "item_id": item_id,
            "target_amount": "1000.00",
            "due_date": "2099-12-31",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "goal creation failed: {}", goal);
    let goal_id = goal["id"].as_str().unwrap().to_string();

    let (status, savings) = send(
        &app,
        "POST",
        "/api/v1/savings",
        Some(json!({
            "user_id": user_id,
            "savings_item_id": goal_id,
            "start_date": "2024-01-01",
            "end_date": "2030-01-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "savings creation failed: {}", savings);
    assert_eq!(savings["end_date"], "2024-03-31");
    let savings_id = savings["id"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/v1/savings/{}/deposit", savings_id),
        Some(json!({ "amount": "400" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "deposit failed: {}", json);
    assert_eq!(decimal(&json["savings"]["amount_saved"]), dec!(400));

    let (_, summary) = send(&app, "GET", &format!("/api/v1/savings-items/{}/summary", goal_id), None).await;
    assert_eq!(decimal(&summary["amount_remaining"]), dec!(600));
    assert_eq!(summary["is_completed"], false);

    send(
        &app,
        "POST",
        &format!("/api/v1/savings/{}/deposit", savings_id),
        Some(json!({ "amount": "600", "description": "Harvest money" })),
    )
    .await;

    let (_, summary) = send(&app, "GET", &format!("/api/v1/savings-items/{}/summary", goal_id), None).await;
    assert_eq!(summary["is_completed"], true);
    assert_eq!(decimal(&summary["amount_remaining"]), Decimal::ZERO);

    let (_, plan) = send(&app, "GET", &format!("/api/v1/savings/{}/summary", savings_id), None).await;
    assert_eq!(decimal(&plan["remaining_amount"]), Decimal::ZERO);
    assert_eq!(plan["is_item_available"], true);

    let (_, payments) = send(&app, "GET", &format!("/api/v1/savings/{}/payments", savings_id), None).await;
    assert_eq!(payments.as_array().unwrap().len(), 2);
    assert!(payments
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["is_savings_payment"] == true));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_not_found_and_duplicate() {
    let app = test_app().await;

    let (status, json) = send(&app, "GET", &format!("/api/v1/loans/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "not_found");

    let user_id = create_user(&app, "zawadi").await;
    let (_, user) = send(&app, "GET", &format!("/api/v1/users/{}", user_id), None).await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(json!({
            "username": "zawadi2",
            "email": user["email"].as_str().unwrap().to_uppercase(),
            "phone_number": format!("07{}", common::unique_digits(8)),
            "id_number": common::unique_digits(12),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error_code"], "duplicate");
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_out_of_range_savings_start_rejected() {
    let app = test_app().await;
    let user_id = create_user(&app, "imani").await;
    let item_id = create_item(&app, "Sewing machine").await;

    let (_, goal) = send(
        &app,
        "POST",
        "/api/v1/savings-items",
        Some(json!({
            "user_id": user_id,
            "item_id": item_id,
            "target_amount": "300",
            "due_date": "2099-12-31",
        })),
    )
    .await;
    let goal_id = goal["id"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/savings",
        Some(json!({
            "user_id": user_id,
            "savings_item_id": goal_id,
            "start_date": "+262142-12-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "invalid_date");

    let (status, savings) = send(
        &app,
        "POST",
        "/api/v1/savings",
        Some(json!({ "user_id": user_id, "savings_item_id": goal_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let savings_id = savings["id"].as_str().unwrap().to_string();

    let (status, json) = send(
        &app,
        "PATCH",
        &format!("/api/v1/savings/{}", savings_id),
        Some(json!({ "start_date": "+262142-12-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "invalid_date");

    // the stored plan is untouched
    let (_, stored) = send(&app, "GET", &format!("/api/v1/savings/{}", savings_id), None).await;
    assert_eq!(stored["start_date"], savings["start_date"]);
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_unlink_missing_item_returns_error_body() {
    let app = test_app().await;
    let user_id = create_user(&app, "jabari").await;

    let (status, loan) = send(
        &app,
        "POST",
        "/api/v1/loans",
        Some(json!({
            "user_id": user_id,
            "amount": "200",
            "interest_rate": "5",
            "duration_months": 2,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let loan_id = loan["id"].as_str().unwrap();
    let item_id = Uuid::new_v4();

    let (status, json) = send(
        &app,
        "DELETE",
        &format!("/api/v1/loans/{}/items/{}", loan_id, item_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "not_found");
    assert_eq!(json["details"], item_id.to_string());
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn test_oversized_username_returns_400() {
    let app = test_app().await;

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(json!({
            "username": "a".repeat(101),
            "email": format!("long.{}@example.com", Uuid::new_v4().simple()),
            "phone_number": format!("07{}", common::unique_digits(8)),
            "id_number": common::unique_digits(12),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "invalid_value");
}
