//! Router-level tests: policy guard behavior and the financials flow.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use schola_api::{AppState, create_router};
use schola_core::finance::FinancialSettings;
use schola_store::AppStore;

fn app() -> axum::Router {
    let state = AppState {
        store: Arc::new(AppStore::new(FinancialSettings::default())),
    };
    create_router(state)
}

fn request(method: &str, uri: &str, role: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(role) = role {
        builder = builder
            .header("x-schola-user", "test@school")
            .header("x-schola-role", role);
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let response = app()
        .oneshot(request("GET", "/api/v1/health", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_identity() {
    let response = app()
        .oneshot(request("GET", "/api/v1/students", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn policy_denies_out_of_scope_prefix() {
    let response = app()
        .oneshot(request(
            "GET",
            "/api/v1/budget-periods",
            Some("registrar"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_role_is_unauthorized() {
    let response = app()
        .oneshot(request("GET", "/api/v1/students", Some("headmaster"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn financials_flow_from_ingestion_to_status() {
    let app = app();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/students",
            Some("bursar"),
            Some(json!({
                "name": "Jane Doe",
                "origin": "bursar",
                "pay_code": "P-100",
                "level": "Year 2"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let student = body_json(response).await["student"].clone();
    let student_id = student["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/billings",
            Some("bursar"),
            Some(json!({
                "student_id": student_id,
                "amount": "1000000",
                "description": "Tuition",
                "date": "2025-09-01"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/payments",
            Some("bursar"),
            Some(json!({
                "student_id": student_id,
                "amount": "900000",
                "method": "MTN Mobile Money",
                "date": "2025-09-10",
                "reference": "TXN-9"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let payment = body_json(response).await["payment"].clone();
    assert_eq!(payment["method"], "digital");

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/v1/students/{student_id}/financials"),
            Some("bursar"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let financials = body_json(response).await;
    assert_eq!(financials["status"], "probation");
    assert_eq!(financials["outstanding_balance"], "100000");

    // the ingestion actions are all on the audit trail
    let response = app
        .oneshot(request(
            "GET",
            "/api/v1/audit-logs?search=payment",
            Some("admin"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let entries = body_json(response).await["entries"].clone();
    assert!(!entries.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn budget_period_overlap_is_conflict() {
    let app = app();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/v1/budget-periods",
            Some("bursar"),
            Some(json!({
                "name": "H1",
                "start_date": "2025-01-01",
                "end_date": "2025-06-30"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(request(
            "POST",
            "/api/v1/budget-periods",
            Some("bursar"),
            Some(json!({
                "name": "H2",
                "start_date": "2025-06-30",
                "end_date": "2025-12-31"
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
