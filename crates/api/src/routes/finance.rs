//! Billing, payment, and bursary routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::map_store_error, routes::students::record_audit};
use schola_core::finance::{Billing, Bursary, Payment, PaymentMethod};
use schola_shared::types::{BillingId, BursaryId, PaymentId, StudentId};

/// Creates the finance ingestion routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/billings", post(create_billing))
        .route("/billings/{id}", delete(delete_billing))
        .route("/payments", post(create_payment))
        .route("/payments/{id}", delete(delete_payment))
        .route("/bursaries", post(create_bursary))
}

/// Request body for creating a billing.
#[derive(Debug, Deserialize)]
pub struct CreateBillingRequest {
    /// Student charged.
    pub student_id: Uuid,
    /// Amount charged.
    pub amount: Decimal,
    /// What the charge is for.
    pub description: String,
    /// Date of the charge.
    pub date: NaiveDate,
}

/// Request body for creating a payment.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Student credited.
    pub student_id: Uuid,
    /// Amount paid.
    pub amount: Decimal,
    /// Raw payment channel; classified at ingestion.
    pub method: String,
    /// Date of the payment.
    pub date: NaiveDate,
    /// External reference.
    #[serde(default)]
    pub reference: String,
}

/// Request body for creating a bursary.
#[derive(Debug, Deserialize)]
pub struct CreateBursaryRequest {
    /// Bursary name.
    pub name: String,
    /// Amount deducted per associated student.
    pub amount: Decimal,
    /// Students the bursary applies to.
    pub student_ids: Vec<Uuid>,
}

fn validate_amount(amount: Decimal) -> Result<(), axum::response::Response> {
    if amount <= Decimal::ZERO {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": "Amount must be positive"
            })),
        )
            .into_response());
    }
    Ok(())
}

/// POST `/billings` - Record a charge against a student.
async fn create_billing(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBillingRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate_amount(payload.amount) {
        return response;
    }

    let billing = Billing {
        id: BillingId::new(),
        student_id: StudentId::from_uuid(payload.student_id),
        amount: payload.amount,
        description: payload.description,
        date: payload.date,
    };

    match state.store.add_billing(billing.clone()) {
        Ok(()) => {
            record_audit(
                &state,
                &auth,
                "Billing Created",
                format!("{} for student {}", billing.amount, billing.student_id),
            );
            (StatusCode::CREATED, Json(json!({ "billing": billing }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create billing");
            map_store_error(&e)
        }
    }
}

/// DELETE `/billings/{id}` - Manual correction; always audited.
async fn delete_billing(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.store.delete_billing(BillingId::from_uuid(id)) {
        Ok(removed) => {
            record_audit(
                &state,
                &auth,
                "Billing Deleted",
                format!("{} ({})", removed.description, removed.amount),
            );
            info!(billing_id = %id, "Billing deleted");
            (StatusCode::OK, Json(json!({ "deleted": removed }))).into_response()
        }
        Err(e) => {
            error!(error = %e, billing_id = %id, "Failed to delete billing");
            map_store_error(&e)
        }
    }
}

/// POST `/payments` - Record a payment. The raw channel string is
/// classified into a closed method enum here, once.
async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate_amount(payload.amount) {
        return response;
    }

    let payment = Payment {
        id: PaymentId::new(),
        student_id: StudentId::from_uuid(payload.student_id),
        amount: payload.amount,
        method: PaymentMethod::resolve(&payload.method),
        date: payload.date,
        reference: payload.reference,
    };

    match state.store.add_payment(payment.clone()) {
        Ok(()) => {
            record_audit(
                &state,
                &auth,
                "Payment Recorded",
                format!(
                    "{} via {} for student {}",
                    payment.amount, payment.method, payment.student_id
                ),
            );
            (StatusCode::CREATED, Json(json!({ "payment": payment }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to record payment");
            map_store_error(&e)
        }
    }
}

/// DELETE `/payments/{id}` - Manual correction; always audited.
async fn delete_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.store.delete_payment(PaymentId::from_uuid(id)) {
        Ok(removed) => {
            record_audit(
                &state,
                &auth,
                "Payment Deleted",
                format!("{} ref {}", removed.amount, removed.reference),
            );
            (StatusCode::OK, Json(json!({ "deleted": removed }))).into_response()
        }
        Err(e) => {
            error!(error = %e, payment_id = %id, "Failed to delete payment");
            map_store_error(&e)
        }
    }
}

/// POST `/bursaries` - Award a bursary to one or more students.
async fn create_bursary(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBursaryRequest>,
) -> impl IntoResponse {
    if let Err(response) = validate_amount(payload.amount) {
        return response;
    }
    if payload.student_ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "students_required",
                "message": "A bursary must apply to at least one student"
            })),
        )
            .into_response();
    }

    let bursary = Bursary {
        id: BursaryId::new(),
        name: payload.name,
        amount: payload.amount,
        student_ids: payload
            .student_ids
            .into_iter()
            .map(StudentId::from_uuid)
            .collect(),
        awarded_at: chrono::Utc::now(),
    };

    match state.store.add_bursary(bursary.clone()) {
        Ok(()) => {
            record_audit(
                &state,
                &auth,
                "Bursary Awarded",
                format!(
                    "{} at {} to {} student(s)",
                    bursary.name,
                    bursary.amount,
                    bursary.student_ids.len()
                ),
            );
            (StatusCode::CREATED, Json(json!({ "bursary": bursary }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to award bursary");
            map_store_error(&e)
        }
    }
}
