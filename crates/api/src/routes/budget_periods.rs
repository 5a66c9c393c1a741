//! Budget period routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::map_store_error, routes::students::record_audit};
use schola_core::budget::PeriodInput;
use schola_shared::types::BudgetPeriodId;

/// Creates the budget period routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budget-periods", get(list_periods))
        .route("/budget-periods", post(create_period))
        .route("/budget-periods/{id}", put(update_period))
}

/// Request body for creating or updating a budget period. Status is
/// derived from the date range; it cannot be supplied.
#[derive(Debug, Deserialize)]
pub struct PeriodRequest {
    /// Period name.
    pub name: String,
    /// First day, inclusive.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
    /// Budget category names.
    #[serde(default)]
    pub budget_categories: Vec<String>,
}

impl From<PeriodRequest> for PeriodInput {
    fn from(request: PeriodRequest) -> Self {
        Self {
            name: request.name,
            start_date: request.start_date,
            end_date: request.end_date,
            budget_categories: request.budget_categories,
        }
    }
}

/// GET `/budget-periods` - Active first, then by start date descending.
async fn list_periods(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    match state.store.budget_periods() {
        Ok(periods) => (StatusCode::OK, Json(json!({ "periods": periods }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list budget periods");
            map_store_error(&e)
        }
    }
}

/// POST `/budget-periods` - Create a period. Overlap is validated inside
/// the same write section as the insert and rejected with 409.
async fn create_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PeriodRequest>,
) -> impl IntoResponse {
    let today = Utc::now().date_naive();

    match state
        .store
        .save_budget_period(payload.into(), None, today)
    {
        Ok(period) => {
            record_audit(
                &state,
                &auth,
                "Budget Period Created",
                format!("{} [{} - {}]", period.name, period.start_date, period.end_date),
            );
            info!(period_id = %period.id, status = %period.status, "Budget period created");
            (StatusCode::CREATED, Json(json!({ "period": period }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create budget period");
            map_store_error(&e)
        }
    }
}

/// PUT `/budget-periods/{id}` - Update a period; the status is derived
/// again from today's date.
async fn update_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PeriodRequest>,
) -> impl IntoResponse {
    let today = Utc::now().date_naive();

    match state.store.save_budget_period(
        payload.into(),
        Some(BudgetPeriodId::from_uuid(id)),
        today,
    ) {
        Ok(period) => {
            record_audit(
                &state,
                &auth,
                "Budget Period Updated",
                format!("{} [{} - {}]", period.name, period.start_date, period.end_date),
            );
            (StatusCode::OK, Json(json!({ "period": period }))).into_response()
        }
        Err(e) => {
            error!(error = %e, period_id = %id, "Failed to update budget period");
            map_store_error(&e)
        }
    }
}
