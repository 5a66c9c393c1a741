//! Audit log routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthUser, routes::map_store_error};

/// Creates the audit log routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/audit-logs", get(list_entries))
        .route("/audit-logs/export.csv", get(export_csv))
}

/// Query parameters for the audit log listing.
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    /// Case-insensitive substring matched against user, action, and
    /// details; any field matching is sufficient.
    #[serde(default)]
    pub search: String,
}

/// GET `/audit-logs?search=` - Filtered entries, newest first.
async fn list_entries(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<AuditQuery>,
) -> impl IntoResponse {
    match state.store.audit_entries(&query.search) {
        Ok(entries) => (StatusCode::OK, Json(json!({ "entries": entries }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to query audit log");
            map_store_error(&e)
        }
    }
}

/// GET `/audit-logs/export.csv` - Full log as a CSV attachment.
async fn export_csv(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    match state.store.export_audit_csv() {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"audit-logs.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to export audit log");
            map_store_error(&e)
        }
    }
}
