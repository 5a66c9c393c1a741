//! Student record and clearance routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser, routes::map_store_error};
use schola_core::audit::AuditEntryInput;
use schola_core::finance::{PhysicalRequirement, Student, StudentOrigin};
use schola_shared::types::{ProgrammeId, StudentId};

/// Creates the student routes (guard middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students))
        .route("/students", post(create_student))
        .route("/students/{id}/financials", get(get_financials))
}

/// Request body for creating a student record.
#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    /// Full name.
    pub name: String,
    /// Pay code shared with the mirror record, if any.
    pub pay_code: Option<String>,
    /// Which subsystem is creating the record: registrar or bursar.
    pub origin: String,
    /// Total fees quoted at enrollment.
    #[serde(default)]
    pub total_fees: Decimal,
    /// Academic programme.
    pub programme_id: Option<Uuid>,
    /// Level or year of study.
    #[serde(default)]
    pub level: String,
    /// Subscribed service ids.
    #[serde(default)]
    pub services: Vec<String>,
    /// Physical requirements brought.
    #[serde(default)]
    pub physical_requirements: Vec<PhysicalRequirement>,
}

/// GET `/students` - Full roster.
async fn list_students(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    match state.store.students() {
        Ok(students) => (StatusCode::OK, Json(json!({ "students": students }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list students");
            map_store_error(&e)
        }
    }
}

/// POST `/students` - Create a student record.
async fn create_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateStudentRequest>,
) -> impl IntoResponse {
    let Some(origin) = StudentOrigin::parse(&payload.origin) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_origin",
                "message": "Origin must be one of: registrar, bursar"
            })),
        )
            .into_response();
    };

    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "name_required",
                "message": "Student name is required"
            })),
        )
            .into_response();
    }

    let student = Student {
        id: StudentId::new(),
        name: payload.name.trim().to_string(),
        pay_code: payload.pay_code,
        origin,
        total_fees: payload.total_fees,
        programme_id: payload.programme_id.map(ProgrammeId::from_uuid),
        level: payload.level,
        services: payload.services,
        physical_requirements: payload.physical_requirements,
    };

    if let Err(e) = state.store.add_student(student.clone()) {
        error!(error = %e, "Failed to create student");
        return map_store_error(&e);
    }

    record_audit(
        &state,
        &auth,
        "Student Created",
        format!("{} ({})", student.name, student.origin),
    );
    info!(student_id = %student.id, origin = %student.origin, "Student created");

    (StatusCode::CREATED, Json(json!({ "student": student }))).into_response()
}

/// GET `/students/{id}/financials` - Computed clearance position.
///
/// A registrar record resolves through its bursar mirror; with no mirror
/// the response carries zeros and status `unset`.
async fn get_financials(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.store.student_financials(StudentId::from_uuid(id)) {
        Ok(financials) => (StatusCode::OK, Json(financials)).into_response(),
        Err(e) => {
            error!(error = %e, student_id = %id, "Failed to compute financials");
            map_store_error(&e)
        }
    }
}

/// Records an administrative action, logging rather than failing the
/// request when the append itself errors.
pub(crate) fn record_audit(state: &AppState, auth: &AuthUser, action: &str, details: String) {
    let input = AuditEntryInput {
        user: auth.user().to_string(),
        action: action.to_string(),
        details,
    };
    if let Err(e) = state.store.record_audit(input) {
        error!(error = %e, action, "Failed to record audit entry");
    }
}
