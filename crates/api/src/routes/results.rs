//! Results entry, posting, and revert routes.

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

use crate::{AppState, middleware::AuthUser, routes::map_store_error, routes::students::record_audit};
use schola_core::results::{MarkingScheme, OverallScoreSystem, ResultPageConfig};
use schola_store::EntrySaveOutcome;
use schola_shared::types::{
    CourseUnitId, PageConfigId, PostHistoryId, ProgrammeId, StudentId,
};

/// Creates the results routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/results/pages", post(create_page))
        .route("/results/{page_id}/entries", post(save_entry))
        .route("/results/{page_id}/save", post(save_page))
        .route("/results/{page_id}/summary", post(save_summary))
        .route("/results/{page_id}/post", post(post_results))
        .route("/results/history", get(list_history))
        .route("/results/history/{history_id}/revert", post(revert_posting))
}

/// Request body for registering a result page.
#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    /// Display name.
    pub name: String,
    /// Level or year of study.
    pub level: String,
    /// Programme the page belongs to.
    pub programme_id: Uuid,
    /// Course units graded on the page.
    pub course_unit_ids: Vec<Uuid>,
    /// Marking scheme: percentage, number, letter.
    #[serde(default)]
    pub marking_scheme: Option<String>,
    /// Optional pass mark under the scheme.
    pub pass_mark: Option<Decimal>,
    /// Overall score system: gpa, average, points, other.
    pub overall_score_system: String,
    /// Previous-semester pages are locked absolutely.
    #[serde(default)]
    pub read_only: bool,
}

/// Request body for saving one mark.
#[derive(Debug, Deserialize)]
pub struct SaveEntryRequest {
    /// Student graded.
    pub student_id: Uuid,
    /// Course unit graded.
    pub course_unit_id: Uuid,
    /// The mark; an empty string deletes the previously-set row.
    pub marks: String,
}

/// Request body for saving the overall score.
#[derive(Debug, Deserialize)]
pub struct SaveSummaryRequest {
    /// Student summarized.
    pub student_id: Uuid,
    /// The overall score; an empty string deletes the summary.
    pub overall_score: String,
}

/// One mark in a whole-page save.
#[derive(Debug, Deserialize)]
pub struct PageEntryInput {
    /// Course unit graded.
    pub course_unit_id: Uuid,
    /// The mark; an empty string deletes the previously-set row.
    pub marks: String,
}

/// Request body for saving a whole page edit session for one student.
#[derive(Debug, Deserialize)]
pub struct SavePageRequest {
    /// Student graded.
    pub student_id: Uuid,
    /// Every course-unit mark in the session.
    pub entries: Vec<PageEntryInput>,
    /// Optional overall score.
    pub overall_score: Option<String>,
}

/// Request body for posting a roster.
#[derive(Debug, Deserialize)]
pub struct PostResultsRequest {
    /// The exact roster being posted; the caller previews this list.
    pub student_ids: Vec<Uuid>,
}

/// POST `/results/pages` - Register a gradable board.
async fn create_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePageRequest>,
) -> impl IntoResponse {
    let marking_scheme = match payload.marking_scheme.as_deref() {
        None => MarkingScheme::default(),
        Some(raw) => match MarkingScheme::parse(raw) {
            Some(scheme) => scheme,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_marking_scheme",
                        "message": "Marking scheme must be one of: percentage, number, letter"
                    })),
                )
                    .into_response();
            }
        },
    };

    let Some(overall_score_system) = OverallScoreSystem::parse(&payload.overall_score_system)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_score_system",
                "message": "Overall score system must be one of: gpa, average, points, other"
            })),
        )
            .into_response();
    };

    let page = ResultPageConfig {
        id: PageConfigId::new(),
        name: payload.name,
        level: payload.level,
        programme_id: ProgrammeId::from_uuid(payload.programme_id),
        course_unit_ids: payload
            .course_unit_ids
            .into_iter()
            .map(CourseUnitId::from_uuid)
            .collect(),
        marking_scheme,
        pass_mark: payload.pass_mark,
        overall_score_system,
        read_only: payload.read_only,
    };

    match state.store.add_page_config(page.clone()) {
        Ok(()) => {
            record_audit(&state, &auth, "Result Page Created", page.name.clone());
            (StatusCode::CREATED, Json(json!({ "page": page }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create result page");
            map_store_error(&e)
        }
    }
}

/// POST `/results/{page_id}/entries` - Upsert or delete one mark.
///
/// Any invalid field rejects the save wholesale; an empty mark deletes
/// the row so a subsequent read returns "not entered".
async fn save_entry(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(page_id): Path<Uuid>,
    Json(payload): Json<SaveEntryRequest>,
) -> impl IntoResponse {
    let outcome = state.store.save_entry(
        PageConfigId::from_uuid(page_id),
        StudentId::from_uuid(payload.student_id),
        CourseUnitId::from_uuid(payload.course_unit_id),
        &payload.marks,
    );

    match outcome {
        Ok(EntrySaveOutcome::Saved(row)) => {
            (StatusCode::OK, Json(json!({ "outcome": "saved", "result": row }))).into_response()
        }
        Ok(EntrySaveOutcome::Deleted) => {
            (StatusCode::OK, Json(json!({ "outcome": "deleted" }))).into_response()
        }
        Ok(EntrySaveOutcome::Unchanged) => {
            (StatusCode::OK, Json(json!({ "outcome": "unchanged" }))).into_response()
        }
        Err(e) => {
            error!(error = %e, page_id = %page_id, "Failed to save entry");
            map_store_error(&e)
        }
    }
}

/// POST `/results/{page_id}/save` - Save all marks and the overall score
/// for one student in one wholesale-validated operation. Any invalid
/// field rejects the entire save with every violation listed.
async fn save_page(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(page_id): Path<Uuid>,
    Json(payload): Json<SavePageRequest>,
) -> impl IntoResponse {
    let entries: Vec<(CourseUnitId, String)> = payload
        .entries
        .into_iter()
        .map(|e| (CourseUnitId::from_uuid(e.course_unit_id), e.marks))
        .collect();

    let outcome = state.store.save_student_page(
        PageConfigId::from_uuid(page_id),
        StudentId::from_uuid(payload.student_id),
        &entries,
        payload.overall_score.as_deref(),
    );

    match outcome {
        Ok(()) => (StatusCode::OK, Json(json!({ "outcome": "saved" }))).into_response(),
        Err(e) => {
            error!(error = %e, page_id = %page_id, "Failed to save page session");
            map_store_error(&e)
        }
    }
}

/// POST `/results/{page_id}/summary` - Upsert or delete the overall score.
async fn save_summary(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(page_id): Path<Uuid>,
    Json(payload): Json<SaveSummaryRequest>,
) -> impl IntoResponse {
    let outcome = state.store.save_overall_score(
        PageConfigId::from_uuid(page_id),
        StudentId::from_uuid(payload.student_id),
        &payload.overall_score,
    );

    match outcome {
        Ok(Some(summary)) => {
            (StatusCode::OK, Json(json!({ "summary": summary }))).into_response()
        }
        Ok(None) => (StatusCode::OK, Json(json!({ "summary": null }))).into_response(),
        Err(e) => {
            error!(error = %e, page_id = %page_id, "Failed to save overall score");
            map_store_error(&e)
        }
    }
}

/// POST `/results/{page_id}/post` - Atomically post the roster's results
/// and append one history entry.
async fn post_results(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(page_id): Path<Uuid>,
    Json(payload): Json<PostResultsRequest>,
) -> impl IntoResponse {
    let student_ids: Vec<StudentId> = payload
        .student_ids
        .into_iter()
        .map(StudentId::from_uuid)
        .collect();

    match state
        .store
        .post_results(PageConfigId::from_uuid(page_id), &student_ids)
    {
        Ok(history) => {
            record_audit(
                &state,
                &auth,
                "Posted Results",
                format!("{} ({} students)", history.page_name, history.count),
            );
            info!(history_id = %history.id, count = history.count, "Results posted");
            (
                StatusCode::CREATED,
                Json(json!({
                    "history_id": history.id,
                    "count": history.count
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, page_id = %page_id, "Failed to post results");
            map_store_error(&e)
        }
    }
}

/// GET `/results/history` - The posting ledger, newest first.
async fn list_history(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    match state.store.post_history() {
        Ok(items) => (StatusCode::OK, Json(json!({ "history": items }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list post history");
            map_store_error(&e)
        }
    }
}

/// POST `/results/history/{history_id}/revert` - Unpost a batch. The
/// history entry is retained afterwards.
async fn revert_posting(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(history_id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .store
        .revert_posting(PostHistoryId::from_uuid(history_id))
    {
        Ok(reverted) => {
            record_audit(
                &state,
                &auth,
                "Reverted Posting",
                format!("history {history_id}, {reverted} rows"),
            );
            (StatusCode::OK, Json(json!({ "reverted": reverted }))).into_response()
        }
        Err(e) => {
            error!(error = %e, history_id = %history_id, "Failed to revert posting");
            map_store_error(&e)
        }
    }
}
