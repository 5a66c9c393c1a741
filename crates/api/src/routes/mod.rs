//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::guard_middleware};
use schola_store::StoreError;

pub mod audit_logs;
pub mod budget_periods;
pub mod finance;
pub mod health;
pub mod results;
pub mod students;

/// Creates the API router: public health plus policy-guarded resources.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(_state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(students::routes())
        .merge(finance::routes())
        .merge(results::routes())
        .merge(budget_periods::routes())
        .merge(audit_logs::routes())
        .layer(middleware::from_fn::<_, (axum::extract::Request,)>(
            guard_middleware,
        ));

    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Maps store errors to HTTP responses with a machine-readable code.
pub(crate) fn map_store_error(err: &StoreError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code().to_lowercase(),
            "message": err.to_string()
        })),
    )
        .into_response()
}
