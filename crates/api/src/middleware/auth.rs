//! Authorization guard for protected routes.
//!
//! Identity arrives from the external auth/profile provider as trusted
//! headers set by the upstream proxy; this middleware only enforces the
//! declarative role policy.

use axum::{
    Json,
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::policy::{Role, is_allowed};
use schola_shared::AppError;

/// Header carrying the authenticated username.
pub const USER_HEADER: &str = "x-schola-user";
/// Header carrying the authenticated role.
pub const ROLE_HEADER: &str = "x-schola-role";

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Username from the auth provider.
    pub user: String,
    /// Portal role.
    pub role: Role,
}

/// Guard middleware that authenticates the identity headers and enforces
/// the role policy against the request path.
///
/// 1. Reads the user and role headers
/// 2. Rejects with 401 when either is missing or the role is unknown
/// 3. Rejects with 403 when the policy denies the path for the role
/// 4. Stores the identity in request extensions for handlers
pub async fn guard_middleware(mut request: Request, next: Next) -> Response {
    let (user, raw_role) = {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        (header(USER_HEADER), header(ROLE_HEADER))
    };

    let (Some(user), Some(raw_role)) = (user, raw_role) else {
        return reject(&AppError::Unauthorized(
            "identity headers are required".to_string(),
        ));
    };

    let Some(role) = Role::parse(&raw_role) else {
        return reject(&AppError::Unauthorized("unrecognized role".to_string()));
    };

    let path = request.uri().path();
    let relative = path.strip_prefix("/api/v1").unwrap_or(path);
    if !is_allowed(role, relative) {
        return reject(&AppError::Forbidden(format!(
            "role {role} may not access this resource"
        )));
    }

    let identity = Identity {
        user: user.to_string(),
        role,
    };
    request.extensions_mut().insert(identity);
    next.run(request).await
}

/// Renders an application error as a JSON rejection.
fn reject(err: &AppError) -> Response {
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

/// Extractor for the authenticated identity.
///
/// Use this in handlers to get the caller set by the guard:
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let user = auth.user();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    /// Returns the username.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.0.user
    }

    /// Returns the role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.0.role
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}
