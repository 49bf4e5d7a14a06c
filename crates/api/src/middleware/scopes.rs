//! Scope-based access control extractors.
//!
//! Each extractor wraps [`AuthClient`] and rejects tokens that were not
//! granted the named scope.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use citadel_core::error::CoreError;

use super::auth::AuthClient;
use crate::error::AppError;
use crate::state::AppState;

pub const SCOPE_READ: &str = "read";
pub const SCOPE_WRITE: &str = "write";
pub const SCOPE_ADMIN: &str = "admin";

async fn require_scope(
    parts: &mut Parts,
    state: &AppState,
    scope: &str,
) -> Result<AuthClient, AppError> {
    let client = AuthClient::from_request_parts(parts, state).await?;
    if !client.has_scope(scope) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "The '{scope}' scope is required"
        ))));
    }
    Ok(client)
}

/// Requires the `read` scope. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn list(RequireRead(client): RequireRead) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireRead(pub AuthClient);

impl FromRequestParts<AppState> for RequireRead {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_scope(parts, state, SCOPE_READ).await.map(RequireRead)
    }
}

/// Requires the `write` scope. Rejects with 403 Forbidden otherwise.
pub struct RequireWrite(pub AuthClient);

impl FromRequestParts<AppState> for RequireWrite {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_scope(parts, state, SCOPE_WRITE).await.map(RequireWrite)
    }
}

/// Requires the `admin` scope. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthClient);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        require_scope(parts, state, SCOPE_ADMIN).await.map(RequireAdmin)
    }
}
