//! OAuth2 client (application) model and DTOs.

use citadel_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An OAuth2 client row. `secret_hash` is never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OAuthClient {
    pub id: DbId,
    pub client_id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub secret_hash: String,
    /// Space-separated scopes, e.g. `"read write"`.
    pub scope: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OAuthClient {
    /// Whether the client was granted `scope`.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.split_whitespace().any(|s| s == scope)
    }
}

/// DTO for registering a client. The secret arrives pre-hashed.
#[derive(Debug, Clone)]
pub struct CreateOAuthClient {
    pub client_id: String,
    pub name: String,
    pub secret_hash: String,
    pub scope: String,
}
