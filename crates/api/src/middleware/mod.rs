//! Authentication and authorization extractors.
//!
//! - [`auth::AuthClient`] -- Extracts the calling OAuth client from a Bearer token.
//! - [`scopes::RequireRead`] -- Requires the `read` scope.
//! - [`scopes::RequireWrite`] -- Requires the `write` scope.
//! - [`scopes::RequireAdmin`] -- Requires the `admin` scope.

pub mod auth;
pub mod scopes;
