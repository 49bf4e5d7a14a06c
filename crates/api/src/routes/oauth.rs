use axum::routing::post;
use axum::Router;

use crate::handlers::oauth;
use crate::state::AppState;

/// Token endpoint, mounted at the root alongside `/health`.
///
/// ```text
/// POST   /o/token                     -> token
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/o/token", post(oauth::token))
}
