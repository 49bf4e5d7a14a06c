use axum::routing::post;
use axum::Router;

use crate::handlers::import;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /import                      -> run
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/import", post(import::run))
}
