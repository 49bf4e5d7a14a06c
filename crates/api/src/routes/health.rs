use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct Health {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl Health {
    fn from_db(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let probe = citadel_db::health_check(&state.pool).await;
    if let Err(e) = &probe {
        tracing::warn!(error = %e, "Database health check failed");
    }
    Json(Health::from_db(probe.is_ok()))
}

/// `GET /health`, mounted at the root.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
