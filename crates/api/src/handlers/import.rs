//! Admin trigger for a catalog import.

use axum::extract::State;
use axum::Json;
use citadel_importer::{import_catalog, ImportReport, ImportSelection};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::scopes::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /admin/import`.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    #[serde(default = "default_kind")]
    pub kind: ImportSelection,
}

fn default_kind() -> ImportSelection {
    ImportSelection::All
}

/// POST /api/v1/admin/import
///
/// Returns the per-kind report once the import finishes, or 409 if another
/// import holds the lock. The run happens on its own task, so a dropped
/// request does not stop it between passes.
pub async fn run(
    RequireAdmin(client): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ImportRequest>,
) -> AppResult<Json<DataResponse<ImportReport>>> {
    let kind = input.kind;
    tracing::info!(client_id = %client.client_id, %kind, "Import requested");

    let pool = state.pool.clone();
    let source = state.source.clone();
    let task = tokio::spawn(async move {
        let result = import_catalog(&pool, source.as_ref(), kind).await;
        match &result {
            Ok(report) => tracing::info!(
                %kind,
                characters = report.characters.upserted,
                houses = report.houses.upserted,
                books = report.books.upserted,
                "Import finished"
            ),
            Err(e) => tracing::warn!(%kind, error = %e, "Import failed"),
        }
        result
    });

    let report = task
        .await
        .map_err(|e| AppError::InternalError(format!("Import task failed: {e}")))??;
    Ok(Json(DataResponse { data: report }))
}
