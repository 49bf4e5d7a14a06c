//! Catalog import: pulls the upstream snapshot and reconciles it into a store.
//!
//! - [`reconciler`] -- the two-pass upsert/link algorithm and its report.
//! - [`store`] -- the [`CatalogStore`] seam and its error type.
//! - [`pg_store`] -- PostgreSQL-backed store.
//! - [`memory`] -- in-memory store for dry runs and tests.

pub mod error;
pub mod memory;
pub mod pg_store;
pub mod reconciler;
pub mod store;

use citadel_db::{DbPool, ImportLock};
use citadel_source::CatalogSource;

pub use error::ImportError;
pub use memory::MemoryCatalogStore;
pub use pg_store::PgCatalogStore;
pub use reconciler::{ImportReport, ImportSelection, KindReport, Reconciler};
pub use store::{CatalogStore, StoreError};

/// Run an import against the database while holding the import lock.
///
/// Fails with [`ImportError::AlreadyRunning`] if another session holds it.
pub async fn import_catalog(
    pool: &DbPool,
    source: &dyn CatalogSource,
    selection: ImportSelection,
) -> Result<ImportReport, ImportError> {
    let Some(lock) = ImportLock::try_acquire(pool)
        .await
        .map_err(StoreError::from)?
    else {
        return Err(ImportError::AlreadyRunning);
    };

    let store = PgCatalogStore::new(pool.clone());
    let result = Reconciler::new(source, &store).run(selection).await;

    if let Err(e) = lock.release().await {
        tracing::warn!(error = %e, "Failed to release import lock");
    }
    result
}
