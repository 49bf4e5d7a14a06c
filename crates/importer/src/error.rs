use citadel_core::error::CoreError;
use citadel_source::SourceError;

use crate::store::StoreError;

/// Run-level import failure. Work committed before the failure stays.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Malformed upstream data (references, release dates).
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Another import is already running")]
    AlreadyRunning,
}
