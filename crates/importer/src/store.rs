//! The persistence seam the reconciler writes through.

use async_trait::async_trait;
use citadel_core::catalog::{EntityKind, ManyLink, SingleLink};
use citadel_core::types::{DbId, ExternalId};
use citadel_db::models::book::CreateBook;
use citadel_db::models::character::CreateCharacter;
use citadel_db::models::house::CreateHouse;

#[derive(Debug, thiserror::Error)]
#[error("Catalog store error: {0}")]
pub struct StoreError(#[from] pub sqlx::Error);

/// Keyed upserts, external-id lookups and relationship writes.
///
/// Upserts overwrite scalar and list fields and never touch relationships.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn upsert_character(&self, input: &CreateCharacter) -> Result<DbId, StoreError>;

    async fn upsert_house(&self, input: &CreateHouse) -> Result<DbId, StoreError>;

    async fn upsert_book(&self, input: &CreateBook) -> Result<DbId, StoreError>;

    async fn resolve(
        &self,
        kind: EntityKind,
        external_id: ExternalId,
    ) -> Result<Option<DbId>, StoreError>;

    /// Overwrite a single-valued relationship on `owner`.
    async fn assign(&self, link: SingleLink, owner: DbId, target: DbId) -> Result<(), StoreError>;

    /// Add an edge; returns `false` if it was already present.
    async fn add_edge(&self, link: ManyLink, owner: DbId, target: DbId)
        -> Result<bool, StoreError>;
}
