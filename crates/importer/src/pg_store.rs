use async_trait::async_trait;
use citadel_core::catalog::{EntityKind, ManyLink, SingleLink};
use citadel_core::types::{DbId, ExternalId};
use citadel_db::models::book::CreateBook;
use citadel_db::models::character::CreateCharacter;
use citadel_db::models::house::CreateHouse;
use citadel_db::repositories::{BookRepo, CharacterRepo, HouseRepo, LinkRepo};
use citadel_db::DbPool;

use crate::store::{CatalogStore, StoreError};

/// [`CatalogStore`] backed by the PostgreSQL repositories.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: DbPool,
}

impl PgCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn upsert_character(&self, input: &CreateCharacter) -> Result<DbId, StoreError> {
        Ok(CharacterRepo::upsert(&self.pool, input).await?)
    }

    async fn upsert_house(&self, input: &CreateHouse) -> Result<DbId, StoreError> {
        Ok(HouseRepo::upsert(&self.pool, input).await?)
    }

    async fn upsert_book(&self, input: &CreateBook) -> Result<DbId, StoreError> {
        Ok(BookRepo::upsert(&self.pool, input).await?)
    }

    async fn resolve(
        &self,
        kind: EntityKind,
        external_id: ExternalId,
    ) -> Result<Option<DbId>, StoreError> {
        Ok(LinkRepo::resolve(&self.pool, kind, external_id).await?)
    }

    async fn assign(&self, link: SingleLink, owner: DbId, target: DbId) -> Result<(), StoreError> {
        LinkRepo::assign(&self.pool, link, owner, target).await?;
        Ok(())
    }

    async fn add_edge(
        &self,
        link: ManyLink,
        owner: DbId,
        target: DbId,
    ) -> Result<bool, StoreError> {
        Ok(LinkRepo::add_edge(&self.pool, link, owner, target).await?)
    }
}
