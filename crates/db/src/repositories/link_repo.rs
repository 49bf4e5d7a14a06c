//! Relationship writes shared by the importer: external-id resolution,
//! single-valued foreign keys, and association-table edges.

use citadel_core::catalog::{EntityKind, ManyLink, SingleLink};
use citadel_core::types::{DbId, ExternalId};
use sqlx::PgPool;

/// Resolves and records relationships between catalog entities.
pub struct LinkRepo;

impl LinkRepo {
    /// Map an upstream id to the local id of an already imported entity.
    pub async fn resolve(
        pool: &PgPool,
        kind: EntityKind,
        external_id: ExternalId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let query = match kind {
            EntityKind::Book => "SELECT id FROM books WHERE external_id = $1",
            EntityKind::Character => "SELECT id FROM characters WHERE external_id = $1",
            EntityKind::House => "SELECT id FROM houses WHERE external_id = $1",
        };
        sqlx::query_scalar(query)
            .bind(external_id)
            .fetch_optional(pool)
            .await
    }

    /// Point `owner`'s single-valued relationship at `target`.
    pub async fn assign(
        pool: &PgPool,
        link: SingleLink,
        owner: DbId,
        target: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = match link {
            SingleLink::Father => "UPDATE characters SET father_id = $2 WHERE id = $1",
            SingleLink::Mother => "UPDATE characters SET mother_id = $2 WHERE id = $1",
            SingleLink::Spouse => "UPDATE characters SET spouse_id = $2 WHERE id = $1",
            SingleLink::CurrentLord => "UPDATE houses SET current_lord_id = $2 WHERE id = $1",
            SingleLink::Heir => "UPDATE houses SET heir_id = $2 WHERE id = $1",
            SingleLink::Founder => "UPDATE houses SET founder_id = $2 WHERE id = $1",
            SingleLink::Overlord => "UPDATE houses SET overlord_id = $2 WHERE id = $1",
        };
        let result = sqlx::query(query)
            .bind(owner)
            .bind(target)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add an `(owner, target)` edge. Returns `false` if it already existed.
    pub async fn add_edge(
        pool: &PgPool,
        link: ManyLink,
        owner: DbId,
        target: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = match link {
            ManyLink::Allegiance => {
                "INSERT INTO character_allegiances (character_id, house_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING"
            }
            ManyLink::BookCharacter => {
                "INSERT INTO book_characters (book_id, character_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING"
            }
            ManyLink::BookPovCharacter => {
                "INSERT INTO book_pov_characters (book_id, character_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING"
            }
            ManyLink::CadetBranch => {
                "INSERT INTO house_cadet_branches (house_id, branch_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING"
            }
            ManyLink::SwornMember => {
                "INSERT INTO house_sworn_members (house_id, character_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING"
            }
        };
        let result = sqlx::query(query)
            .bind(owner)
            .bind(target)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
