//! Repository for the `houses` table.

use citadel_core::types::DbId;
use sqlx::PgPool;

use crate::models::house::{CreateHouse, House, UpdateHouse};

const COLUMNS: &str = "h.id, h.external_id, h.name, h.region, h.coat_of_arms, h.words, \
     h.founded, h.died_out, h.titles, h.seats, h.ancestral_weapons, \
     h.current_lord_id, h.heir_id, h.founder_id, h.overlord_id, \
     ARRAY(SELECT cb.branch_id FROM house_cadet_branches cb \
           WHERE cb.house_id = h.id ORDER BY cb.branch_id) AS cadet_branches, \
     ARRAY(SELECT sm.character_id FROM house_sworn_members sm \
           WHERE sm.house_id = h.id ORDER BY sm.character_id) AS sworn_members, \
     h.created_at, h.updated_at";

/// Provides CRUD operations for houses plus the import upsert.
pub struct HouseRepo;

impl HouseRepo {
    /// Insert a new house, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateHouse) -> Result<House, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO houses (external_id, name, region, coat_of_arms, words, founded, \
                                 died_out, titles, seats, ancestral_weapons)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id",
        )
        .bind(input.external_id)
        .bind(&input.name)
        .bind(&input.region)
        .bind(&input.coat_of_arms)
        .bind(&input.words)
        .bind(&input.founded)
        .bind(&input.died_out)
        .bind(&input.titles)
        .bind(&input.seats)
        .bind(&input.ancestral_weapons)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Create or fully overwrite the house keyed by `external_id`.
    pub async fn upsert(pool: &PgPool, input: &CreateHouse) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO houses (external_id, name, region, coat_of_arms, words, founded, \
                                 died_out, titles, seats, ancestral_weapons)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (external_id) DO UPDATE SET
                name = EXCLUDED.name,
                region = EXCLUDED.region,
                coat_of_arms = EXCLUDED.coat_of_arms,
                words = EXCLUDED.words,
                founded = EXCLUDED.founded,
                died_out = EXCLUDED.died_out,
                titles = EXCLUDED.titles,
                seats = EXCLUDED.seats,
                ancestral_weapons = EXCLUDED.ancestral_weapons
             RETURNING id",
        )
        .bind(input.external_id)
        .bind(&input.name)
        .bind(&input.region)
        .bind(&input.coat_of_arms)
        .bind(&input.words)
        .bind(&input.founded)
        .bind(&input.died_out)
        .bind(&input.titles)
        .bind(&input.seats)
        .bind(&input.ancestral_weapons)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<House>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM houses h WHERE h.id = $1");
        sqlx::query_as::<_, House>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<House>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM houses h ORDER BY h.id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, House>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM houses")
            .fetch_one(pool)
            .await
    }

    /// Update a house. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateHouse,
    ) -> Result<Option<House>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE houses SET
                name = COALESCE($2, name),
                region = COALESCE($3, region),
                coat_of_arms = COALESCE($4, coat_of_arms),
                words = COALESCE($5, words),
                founded = COALESCE($6, founded),
                died_out = COALESCE($7, died_out),
                titles = COALESCE($8, titles),
                seats = COALESCE($9, seats),
                ancestral_weapons = COALESCE($10, ancestral_weapons)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.region)
        .bind(&input.coat_of_arms)
        .bind(&input.words)
        .bind(&input.founded)
        .bind(&input.died_out)
        .bind(&input.titles)
        .bind(&input.seats)
        .bind(&input.ancestral_weapons)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Permanently delete a house. Overlord references become NULL.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM houses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cadet branches of a house, ordered by id.
    pub async fn list_cadet_branches(
        pool: &PgPool,
        house_id: DbId,
    ) -> Result<Vec<House>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM houses h
             JOIN house_cadet_branches j ON j.branch_id = h.id
             WHERE j.house_id = $1
             ORDER BY h.id"
        );
        sqlx::query_as::<_, House>(&query)
            .bind(house_id)
            .fetch_all(pool)
            .await
    }
}
