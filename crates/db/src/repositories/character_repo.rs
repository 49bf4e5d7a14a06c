//! Repository for the `characters` table.

use citadel_core::types::DbId;
use sqlx::PgPool;

use crate::models::character::{Character, CreateCharacter, UpdateCharacter};

/// Column list shared across queries, with association ids aggregated.
const COLUMNS: &str = "c.id, c.external_id, c.name, c.gender, c.culture, c.born, c.died, \
     c.titles, c.aliases, c.tv_series, c.played_by, c.father_id, c.mother_id, c.spouse_id, \
     ARRAY(SELECT a.house_id FROM character_allegiances a \
           WHERE a.character_id = c.id ORDER BY a.house_id) AS allegiances, \
     ARRAY(SELECT bc.book_id FROM book_characters bc \
           WHERE bc.character_id = c.id ORDER BY bc.book_id) AS books, \
     ARRAY(SELECT bp.book_id FROM book_pov_characters bp \
           WHERE bp.character_id = c.id ORDER BY bp.book_id) AS pov_books, \
     c.created_at, c.updated_at";

/// Provides CRUD operations for characters plus the import upsert.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCharacter) -> Result<Character, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO characters (external_id, name, gender, culture, born, died, \
                                     titles, aliases, tv_series, played_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id",
        )
        .bind(input.external_id)
        .bind(&input.name)
        .bind(&input.gender)
        .bind(&input.culture)
        .bind(&input.born)
        .bind(&input.died)
        .bind(&input.titles)
        .bind(&input.aliases)
        .bind(&input.tv_series)
        .bind(&input.played_by)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Create or fully overwrite the character keyed by `external_id`.
    ///
    /// Family links and allegiances are left untouched.
    pub async fn upsert(pool: &PgPool, input: &CreateCharacter) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO characters (external_id, name, gender, culture, born, died, \
                                     titles, aliases, tv_series, played_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (external_id) DO UPDATE SET
                name = EXCLUDED.name,
                gender = EXCLUDED.gender,
                culture = EXCLUDED.culture,
                born = EXCLUDED.born,
                died = EXCLUDED.died,
                titles = EXCLUDED.titles,
                aliases = EXCLUDED.aliases,
                tv_series = EXCLUDED.tv_series,
                played_by = EXCLUDED.played_by
             RETURNING id",
        )
        .bind(input.external_id)
        .bind(&input.name)
        .bind(&input.gender)
        .bind(&input.culture)
        .bind(&input.born)
        .bind(&input.died)
        .bind(&input.titles)
        .bind(&input.aliases)
        .bind(&input.tv_series)
        .bind(&input.played_by)
        .fetch_one(pool)
        .await
    }

    /// Find a character by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters c WHERE c.id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List characters ordered by id.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM characters c ORDER BY c.id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Character>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of characters.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM characters")
            .fetch_one(pool)
            .await
    }

    /// Update a character. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE characters SET
                name = COALESCE($2, name),
                gender = COALESCE($3, gender),
                culture = COALESCE($4, culture),
                born = COALESCE($5, born),
                died = COALESCE($6, died),
                titles = COALESCE($7, titles),
                aliases = COALESCE($8, aliases),
                tv_series = COALESCE($9, tv_series),
                played_by = COALESCE($10, played_by)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.gender)
        .bind(&input.culture)
        .bind(&input.born)
        .bind(&input.died)
        .bind(&input.titles)
        .bind(&input.aliases)
        .bind(&input.tv_series)
        .bind(&input.played_by)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Permanently delete a character. Family and house references to it
    /// become NULL; association rows cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM characters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Characters appearing in a book, ordered by id.
    pub async fn list_by_book(pool: &PgPool, book_id: DbId) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters c
             JOIN book_characters j ON j.character_id = c.id
             WHERE j.book_id = $1
             ORDER BY c.id"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(book_id)
            .fetch_all(pool)
            .await
    }

    /// Point-of-view characters of a book, ordered by id.
    pub async fn list_pov_by_book(
        pool: &PgPool,
        book_id: DbId,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters c
             JOIN book_pov_characters j ON j.character_id = c.id
             WHERE j.book_id = $1
             ORDER BY c.id"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(book_id)
            .fetch_all(pool)
            .await
    }

    /// Every character that is a point of view in at least one book.
    pub async fn list_all_pov(pool: &PgPool) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters c
             WHERE EXISTS (SELECT 1 FROM book_pov_characters j WHERE j.character_id = c.id)
             ORDER BY c.id"
        );
        sqlx::query_as::<_, Character>(&query).fetch_all(pool).await
    }

    /// Characters sworn to a house, ordered by id.
    pub async fn list_sworn_to_house(
        pool: &PgPool,
        house_id: DbId,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters c
             JOIN house_sworn_members j ON j.character_id = c.id
             WHERE j.house_id = $1
             ORDER BY c.id"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(house_id)
            .fetch_all(pool)
            .await
    }
}
