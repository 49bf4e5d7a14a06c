//! Repository for the `books` table.

use citadel_core::types::DbId;
use sqlx::PgPool;

use crate::models::book::{Book, CreateBook, UpdateBook};

/// Column list shared across queries. Association ids are aggregated with
/// correlated `ARRAY(...)` subqueries so every read returns a complete row.
const COLUMNS: &str = "b.id, b.external_id, b.name, b.isbn, b.authors, b.number_of_pages, \
     b.publisher, b.country, b.media_type, b.released, b.cover_base64, b.marketplace_url, \
     ARRAY(SELECT bc.character_id FROM book_characters bc \
           WHERE bc.book_id = b.id ORDER BY bc.character_id) AS characters, \
     ARRAY(SELECT bp.character_id FROM book_pov_characters bp \
           WHERE bp.book_id = b.id ORDER BY bp.character_id) AS pov_characters, \
     b.created_at, b.updated_at";

/// Provides CRUD operations for books plus the import upsert.
pub struct BookRepo;

impl BookRepo {
    /// Insert a new book, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateBook) -> Result<Book, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO books (external_id, name, isbn, authors, number_of_pages, publisher, \
                                country, media_type, released, cover_base64, marketplace_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id",
        )
        .bind(input.external_id)
        .bind(&input.name)
        .bind(&input.isbn)
        .bind(&input.authors)
        .bind(input.number_of_pages)
        .bind(&input.publisher)
        .bind(&input.country)
        .bind(&input.media_type)
        .bind(input.released)
        .bind(&input.cover_base64)
        .bind(&input.marketplace_url)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Create or fully overwrite the book keyed by `external_id`.
    ///
    /// Relationship columns and association rows are left untouched.
    pub async fn upsert(pool: &PgPool, input: &CreateBook) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO books (external_id, name, isbn, authors, number_of_pages, publisher, \
                                country, media_type, released, cover_base64, marketplace_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT (external_id) DO UPDATE SET
                name = EXCLUDED.name,
                isbn = EXCLUDED.isbn,
                authors = EXCLUDED.authors,
                number_of_pages = EXCLUDED.number_of_pages,
                publisher = EXCLUDED.publisher,
                country = EXCLUDED.country,
                media_type = EXCLUDED.media_type,
                released = EXCLUDED.released,
                cover_base64 = EXCLUDED.cover_base64,
                marketplace_url = EXCLUDED.marketplace_url
             RETURNING id",
        )
        .bind(input.external_id)
        .bind(&input.name)
        .bind(&input.isbn)
        .bind(&input.authors)
        .bind(input.number_of_pages)
        .bind(&input.publisher)
        .bind(&input.country)
        .bind(&input.media_type)
        .bind(input.released)
        .bind(&input.cover_base64)
        .bind(&input.marketplace_url)
        .fetch_one(pool)
        .await
    }

    /// Find a book by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books b WHERE b.id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List books ordered by id.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books b ORDER BY b.id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Book>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of books.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM books")
            .fetch_one(pool)
            .await
    }

    /// Update a book. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBook,
    ) -> Result<Option<Book>, sqlx::Error> {
        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE books SET
                name = COALESCE($2, name),
                isbn = COALESCE($3, isbn),
                authors = COALESCE($4, authors),
                number_of_pages = COALESCE($5, number_of_pages),
                publisher = COALESCE($6, publisher),
                country = COALESCE($7, country),
                media_type = COALESCE($8, media_type),
                released = COALESCE($9, released),
                cover_base64 = COALESCE($10, cover_base64),
                marketplace_url = COALESCE($11, marketplace_url)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.isbn)
        .bind(&input.authors)
        .bind(input.number_of_pages)
        .bind(&input.publisher)
        .bind(&input.country)
        .bind(&input.media_type)
        .bind(input.released)
        .bind(&input.cover_base64)
        .bind(&input.marketplace_url)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Permanently delete a book. Association rows cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Books the character appears in, ordered by id.
    pub async fn list_by_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM books b
             JOIN book_characters j ON j.book_id = b.id
             WHERE j.character_id = $1
             ORDER BY b.id"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }

    /// Books narrated (in part) by the character, ordered by id.
    pub async fn list_pov_by_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM books b
             JOIN book_pov_characters j ON j.book_id = b.id
             WHERE j.character_id = $1
             ORDER BY b.id"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }
}
