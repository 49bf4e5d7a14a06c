//! Book entity model and DTOs.

use citadel_core::types::{DbId, ExternalId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A book row from the `books` table plus its character associations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub external_id: ExternalId,
    pub name: String,
    pub isbn: Option<String>,
    pub authors: Vec<String>,
    pub number_of_pages: Option<i32>,
    pub publisher: Option<String>,
    pub country: Option<String>,
    pub media_type: Option<String>,
    pub released: Option<Timestamp>,
    /// Base64-encoded cover image bytes, if one was found at import time.
    pub cover_base64: Option<String>,
    pub marketplace_url: Option<String>,
    /// Local ids from `book_characters`.
    pub characters: Vec<DbId>,
    /// Local ids from `book_pov_characters`.
    pub pov_characters: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a book. The importer upserts with the same shape,
/// overwriting every field on conflict.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBook {
    pub external_id: ExternalId,
    pub name: String,
    pub isbn: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub number_of_pages: Option<i32>,
    pub publisher: Option<String>,
    pub country: Option<String>,
    pub media_type: Option<String>,
    pub released: Option<Timestamp>,
    pub cover_base64: Option<String>,
    pub marketplace_url: Option<String>,
}

/// DTO for updating an existing book. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBook {
    pub name: Option<String>,
    pub isbn: Option<String>,
    pub authors: Option<Vec<String>>,
    pub number_of_pages: Option<i32>,
    pub publisher: Option<String>,
    pub country: Option<String>,
    pub media_type: Option<String>,
    pub released: Option<Timestamp>,
    pub cover_base64: Option<String>,
    pub marketplace_url: Option<String>,
}
