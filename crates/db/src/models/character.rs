//! Character entity model and DTOs.

use citadel_core::types::{DbId, ExternalId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A character row from the `characters` table plus its associations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub external_id: ExternalId,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub culture: Option<String>,
    pub born: Option<String>,
    pub died: Option<String>,
    pub titles: Vec<String>,
    pub aliases: Vec<String>,
    pub tv_series: Vec<String>,
    pub played_by: Vec<String>,
    pub father_id: Option<DbId>,
    pub mother_id: Option<DbId>,
    pub spouse_id: Option<DbId>,
    /// House ids from `character_allegiances`.
    pub allegiances: Vec<DbId>,
    /// Book ids from `book_characters`.
    pub books: Vec<DbId>,
    /// Book ids from `book_pov_characters`.
    pub pov_books: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Character {
    /// Display name, falling back to the external id for unnamed characters.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Character {}", self.external_id))
    }
}

/// DTO for creating a character; also the import upsert payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCharacter {
    pub external_id: ExternalId,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub culture: Option<String>,
    pub born: Option<String>,
    pub died: Option<String>,
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub tv_series: Vec<String>,
    #[serde(default)]
    pub played_by: Vec<String>,
}

/// DTO for updating an existing character. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCharacter {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub culture: Option<String>,
    pub born: Option<String>,
    pub died: Option<String>,
    pub titles: Option<Vec<String>>,
    pub aliases: Option<Vec<String>>,
    pub tv_series: Option<Vec<String>>,
    pub played_by: Option<Vec<String>>,
}
