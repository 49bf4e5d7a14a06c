//! House entity model and DTOs.

use citadel_core::types::{DbId, ExternalId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A house row from the `houses` table plus its associations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct House {
    pub id: DbId,
    pub external_id: ExternalId,
    pub name: String,
    pub region: Option<String>,
    pub coat_of_arms: Option<String>,
    pub words: Option<String>,
    pub founded: Option<String>,
    pub died_out: Option<String>,
    pub titles: Vec<String>,
    pub seats: Vec<String>,
    pub ancestral_weapons: Vec<String>,
    pub current_lord_id: Option<DbId>,
    pub heir_id: Option<DbId>,
    pub founder_id: Option<DbId>,
    pub overlord_id: Option<DbId>,
    /// House ids from `house_cadet_branches` (this house is the parent).
    pub cadet_branches: Vec<DbId>,
    /// Character ids from `house_sworn_members`.
    pub sworn_members: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a house; also the import upsert payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateHouse {
    pub external_id: ExternalId,
    pub name: String,
    pub region: Option<String>,
    pub coat_of_arms: Option<String>,
    pub words: Option<String>,
    pub founded: Option<String>,
    pub died_out: Option<String>,
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub seats: Vec<String>,
    #[serde(default)]
    pub ancestral_weapons: Vec<String>,
}

/// DTO for updating an existing house. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateHouse {
    pub name: Option<String>,
    pub region: Option<String>,
    pub coat_of_arms: Option<String>,
    pub words: Option<String>,
    pub founded: Option<String>,
    pub died_out: Option<String>,
    pub titles: Option<Vec<String>>,
    pub seats: Option<Vec<String>>,
    pub ancestral_weapons: Option<Vec<String>>,
}
