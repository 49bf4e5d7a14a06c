//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row,
//!   with related local ids aggregated from the association tables
//! - A `Deserialize` create DTO, also used as the import upsert payload
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod book;
pub mod character;
pub mod house;
pub mod oauth_client;
