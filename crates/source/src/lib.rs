//! Client for the upstream "Ice and Fire" catalog.
//!
//! - [`config`] -- base URLs, page size and ceiling, timeout.
//! - [`records`] -- camelCase DTOs for books, characters and houses.
//! - [`client`] -- [`IceAndFireClient`], the HTTP implementation of [`CatalogSource`].

pub mod client;
pub mod config;
pub mod records;

use async_trait::async_trait;

pub use client::IceAndFireClient;
pub use config::SourceConfig;
pub use records::{BookRecord, CharacterRecord, HouseRecord, RefList};

/// Errors from the upstream catalog.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transport failure or a body that is not the expected JSON.
    #[error("Catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("Catalog returned {status} for {url}")]
    Status { status: u16, url: String },
}

/// Anything that can hand the importer a full snapshot of the catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_books(&self) -> Result<Vec<BookRecord>, SourceError>;

    async fn fetch_characters(&self) -> Result<Vec<CharacterRecord>, SourceError>;

    async fn fetch_houses(&self) -> Result<Vec<HouseRecord>, SourceError>;

    /// Raw cover image bytes for an ISBN. Every failure is reported as `None`.
    async fn fetch_cover(&self, isbn: &str) -> Option<Vec<u8>>;
}
