//! HTTP client for the upstream collection API and cover host.
//!
//! Collections are paged with `?page=<n>&pageSize=<size>` starting at 1 and
//! end at the first empty page. A page ceiling bounds an upstream that never
//! returns one.

use std::time::Duration;

use async_trait::async_trait;
use citadel_core::catalog::EntityKind;
use citadel_core::release::compact_isbn;
use serde::de::DeserializeOwned;

use crate::config::SourceConfig;
use crate::records::{BookRecord, CharacterRecord, HouseRecord};
use crate::{CatalogSource, SourceError};

/// HTTP implementation of [`CatalogSource`].
pub struct IceAndFireClient {
    client: reqwest::Client,
    config: SourceConfig,
}

impl IceAndFireClient {
    /// Build a client with the configured request timeout.
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetch every page of `kind`'s collection.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<T>, SourceError> {
        let url = format!("{}/{}", self.config.api_base, kind.resource());
        let mut records = Vec::new();

        for page in 1..=self.config.max_pages {
            let response = self
                .client
                .get(&url)
                .query(&[("page", page), ("pageSize", self.config.page_size)])
                .send()
                .await?;
            let batch: Vec<T> = Self::ensure_success(response).await?.json().await?;

            if batch.is_empty() {
                tracing::debug!(kind = %kind, pages = page - 1, total = records.len(), "Collection exhausted");
                return Ok(records);
            }
            records.extend(batch);
        }

        tracing::warn!(
            kind = %kind,
            max_pages = self.config.max_pages,
            total = records.len(),
            "Page ceiling reached before an empty page; collection may be truncated",
        );
        Ok(records)
    }

    /// Cover image URL for an ISBN (hyphens removed).
    pub fn cover_url(&self, isbn: &str) -> String {
        format!("{}/{}-L.jpg", self.config.cover_base, compact_isbn(isbn))
    }

    // ---- private helpers ----

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, SourceError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CatalogSource for IceAndFireClient {
    async fn fetch_books(&self) -> Result<Vec<BookRecord>, SourceError> {
        self.fetch_all(EntityKind::Book).await
    }

    async fn fetch_characters(&self) -> Result<Vec<CharacterRecord>, SourceError> {
        self.fetch_all(EntityKind::Character).await
    }

    async fn fetch_houses(&self) -> Result<Vec<HouseRecord>, SourceError> {
        self.fetch_all(EntityKind::House).await
    }

    async fn fetch_cover(&self, isbn: &str) -> Option<Vec<u8>> {
        let url = self.cover_url(isbn);
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Cover request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(url = %url, status = response.status().as_u16(), "No cover available");
            return None;
        }

        match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Cover body could not be read");
                None
            }
        }
    }
}
