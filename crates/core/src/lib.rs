//! Domain building blocks shared by every Citadel crate.
//!
//! Nothing in here touches the database or the network:
//!
//! - [`identity`] -- external-id extraction from upstream resource URLs.
//! - [`catalog`] -- entity kinds and the relationship taxonomy.
//! - [`release`] -- release-date normalization and marketplace links.
//! - [`cover`] -- the book cover compositor.
//! - [`pagination`] -- limit/offset clamping for list endpoints.

pub mod catalog;
pub mod cover;
pub mod error;
pub mod identity;
pub mod pagination;
pub mod release;
pub mod types;
