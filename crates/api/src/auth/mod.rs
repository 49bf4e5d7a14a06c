//! Authentication primitives for the OAuth2 client-credentials grant.
//!
//! - [`password`] -- Argon2id client-secret hashing and generation.
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
pub mod password;
