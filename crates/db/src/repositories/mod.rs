//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod book_repo;
pub mod character_repo;
pub mod house_repo;
pub mod link_repo;
pub mod oauth_client_repo;

pub use book_repo::BookRepo;
pub use character_repo::CharacterRepo;
pub use house_repo::HouseRepo;
pub use link_repo::LinkRepo;
pub use oauth_client_repo::OAuthClientRepo;
