pub mod book;
pub mod character;
pub mod house;
pub mod import;
pub mod oauth;
