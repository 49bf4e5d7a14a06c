pub mod book;
pub mod character;
pub mod health;
pub mod house;
pub mod import;
pub mod oauth;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /books                                   list, create (read / write)
/// /books/pov-characters                    every POV character (read)
/// /books/{id}                              get, update, delete (read / write)
/// /books/{id}/cover                        rendered JPEG cover (read)
/// /books/{id}/characters                   characters in the book (read)
/// /books/{id}/pov-characters               POV characters of the book (read)
///
/// /characters                              list (public), create (write)
/// /characters/{id}                         get (public), update, delete (write)
/// /characters/{id}/books                   books the character appears in
/// /characters/{id}/pov-books               books narrated by the character
///
/// /houses                                  list (public), create (write)
/// /houses/{id}                             get (public), update, delete (write)
/// /houses/{id}/sworn-members               characters sworn to the house
/// /houses/{id}/cadet-branches              cadet branches of the house
/// ```
///
/// Admin routes live in [`admin_routes`] because they run without the request
/// timeout.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/books", book::router())
        .nest("/characters", character::router())
        .nest("/houses", house::router())
}

/// Build the `/api/v1/admin` route tree.
///
/// ```text
/// /import                                  run a catalog import (admin)
/// ```
pub fn admin_routes() -> Router<AppState> {
    import::router()
}
