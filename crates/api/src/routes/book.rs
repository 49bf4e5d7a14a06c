use axum::routing::get;
use axum::Router;

use crate::handlers::book;
use crate::state::AppState;

/// Routes mounted at `/books`.
///
/// ```text
/// GET    /                            -> list
/// POST   /                            -> create
/// GET    /pov-characters              -> all_pov_characters
/// GET    /{id}                        -> get_by_id
/// PUT    /{id}                        -> update
/// DELETE /{id}                        -> delete
/// GET    /{id}/cover                  -> cover
/// GET    /{id}/characters             -> characters
/// GET    /{id}/pov-characters         -> pov_characters
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(book::list).post(book::create))
        .route("/pov-characters", get(book::all_pov_characters))
        .route(
            "/{id}",
            get(book::get_by_id).put(book::update).delete(book::delete),
        )
        .route("/{id}/cover", get(book::cover))
        .route("/{id}/characters", get(book::characters))
        .route("/{id}/pov-characters", get(book::pov_characters))
}
