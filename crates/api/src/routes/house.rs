use axum::routing::get;
use axum::Router;

use crate::handlers::house;
use crate::state::AppState;

/// Routes mounted at `/houses`.
///
/// ```text
/// GET    /                            -> list
/// POST   /                            -> create
/// GET    /{id}                        -> get_by_id
/// PUT    /{id}                        -> update
/// DELETE /{id}                        -> delete
/// GET    /{id}/sworn-members          -> sworn_members
/// GET    /{id}/cadet-branches         -> cadet_branches
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(house::list).post(house::create))
        .route(
            "/{id}",
            get(house::get_by_id).put(house::update).delete(house::delete),
        )
        .route("/{id}/sworn-members", get(house::sworn_members))
        .route("/{id}/cadet-branches", get(house::cadet_branches))
}
