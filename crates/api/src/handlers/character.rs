//! Handlers for the `/characters` resource.
//!
//! Reads are public; mutations need a token with the `write` scope.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use citadel_core::catalog::EntityKind;
use citadel_core::error::CoreError;
use citadel_core::types::DbId;
use citadel_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use citadel_db::repositories::{BookRepo, CharacterRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::book::BookResponse;
use crate::middleware::scopes::RequireWrite;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: EntityKind::Character.label(),
        id,
    })
}

/// GET /api/v1/characters
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PaginatedResponse<Character>>> {
    let (limit, offset) = params.window();
    let data = CharacterRepo::list(&state.pool, limit, offset).await?;
    let count = CharacterRepo::count(&state.pool).await?;
    Ok(Json(PaginatedResponse {
        data,
        count,
        limit,
        offset,
    }))
}

/// POST /api/v1/characters
pub async fn create(
    RequireWrite(_client): RequireWrite,
    State(state): State<AppState>,
    Json(input): Json<CreateCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
    let character = CharacterRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Character>> {
    let character = CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(character))
}

/// PUT /api/v1/characters/{id}
pub async fn update(
    RequireWrite(_client): RequireWrite,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCharacter>,
) -> AppResult<Json<Character>> {
    let character = CharacterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(character))
}

/// DELETE /api/v1/characters/{id}
///
/// Family links pointing at the character are cleared, not cascaded.
pub async fn delete(
    RequireWrite(_client): RequireWrite,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CharacterRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/characters/{id}/books
pub async fn books(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<BookResponse>>>> {
    ensure_exists(&state, id).await?;
    let books = BookRepo::list_by_character(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: books.into_iter().map(BookResponse::from).collect(),
    }))
}

/// GET /api/v1/characters/{id}/pov-books
pub async fn pov_books(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<BookResponse>>>> {
    ensure_exists(&state, id).await?;
    let books = BookRepo::list_pov_by_character(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: books.into_iter().map(BookResponse::from).collect(),
    }))
}
