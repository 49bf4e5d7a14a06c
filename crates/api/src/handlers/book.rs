//! Handlers for the `/books` resource.
//!
//! Every book route requires a bearer token: `read` for lookups and the
//! rendered cover, `write` for mutations.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use citadel_core::catalog::EntityKind;
use citadel_core::cover::OUTPUT_CONTENT_TYPE;
use citadel_core::error::CoreError;
use citadel_core::types::DbId;
use citadel_db::models::book::{Book, CreateBook, UpdateBook};
use citadel_db::models::character::Character;
use citadel_db::repositories::{BookRepo, CharacterRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::scopes::{RequireRead, RequireWrite};
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

/// Book payload with a link to its rendered cover.
#[derive(Debug, Serialize)]
pub struct BookResponse {
    #[serde(flatten)]
    pub book: Book,
    pub cover_url: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        let cover_url = format!("/api/v1/books/{}/cover", book.id);
        Self { book, cover_url }
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: EntityKind::Book.label(), id })
}

async fn find_book(state: &AppState, id: DbId) -> AppResult<Book> {
    BookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/books
pub async fn list(
    RequireRead(_client): RequireRead,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PaginatedResponse<BookResponse>>> {
    let (limit, offset) = params.window();
    let books = BookRepo::list(&state.pool, limit, offset).await?;
    let count = BookRepo::count(&state.pool).await?;
    Ok(Json(PaginatedResponse {
        data: books.into_iter().map(BookResponse::from).collect(),
        count,
        limit,
        offset,
    }))
}

/// POST /api/v1/books
pub async fn create(
    RequireWrite(client): RequireWrite,
    State(state): State<AppState>,
    Json(input): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = BookRepo::create(&state.pool, &input).await?;
    tracing::info!(book_id = book.id, client_id = %client.client_id, "Book created");
    Ok((StatusCode::CREATED, Json(book.into())))
}

/// GET /api/v1/books/{id}
pub async fn get_by_id(
    RequireRead(_client): RequireRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<BookResponse>> {
    let book = find_book(&state, id).await?;
    Ok(Json(book.into()))
}

/// PUT /api/v1/books/{id}
pub async fn update(
    RequireWrite(_client): RequireWrite,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBook>,
) -> AppResult<Json<BookResponse>> {
    let book = BookRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(book.into()))
}

/// DELETE /api/v1/books/{id}
pub async fn delete(
    RequireWrite(client): RequireWrite,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if BookRepo::delete(&state.pool, id).await? {
        tracing::info!(book_id = id, client_id = %client.client_id, "Book deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Cover
// ---------------------------------------------------------------------------

/// GET /api/v1/books/{id}/cover
///
/// Renders the stored cover with the title and POV character names drawn on
/// top. Responds 404 when the book has no stored cover and 400 when the
/// stored payload cannot be decoded.
pub async fn cover(
    RequireRead(_client): RequireRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let book = find_book(&state, id).await?;
    let pov_names: Vec<String> = CharacterRepo::list_pov_by_book(&state.pool, id)
        .await?
        .iter()
        .map(Character::display_name)
        .collect();

    let compositor = Arc::clone(&state.compositor);
    let bytes = tokio::task::spawn_blocking(move || {
        compositor.render(book.cover_base64.as_deref(), &book.name, &pov_names)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Cover render task failed: {e}")))??;

    Ok(([(header::CONTENT_TYPE, OUTPUT_CONTENT_TYPE)], bytes))
}

// ---------------------------------------------------------------------------
// Character associations
// ---------------------------------------------------------------------------

/// GET /api/v1/books/{id}/characters
pub async fn characters(
    RequireRead(_client): RequireRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Character>>>> {
    find_book(&state, id).await?;
    let characters = CharacterRepo::list_by_book(&state.pool, id).await?;
    Ok(Json(DataResponse { data: characters }))
}

/// GET /api/v1/books/{id}/pov-characters
pub async fn pov_characters(
    RequireRead(_client): RequireRead,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Character>>>> {
    find_book(&state, id).await?;
    let characters = CharacterRepo::list_pov_by_book(&state.pool, id).await?;
    Ok(Json(DataResponse { data: characters }))
}

/// GET /api/v1/books/pov-characters
///
/// Every character that is a point of view in at least one book.
pub async fn all_pov_characters(
    RequireRead(_client): RequireRead,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Character>>>> {
    let characters = CharacterRepo::list_all_pov(&state.pool).await?;
    Ok(Json(DataResponse { data: characters }))
}
