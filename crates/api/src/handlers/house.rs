//! Handlers for the `/houses` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use citadel_core::catalog::EntityKind;
use citadel_core::error::CoreError;
use citadel_core::types::DbId;
use citadel_db::models::character::Character;
use citadel_db::models::house::{CreateHouse, House, UpdateHouse};
use citadel_db::repositories::{CharacterRepo, HouseRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::scopes::RequireWrite;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: EntityKind::House.label(), id })
}

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    HouseRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| not_found(id))
}

/// GET /api/v1/houses
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PaginatedResponse<House>>> {
    let (limit, offset) = params.window();
    let data = HouseRepo::list(&state.pool, limit, offset).await?;
    let count = HouseRepo::count(&state.pool).await?;
    Ok(Json(PaginatedResponse {
        data,
        count,
        limit,
        offset,
    }))
}

/// POST /api/v1/houses
pub async fn create(
    RequireWrite(_client): RequireWrite,
    State(state): State<AppState>,
    Json(input): Json<CreateHouse>,
) -> AppResult<(StatusCode, Json<House>)> {
    let house = HouseRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(house)))
}

/// GET /api/v1/houses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<House>> {
    let house = HouseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(house))
}

/// PUT /api/v1/houses/{id}
pub async fn update(
    RequireWrite(_client): RequireWrite,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHouse>,
) -> AppResult<Json<House>> {
    let house = HouseRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(house))
}

/// DELETE /api/v1/houses/{id}
pub async fn delete(
    RequireWrite(_client): RequireWrite,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if HouseRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/houses/{id}/sworn-members
pub async fn sworn_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Character>>>> {
    ensure_exists(&state, id).await?;
    let members = CharacterRepo::list_sworn_to_house(&state.pool, id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// GET /api/v1/houses/{id}/cadet-branches
pub async fn cadet_branches(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<House>>>> {
    ensure_exists(&state, id).await?;
    let branches = HouseRepo::list_cadet_branches(&state.pool, id).await?;
    Ok(Json(DataResponse { data: branches }))
}
