//! Handlers for the top-level `/releases` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use melodia_core::types::ReleaseId;
use melodia_db::models::release::{Release, ReleaseDetail, SongCover, SongIdsInput, UpdateRelease};

use crate::error::AppResult;
use crate::query::SearchParams;
use crate::services::{ReleaseCatalog, ReleaseScope};
use crate::state::AppState;

/// GET /api/v1/releases
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Release>>> {
    let releases = ReleaseCatalog::list_all(&state.pool).await?;
    Ok(Json(releases))
}

/// GET /api/v1/releases/search?query=&page=&limit=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Release>>> {
    let releases = ReleaseCatalog::search(&state.pool, &params).await?;
    Ok(Json(releases))
}

/// GET /api/v1/releases/song/{song_id}/cover
pub async fn cover_by_song(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> AppResult<Json<SongCover>> {
    let cover = ReleaseCatalog::cover_url_by_song_id(&state.pool, &song_id).await?;
    Ok(Json(cover))
}

/// GET /api/v1/releases/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<ReleaseId>,
) -> AppResult<Json<ReleaseDetail>> {
    let detail = ReleaseCatalog::find_detail(&state.pool, id).await?;
    Ok(Json(detail))
}

/// PATCH /api/v1/releases/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ReleaseId>,
    Json(input): Json<UpdateRelease>,
) -> AppResult<Json<Release>> {
    let release = ReleaseCatalog::update(&state.pool, ReleaseScope::Any, id, input).await?;
    Ok(Json(release))
}

/// PATCH /api/v1/releases/{id}/songs/add
pub async fn add_songs(
    State(state): State<AppState>,
    Path(id): Path<ReleaseId>,
    Json(input): Json<SongIdsInput>,
) -> AppResult<Json<Release>> {
    let release =
        ReleaseCatalog::add_songs(&state.pool, ReleaseScope::Any, id, &input.song_ids).await?;
    Ok(Json(release))
}

/// PATCH /api/v1/releases/{id}/songs/remove
pub async fn remove_songs(
    State(state): State<AppState>,
    Path(id): Path<ReleaseId>,
    Json(input): Json<SongIdsInput>,
) -> AppResult<Json<Release>> {
    let release =
        ReleaseCatalog::remove_songs(&state.pool, ReleaseScope::Any, id, &input.song_ids).await?;
    Ok(Json(release))
}

/// DELETE /api/v1/releases/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<ReleaseId>) -> AppResult<StatusCode> {
    ReleaseCatalog::remove(&state.pool, ReleaseScope::Any, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
