//! Handlers for releases nested under `/artists/{artist_id}/releases`.
//!
//! Lookups here only resolve releases owned by the artist in the path.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use melodia_core::types::ReleaseId;
use melodia_db::models::release::{
    CreateRelease, FlaggedRelease, Release, SongIdsInput, UpdateRelease,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::query::ReleaseListParams;
use crate::services::{ReleaseCatalog, ReleaseScope};
use crate::state::AppState;
use crate::upload::{require_file, FormInput};

/// Body of the discography listing: flagged when `withLatestFlag` is set.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReleaseListing {
    Plain(Vec<Release>),
    Flagged(Vec<FlaggedRelease>),
}

/// GET /api/v1/artists/{id}/releases?type=&withLatestFlag=
pub async fn list(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    Query(params): Query<ReleaseListParams>,
) -> AppResult<Json<ReleaseListing>> {
    let listing = if params.with_latest_flag {
        ReleaseListing::Flagged(
            ReleaseCatalog::list_by_artist_with_latest_flag(&state.pool, &artist_id).await?,
        )
    } else {
        ReleaseListing::Plain(
            ReleaseCatalog::list_by_artist(&state.pool, &artist_id, params.release_type).await?,
        )
    };
    Ok(Json(listing))
}

/// POST /api/v1/artists/{id}/releases
///
/// JSON, or multipart with an optional `cover` file. An uploaded cover
/// replaces any `coverUrl` in the body.
pub async fn create(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    mut form: FormInput<CreateRelease>,
) -> AppResult<(StatusCode, Json<Release>)> {
    let cover = form.take_file("cover");
    let release = ReleaseCatalog::create(
        &state.pool,
        state.assets.as_ref(),
        &artist_id,
        form.data,
        cover.as_ref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(release)))
}

/// GET /api/v1/artists/{id}/releases/latest
pub async fn latest(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
) -> AppResult<Json<Option<Release>>> {
    let release = ReleaseCatalog::find_latest_by_artist(&state.pool, &artist_id).await?;
    Ok(Json(release))
}

/// GET /api/v1/artists/{artist_id}/releases/{release_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path((artist_id, release_id)): Path<(String, ReleaseId)>,
) -> AppResult<Json<Release>> {
    let release =
        ReleaseCatalog::find(&state.pool, ReleaseScope::Artist(&artist_id), release_id).await?;
    Ok(Json(release))
}

/// PATCH /api/v1/artists/{artist_id}/releases/{release_id}
pub async fn update(
    State(state): State<AppState>,
    Path((artist_id, release_id)): Path<(String, ReleaseId)>,
    Json(input): Json<UpdateRelease>,
) -> AppResult<Json<Release>> {
    let release = ReleaseCatalog::update(
        &state.pool,
        ReleaseScope::Artist(&artist_id),
        release_id,
        input,
    )
    .await?;
    Ok(Json(release))
}

/// PATCH /api/v1/artists/{artist_id}/releases/{release_id}/cover
pub async fn update_cover(
    State(state): State<AppState>,
    Path((artist_id, release_id)): Path<(String, ReleaseId)>,
    multipart: Multipart,
) -> AppResult<Json<Release>> {
    let upload = require_file(multipart, "cover").await?;
    let release = ReleaseCatalog::update_cover(
        &state.pool,
        state.assets.as_ref(),
        &artist_id,
        release_id,
        &upload,
    )
    .await?;
    Ok(Json(release))
}

/// PATCH /api/v1/artists/{artist_id}/releases/{release_id}/songs/add
pub async fn add_songs(
    State(state): State<AppState>,
    Path((artist_id, release_id)): Path<(String, ReleaseId)>,
    Json(input): Json<SongIdsInput>,
) -> AppResult<Json<Release>> {
    let release = ReleaseCatalog::add_songs(
        &state.pool,
        ReleaseScope::Artist(&artist_id),
        release_id,
        &input.song_ids,
    )
    .await?;
    Ok(Json(release))
}

/// PATCH /api/v1/artists/{artist_id}/releases/{release_id}/songs/remove
pub async fn remove_songs(
    State(state): State<AppState>,
    Path((artist_id, release_id)): Path<(String, ReleaseId)>,
    Json(input): Json<SongIdsInput>,
) -> AppResult<Json<Release>> {
    let release = ReleaseCatalog::remove_songs(
        &state.pool,
        ReleaseScope::Artist(&artist_id),
        release_id,
        &input.song_ids,
    )
    .await?;
    Ok(Json(release))
}

/// DELETE /api/v1/artists/{artist_id}/releases/{release_id}
pub async fn delete(
    State(state): State<AppState>,
    Path((artist_id, release_id)): Path<(String, ReleaseId)>,
) -> AppResult<StatusCode> {
    ReleaseCatalog::remove(&state.pool, ReleaseScope::Artist(&artist_id), release_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
