//! Handlers for the `/artists` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use melodia_db::models::artist::{Artist, CreateArtist, UpdateArtist, UpdateArtistBio};
use melodia_storage::AssetFolder;

use crate::error::AppResult;
use crate::query::SearchParams;
use crate::services::ArtistRegistry;
use crate::state::AppState;
use crate::upload::{require_file, FormInput};

/// POST /api/v1/artists
///
/// JSON, or multipart with an optional `image` file.
pub async fn create(
    State(state): State<AppState>,
    mut form: FormInput<CreateArtist>,
) -> AppResult<(StatusCode, Json<Artist>)> {
    let image = form.take_file("image");
    let mut artist = ArtistRegistry::create(&state.pool, form.data).await?;

    if let Some(upload) = image {
        let image_url = state.assets.store(&upload, AssetFolder::Artists).await?;
        artist =
            ArtistRegistry::update_media(&state.pool, &artist.id, Some(&image_url), None).await?;
    }

    Ok((StatusCode::CREATED, Json(artist)))
}

/// GET /api/v1/artists/search?query=&page=&limit=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Artist>>> {
    let artists = ArtistRegistry::search(&state.pool, &params).await?;
    Ok(Json(artists))
}

/// GET /api/v1/artists/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Artist>> {
    let artist = ArtistRegistry::find_by_id(&state.pool, &id).await?;
    Ok(Json(artist))
}

/// PATCH /api/v1/artists/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateArtist>,
) -> AppResult<Json<Artist>> {
    let artist = ArtistRegistry::update(&state.pool, &id, input).await?;
    Ok(Json(artist))
}

/// PATCH /api/v1/artists/{id}/bio
pub async fn update_bio(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateArtistBio>,
) -> AppResult<Json<Artist>> {
    let artist = ArtistRegistry::update_bio(&state.pool, &id, input).await?;
    Ok(Json(artist))
}

/// PATCH /api/v1/artists/{id}/image
pub async fn update_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Artist>> {
    ArtistRegistry::find_by_id(&state.pool, &id).await?;
    let upload = require_file(multipart, "image").await?;
    let url = state.assets.store(&upload, AssetFolder::Artists).await?;
    let artist = ArtistRegistry::update_media(&state.pool, &id, Some(&url), None).await?;
    Ok(Json(artist))
}

/// PATCH /api/v1/artists/{id}/cover
pub async fn update_cover(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<Artist>> {
    ArtistRegistry::find_by_id(&state.pool, &id).await?;
    let upload = require_file(multipart, "cover").await?;
    let url = state.assets.store(&upload, AssetFolder::Artists).await?;
    let artist = ArtistRegistry::update_media(&state.pool, &id, None, Some(&url)).await?;
    Ok(Json(artist))
}

/// POST /api/v1/artists/{id}/follow
pub async fn follow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Artist>> {
    let artist = ArtistRegistry::increment_followers(&state.pool, &id).await?;
    Ok(Json(artist))
}

/// POST /api/v1/artists/{id}/unfollow
pub async fn unfollow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Artist>> {
    let artist = ArtistRegistry::decrement_followers(&state.pool, &id).await?;
    Ok(Json(artist))
}

/// DELETE /api/v1/artists/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    ArtistRegistry::remove(&state.pool, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
