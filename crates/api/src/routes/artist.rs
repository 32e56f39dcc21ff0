//! Route definitions for the `/artists` resource, including the
//! artist-scoped release routes.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{artist, artist_release};
use crate::state::AppState;

/// Routes mounted at `/artists`.
///
/// ```text
/// POST   /                                          -> create
/// GET    /search                                    -> search
/// GET    /{id}                                      -> get_by_id
/// PATCH  /{id}                                      -> update
/// DELETE /{id}                                      -> delete
/// PATCH  /{id}/bio                                  -> update_bio
/// PATCH  /{id}/image                                -> update_image
/// PATCH  /{id}/cover                                -> update_cover
/// POST   /{id}/follow                               -> follow
/// POST   /{id}/unfollow                             -> unfollow
///
/// GET    /{id}/releases                             -> list
/// POST   /{id}/releases                             -> create
/// GET    /{id}/releases/latest                      -> latest
/// GET    /{id}/releases/{release_id}                -> get_by_id
/// PATCH  /{id}/releases/{release_id}                -> update
/// DELETE /{id}/releases/{release_id}                -> delete
/// PATCH  /{id}/releases/{release_id}/cover          -> update_cover
/// PATCH  /{id}/releases/{release_id}/songs/add      -> add_songs
/// PATCH  /{id}/releases/{release_id}/songs/remove   -> remove_songs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(artist::create))
        .route("/search", get(artist::search))
        .route(
            "/{id}",
            get(artist::get_by_id)
                .patch(artist::update)
                .delete(artist::delete),
        )
        .route("/{id}/bio", patch(artist::update_bio))
        .route("/{id}/image", patch(artist::update_image))
        .route("/{id}/cover", patch(artist::update_cover))
        .route("/{id}/follow", post(artist::follow))
        .route("/{id}/unfollow", post(artist::unfollow))
        .route(
            "/{id}/releases",
            get(artist_release::list).post(artist_release::create),
        )
        .route("/{id}/releases/latest", get(artist_release::latest))
        .route(
            "/{id}/releases/{release_id}",
            get(artist_release::get_by_id)
                .patch(artist_release::update)
                .delete(artist_release::delete),
        )
        .route(
            "/{id}/releases/{release_id}/cover",
            patch(artist_release::update_cover),
        )
        .route(
            "/{id}/releases/{release_id}/songs/add",
            patch(artist_release::add_songs),
        )
        .route(
            "/{id}/releases/{release_id}/songs/remove",
            patch(artist_release::remove_songs),
        )
}
