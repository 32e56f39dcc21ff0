//! Route definitions for the `/releases` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::release;
use crate::state::AppState;

/// Routes mounted at `/releases`.
///
/// ```text
/// GET    /                          -> list
/// GET    /search                    -> search
/// GET    /song/{song_id}/cover      -> cover_by_song
/// GET    /{id}                      -> get_by_id
/// PATCH  /{id}                      -> update
/// DELETE /{id}                      -> delete
/// PATCH  /{id}/songs/add            -> add_songs
/// PATCH  /{id}/songs/remove         -> remove_songs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(release::list))
        .route("/search", get(release::search))
        .route("/song/{song_id}/cover", get(release::cover_by_song))
        .route(
            "/{id}",
            get(release::get_by_id)
                .patch(release::update)
                .delete(release::delete),
        )
        .route("/{id}/songs/add", patch(release::add_songs))
        .route("/{id}/songs/remove", patch(release::remove_songs))
}
