pub mod artist;
pub mod health;
pub mod release;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /artists                                          create
/// /artists/search                                   search by name or bio
/// /artists/{id}                                     get, update, delete
/// /artists/{id}/bio                                 update bio and social links
/// /artists/{id}/image                               upload image
/// /artists/{id}/cover                               upload cover
/// /artists/{id}/follow                              follow (POST)
/// /artists/{id}/unfollow                            unfollow (POST)
/// /artists/{id}/releases                            list (?type, ?withLatestFlag), create
/// /artists/{id}/releases/latest                     latest release
/// /artists/{id}/releases/{release_id}               get, update, delete
/// /artists/{id}/releases/{release_id}/cover         upload cover
/// /artists/{id}/releases/{release_id}/songs/add     add songs
/// /artists/{id}/releases/{release_id}/songs/remove  remove songs
///
/// /releases                                         list all
/// /releases/search                                  search by title
/// /releases/song/{song_id}/cover                    cover URL of a song's release
/// /releases/{id}                                    get (with artist), update, delete
/// /releases/{id}/songs/add                          add songs
/// /releases/{id}/songs/remove                       remove songs
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/artists", artist::router())
        .nest("/releases", release::router())
}
