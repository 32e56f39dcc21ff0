//! HTTP-level integration tests for the release endpoints, both nested under
//! an artist and at the top level.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{
    body_json, create_artist, create_release, delete, get, patch_json, post_json, release_body,
    send_multipart, Part,
};
use melodia_storage::{AssetFolder, AssetStore, StorageError, Upload};
use serde_json::json;
use sqlx::PgPool;

fn titles(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Creation and status derivation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_without_status_or_schedule_is_published(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;

    let release = create_release(&pool, "a1", release_body("Vida", "2023-05-12")).await;

    assert_eq!(release["status"], "published");
    assert_eq!(release["type"], "album");
    assert_eq!(release["artistId"], "a1");
    assert_eq!(release["releaseDate"], "2023-05-12");
    assert_eq!(release["songIds"], json!(["s1"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_future_schedule_is_scheduled(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;

    let mut body = release_body("Vida", "2023-05-12");
    body["scheduledPublishAt"] = json!((Utc::now() + Duration::hours(1)).to_rfc3339());
    let release = create_release(&pool, "a1", body).await;

    assert_eq!(release["status"], "scheduled");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_past_schedule_publishes_immediately(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;

    let mut body = release_body("Vida", "2023-05-12");
    body["scheduledPublishAt"] = json!((Utc::now() - Duration::hours(1)).to_rfc3339());
    body["status"] = json!("draft");
    let release = create_release(&pool, "a1", body).await;

    assert_eq!(release["status"], "published");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_explicit_draft_status_is_kept(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;

    let mut body = release_body("Vida", "2023-05-12");
    body["status"] = json!("draft");
    let release = create_release(&pool, "a1", body).await;

    assert_eq!(release["status"], "draft");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_song_ids_are_deduplicated(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;

    let mut body = release_body("Vida", "2023-05-12");
    body["songIds"] = json!(["s1", "s2", "s1"]);
    let release = create_release(&pool, "a1", body).await;

    assert_eq!(release["songIds"], json!(["s1", "s2"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_validation_reports_every_failing_rule(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/artists/a1/releases",
        json!({
            "type": "single",
            "releaseDate": "2023-05-12",
            "genres": [],
            "status": "scheduled"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Release validation failed");
    let details: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d.as_str().unwrap())
        .collect();
    assert!(details.contains(&"Title is required"));
    assert!(details.contains(&"If genres are provided, at least one genre is required"));
    assert!(details.contains(&"Cover image is required"));
    assert!(details.contains(&"At least one song is required"));
    assert!(details.contains(&"Scheduled publish date is required for programmed releases"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_type_is_bad_request(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/artists/a1/releases",
        json!({"title": "Vida", "releaseDate": "2023-05-12"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_for_unknown_artist_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/artists/ghost/releases",
        release_body("Vida", "2023-05-12"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_title_for_artist_conflicts(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    create_artist(&pool, "a2", "Y").await;
    create_release(&pool, "a1", release_body("Vida", "2023-05-12")).await;

    // Another artist may reuse the title.
    create_release(&pool, "a2", release_body("Vida", "2023-05-12")).await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/artists/a1/releases",
        release_body("Vida", "2024-01-01"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "RELEASE_TITLE_CONFLICT");
    assert_eq!(
        json["error"],
        "A release with the title \"Vida\" already exists for this artist"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_multipart_cover_satisfies_requirement(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    let (app, _uploads) = common::build_test_app_with_uploads(pool);

    let response = send_multipart(
        app,
        Method::POST,
        "/api/v1/artists/a1/releases",
        &[
            Part::Text("title", "Vida"),
            Part::Text("type", "EP"),
            Part::Text("releaseDate", "2023-05-12T10:00:00Z"),
            Part::Text("songIds", "s1"),
            Part::Text("songIds", "s2"),
            Part::Text("genres[]", "rock"),
            Part::File("cover", "cover.png", b"png"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["type"], "ep");
    assert_eq!(json["releaseDate"], "2023-05-12");
    assert_eq!(json["songIds"], json!(["s1", "s2"]));
    assert_eq!(json["genres"], json!(["rock"]));
    assert!(json["coverUrl"]
        .as_str()
        .unwrap()
        .starts_with("/uploads/releases/"));
}

/// Counts stored files without writing anything.
#[derive(Default)]
struct CountingStore {
    stored: AtomicUsize,
}

#[async_trait]
impl AssetStore for CountingStore {
    async fn store(&self, upload: &Upload, folder: AssetFolder) -> Result<String, StorageError> {
        self.stored.fetch_add(1, Ordering::SeqCst);
        Ok(format!("/uploads/{folder}/{}", upload.file_name))
    }
}

async fn post_release_with_cover(
    pool: PgPool,
    store: Arc<CountingStore>,
    artist_id: &str,
    title: &str,
) -> StatusCode {
    let uploads = tempfile::TempDir::new().unwrap();
    let app = common::build_test_app_with_store(pool, uploads.path(), store);
    send_multipart(
        app,
        Method::POST,
        &format!("/api/v1/artists/{artist_id}/releases"),
        &[
            Part::Text("title", title),
            Part::Text("type", "single"),
            Part::Text("releaseDate", "2023-05-12"),
            Part::Text("songIds[]", "s1"),
            Part::File("cover", "cover.png", b"png"),
        ],
    )
    .await
    .status()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rejected_create_does_not_store_cover(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    create_release(&pool, "a1", release_body("Vida", "2023-05-12")).await;
    let store = Arc::new(CountingStore::default());

    let status = post_release_with_cover(pool.clone(), store.clone(), "ghost", "New").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let status = post_release_with_cover(pool.clone(), store.clone(), "a1", "Vida").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let status = post_release_with_cover(pool.clone(), store.clone(), "a1", " ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(store.stored.load(Ordering::SeqCst), 0);

    let status = post_release_with_cover(pool, store.clone(), "a1", "New").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(store.stored.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_scoped_lookup_rejects_other_artist(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    create_artist(&pool, "a2", "Y").await;
    let release = create_release(&pool, "a1", release_body("Vida", "2023-05-12")).await;
    let id = release["id"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/artists/a1/releases/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/artists/a2/releases/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        format!("Release with ID {id} not found for artist a2")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_release_includes_artist_summary(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    let release = create_release(&pool, "a1", release_body("Vida", "2023-05-12")).await;
    let id = release["id"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/releases/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Vida");
    assert_eq!(json["artist"]["id"], "a1");
    assert_eq!(json["artist"]["name"], "X");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_release_id_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/releases/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_latest_flag_marks_every_release_on_newest_date(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    create_release(&pool, "a1", release_body("Old", "2020-01-01")).await;
    create_release(&pool, "a1", release_body("B", "2023-05-12")).await;
    create_release(&pool, "a1", release_body("A", "2023-05-12")).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/artists/a1/releases?withLatestFlag=true").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    assert_eq!(titles(&json), ["A", "B", "Old"]);
    assert_eq!(json[0]["isLatest"], true);
    assert_eq!(json[1]["isLatest"], true);
    assert_eq!(json[2]["isLatest"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_type(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    create_release(&pool, "a1", release_body("Album", "2020-01-01")).await;
    let mut single = release_body("Single", "2021-01-01");
    single["type"] = json!("single");
    create_release(&pool, "a1", single).await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/artists/a1/releases").await;
    let json = body_json(response).await;
    assert_eq!(titles(&json), ["Single", "Album"]);
    assert!(json[0].get("isLatest").is_none());

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/artists/a1/releases?type=single").await;
    let json = body_json(response).await;
    assert_eq!(titles(&json), ["Single"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_latest_release_endpoint(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/artists/a1/releases/latest").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.is_null());

    create_release(&pool, "a1", release_body("Old", "2020-01-01")).await;
    create_release(&pool, "a1", release_body("New", "2024-01-01")).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/artists/a1/releases/latest").await;
    assert_eq!(body_json(response).await["title"], "New");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_all_releases(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    create_artist(&pool, "a2", "Y").await;
    create_release(&pool, "a1", release_body("One", "2020-01-01")).await;
    create_release(&pool, "a2", release_body("Two", "2022-01-01")).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/releases").await;
    assert_eq!(titles(&body_json(response).await), ["Two", "One"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_second_page_returns_second_match(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    create_release(&pool, "a1", release_body("Test One", "2024-01-01")).await;
    create_release(&pool, "a1", release_body("Another test", "2022-01-01")).await;
    create_release(&pool, "a1", release_body("Unrelated", "2025-01-01")).await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/releases/search?query=test&limit=1&page=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(titles(&body_json(response).await), ["Another test"]);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/releases/search?query=%20").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_page_beyond_offset_range_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(
        app,
        "/api/v1/releases/search?query=a&page=92233720368547758&limit=100",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Page is out of range");
}

// ---------------------------------------------------------------------------
// Updates and song membership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_published_release_songs_are_frozen(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    let release = create_release(&pool, "a1", release_body("Vida", "2023-05-12")).await;
    let id = release["id"].as_str().unwrap();

    for path in ["songs/add", "songs/remove"] {
        let app = common::build_test_app(pool.clone());
        let response = patch_json(
            app,
            &format!("/api/v1/artists/a1/releases/{id}/{path}"),
            json!({"songIds": ["s1"]}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "RELEASE_PUBLISHED");

        let app = common::build_test_app(pool.clone());
        let response = patch_json(
            app,
            &format!("/api/v1/releases/{id}/{path}"),
            json!({"songIds": ["s1"]}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/releases/{id}"),
        json!({"songIds": ["s9"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "RELEASE_PUBLISHED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_draft_release_songs_add_is_idempotent(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    let mut body = release_body("Vida", "2023-05-12");
    body["status"] = json!("draft");
    let release = create_release(&pool, "a1", body).await;
    let id = release["id"].as_str().unwrap();
    let add = format!("/api/v1/artists/a1/releases/{id}/songs/add");

    for _ in 0..2 {
        let app = common::build_test_app(pool.clone());
        let response = patch_json(app, &add, json!({"songIds": ["song1"]})).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/artists/a1/releases/{id}")).await;
    let json = body_json(response).await;
    assert_eq!(json["songIds"], json!(["s1", "song1"]));

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/releases/{id}/songs/remove"),
        json!({"songIds": ["s1"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["songIds"], json!(["song1"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_title_conflict_excludes_self(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    create_release(&pool, "a1", release_body("Vida", "2023-05-12")).await;
    let other = create_release(&pool, "a1", release_body("Muerte", "2023-05-12")).await;
    let id = other["id"].as_str().unwrap();
    let uri = format!("/api/v1/artists/a1/releases/{id}");

    let app = common::build_test_app(pool.clone());
    let response = patch_json(app, &uri, json!({"title": "Vida"})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &uri,
        json!({"title": "Muerte", "releaseDate": "2024-02-29T23:00:00Z", "status": "draft"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["releaseDate"], "2024-02-29");
    assert_eq!(json["status"], "draft");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_rejects_empty_fields(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    let release = create_release(&pool, "a1", release_body("Vida", "2023-05-12")).await;
    let id = release["id"].as_str().unwrap();

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/releases/{id}"),
        json!({"title": "", "genres": []}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["details"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_release_cover_upload(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    let release = create_release(&pool, "a1", release_body("Vida", "2023-05-12")).await;
    let id = release["id"].as_str().unwrap();
    let (app, _uploads) = common::build_test_app_with_uploads(pool);

    let response = send_multipart(
        app,
        Method::PATCH,
        &format!("/api/v1/artists/a1/releases/{id}/cover"),
        &[Part::File("cover", "new.png", b"png")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["coverUrl"], "u");
    assert!(json["coverUrl"]
        .as_str()
        .unwrap()
        .starts_with("/uploads/releases/"));
}

// ---------------------------------------------------------------------------
// Cover by song
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cover_url_by_song_id(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    create_release(&pool, "a1", release_body("Vida", "2023-05-12")).await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/releases/song/s1/cover").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"coverUrl": "u"}));

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/releases/song/nope/cover").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "No release found containing song with ID nope"
    );
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_release(pool: PgPool) {
    create_artist(&pool, "a1", "X").await;
    create_artist(&pool, "a2", "Y").await;
    let release = create_release(&pool, "a1", release_body("Vida", "2023-05-12")).await;
    let id = release["id"].as_str().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/artists/a2/releases/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/artists/a1/releases/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = delete(app, &format!("/api/v1/releases/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
