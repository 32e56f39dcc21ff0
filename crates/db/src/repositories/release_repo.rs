//! Repository for the `releases` table.

use melodia_core::release::ReleaseType;
use melodia_core::types::ReleaseId;
use sqlx::PgPool;

use crate::models::release::{NewRelease, Release, ReleaseChanges};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, artist_id, title, release_type, status, release_date, \
                       scheduled_publish_at, cover_url, genres, song_ids, created_at, updated_at";

/// Canonical listing order: newest release date first, title breaks ties.
const ORDER: &str = "ORDER BY release_date DESC, title ASC";

/// Provides CRUD, song membership, listing, and search for releases.
pub struct ReleaseRepo;

impl ReleaseRepo {
    /// Insert a fully resolved release, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewRelease) -> Result<Release, sqlx::Error> {
        let query = format!(
            "INSERT INTO releases \
                (id, artist_id, title, release_type, status, release_date, \
                 scheduled_publish_at, cover_url, genres, song_ids) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(input.id)
            .bind(&input.artist_id)
            .bind(&input.title)
            .bind(input.release_type.as_str())
            .bind(input.status.as_str())
            .bind(input.release_date)
            .bind(input.scheduled_publish_at)
            .bind(&input.cover_url)
            .bind(&input.genres)
            .bind(&input.song_ids)
            .fetch_one(pool)
            .await
    }

    /// Find a release by id.
    pub async fn find_by_id(pool: &PgPool, id: ReleaseId) -> Result<Option<Release>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE id = $1");
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a release by id, only if it belongs to `artist_id`.
    pub async fn find_for_artist(
        pool: &PgPool,
        artist_id: &str,
        id: ReleaseId,
    ) -> Result<Option<Release>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE id = $1 AND artist_id = $2");
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .bind(artist_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an artist's release by exact title.
    pub async fn find_by_artist_and_title(
        pool: &PgPool,
        artist_id: &str,
        title: &str,
    ) -> Result<Option<Release>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE artist_id = $1 AND title = $2");
        sqlx::query_as::<_, Release>(&query)
            .bind(artist_id)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// All releases in canonical order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Release>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases {ORDER}");
        sqlx::query_as::<_, Release>(&query).fetch_all(pool).await
    }

    /// An artist's releases in canonical order, optionally restricted to one type.
    pub async fn list_by_artist(
        pool: &PgPool,
        artist_id: &str,
        release_type: Option<ReleaseType>,
    ) -> Result<Vec<Release>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM releases \
             WHERE artist_id = $1 AND ($2::text IS NULL OR release_type = $2) \
             {ORDER}"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(artist_id)
            .bind(release_type.map(ReleaseType::as_str))
            .fetch_all(pool)
            .await
    }

    /// The first of an artist's releases in canonical order.
    pub async fn latest_by_artist(
        pool: &PgPool,
        artist_id: &str,
    ) -> Result<Option<Release>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE artist_id = $1 {ORDER} LIMIT 1");
        sqlx::query_as::<_, Release>(&query)
            .bind(artist_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply resolved changes. Only non-`None` fields are written.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: ReleaseId,
        changes: &ReleaseChanges,
    ) -> Result<Option<Release>, sqlx::Error> {
        let query = format!(
            "UPDATE releases SET \
                title = COALESCE($2, title), \
                release_type = COALESCE($3, release_type), \
                status = COALESCE($4, status), \
                release_date = COALESCE($5, release_date), \
                scheduled_publish_at = COALESCE($6, scheduled_publish_at), \
                cover_url = COALESCE($7, cover_url), \
                genres = COALESCE($8, genres), \
                song_ids = COALESCE($9, song_ids) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .bind(&changes.title)
            .bind(changes.release_type.map(|t| t.as_str()))
            .bind(changes.status.map(|s| s.as_str()))
            .bind(changes.release_date)
            .bind(changes.scheduled_publish_at)
            .bind(&changes.cover_url)
            .bind(&changes.genres)
            .bind(&changes.song_ids)
            .fetch_optional(pool)
            .await
    }

    /// Replace the song list.
    pub async fn set_song_ids(
        pool: &PgPool,
        id: ReleaseId,
        song_ids: &[String],
    ) -> Result<Option<Release>, sqlx::Error> {
        let query = format!("UPDATE releases SET song_ids = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Release>(&query)
            .bind(id)
            .bind(song_ids)
            .fetch_optional(pool)
            .await
    }

    /// Delete a release. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: ReleaseId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM releases WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a release only if it belongs to `artist_id`.
    pub async fn delete_for_artist(
        pool: &PgPool,
        artist_id: &str,
        id: ReleaseId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM releases WHERE id = $1 AND artist_id = $2")
            .bind(id)
            .bind(artist_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive match of `pattern` (an `ILIKE` pattern) against the title.
    pub async fn search(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Release>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM releases \
             WHERE title ILIKE $1 \
             {ORDER} \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// The earliest-created release whose song list contains `song_id`.
    pub async fn find_by_song_id(
        pool: &PgPool,
        song_id: &str,
    ) -> Result<Option<Release>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM releases \
             WHERE $1 = ANY(song_ids) \
             ORDER BY created_at ASC, id ASC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Release>(&query)
            .bind(song_id)
            .fetch_optional(pool)
            .await
    }
}
