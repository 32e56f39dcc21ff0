//! Repository for the `artists` table.

use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::artist::{Artist, ArtistSummary, CreateArtist, UpdateArtist};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, bio, social_links, image_url, cover_url, followers_count, \
                       created_at, updated_at";

/// Provides CRUD, follower counters, and search for artists.
pub struct ArtistRepo;

impl ArtistRepo {
    /// Insert a new artist under `id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        id: &str,
        input: &CreateArtist,
    ) -> Result<Artist, sqlx::Error> {
        let query = format!(
            "INSERT INTO artists (id, name, bio, social_links) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.bio)
            .bind(input.social_links.as_ref().map(Json))
            .fetch_one(pool)
            .await
    }

    /// Find an artist by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE id = $1");
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an artist by exact name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE name = $1");
        sqlx::query_as::<_, Artist>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Id, name and image of an artist.
    pub async fn find_summary(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<ArtistSummary>, sqlx::Error> {
        sqlx::query_as::<_, ArtistSummary>(
            "SELECT id, name, image_url FROM artists WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Whether an artist with this id exists.
    pub async fn exists(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM artists WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Update an artist. Only non-`None` fields are applied; `social_links`
    /// replaces the whole map when supplied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateArtist,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!(
            "UPDATE artists SET \
                name = COALESCE($2, name), \
                bio = COALESCE($3, bio), \
                social_links = COALESCE($4, social_links) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.bio)
            .bind(input.social_links.as_ref().map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Set the image and/or cover URL. `None` leaves a URL untouched, but the
    /// row is written (and `updated_at` bumped) either way.
    pub async fn update_media(
        pool: &PgPool,
        id: &str,
        image_url: Option<&str>,
        cover_url: Option<&str>,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!(
            "UPDATE artists SET \
                image_url = COALESCE($2, image_url), \
                cover_url = COALESCE($3, cover_url) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .bind(image_url)
            .bind(cover_url)
            .fetch_optional(pool)
            .await
    }

    /// Add one follower.
    pub async fn increment_followers(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!(
            "UPDATE artists SET followers_count = followers_count + 1 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Remove one follower, never going below zero.
    pub async fn decrement_followers(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!(
            "UPDATE artists SET followers_count = GREATEST(followers_count - 1, 0) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an artist (and, by cascade, its releases). Returns `true` if a
    /// row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM artists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive match of `pattern` (an `ILIKE` pattern) against name
    /// or bio.
    ///
    /// Ordered by followers descending, then name ascending.
    pub async fn search(
        pool: &PgPool,
        pattern: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Artist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM artists \
             WHERE name ILIKE $1 OR bio ILIKE $1 \
             ORDER BY followers_count DESC, name ASC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Artist>(&query)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
