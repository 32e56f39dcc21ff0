//! Artist identity, metadata, media and follower counters.

use melodia_core::artist::{effective_media_url, resolve_artist_id, validate_social_links};
use melodia_core::error::CoreError;
use melodia_core::search::{contains_pattern, require_query, PageRequest};
use melodia_db::models::artist::{Artist, CreateArtist, UpdateArtist, UpdateArtistBio};
use melodia_db::repositories::ArtistRepo;
use sqlx::PgPool;
use validator::Validate;

use super::map_unique_violation;
use crate::error::{AppError, AppResult};
use crate::query::SearchParams;

pub struct ArtistRegistry;

fn not_found(id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Artist",
        id: id.to_string(),
    })
}

fn conflict(id: &str, name: &str) -> impl FnOnce(&str) -> Option<CoreError> {
    let id = id.to_string();
    let name = name.to_string();
    move |constraint| match constraint {
        "artists_pkey" => Some(CoreError::ArtistIdTaken(id)),
        "uq_artists_name" => Some(CoreError::ArtistNameTaken(name)),
        _ => None,
    }
}

impl ArtistRegistry {
    /// Create an artist. The id is generated when the caller omits it.
    ///
    /// Id collisions are checked before name collisions.
    pub async fn create(pool: &PgPool, mut input: CreateArtist) -> AppResult<Artist> {
        input.name = input.name.trim().to_string();
        input.validate().map_err(CoreError::from)?;
        if let Some(links) = &input.social_links {
            validate_social_links(links)?;
        }

        let id = resolve_artist_id(input.id.as_deref());

        if ArtistRepo::exists(pool, &id).await? {
            tracing::debug!(artist_id = %id, "Rejected duplicate artist id");
            return Err(CoreError::ArtistIdTaken(id).into());
        }
        if ArtistRepo::find_by_name(pool, &input.name).await?.is_some() {
            tracing::debug!(name = %input.name, "Rejected duplicate artist name");
            return Err(CoreError::ArtistNameTaken(input.name).into());
        }

        let artist = ArtistRepo::create(pool, &id, &input)
            .await
            .map_err(|e| map_unique_violation(e, conflict(&id, &input.name)))?;

        tracing::info!(artist_id = %artist.id, name = %artist.name, "Artist created");
        Ok(artist)
    }

    pub async fn find_by_id(pool: &PgPool, id: &str) -> AppResult<Artist> {
        ArtistRepo::find_by_id(pool, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Shallow-merge the supplied fields. A changed name is re-checked for
    /// uniqueness.
    pub async fn update(pool: &PgPool, id: &str, mut input: UpdateArtist) -> AppResult<Artist> {
        if let Some(name) = input.name.as_mut() {
            *name = name.trim().to_string();
        }
        input.validate().map_err(CoreError::from)?;
        if let Some(links) = &input.social_links {
            validate_social_links(links)?;
        }

        let current = Self::find_by_id(pool, id).await?;

        if let Some(name) = input.name.as_deref().filter(|n| *n != current.name) {
            let taken = ArtistRepo::find_by_name(pool, name)
                .await?
                .is_some_and(|other| other.id != current.id);
            if taken {
                return Err(CoreError::ArtistNameTaken(name.to_string()).into());
            }
        }

        let new_name = input.name.clone().unwrap_or_default();
        let artist = ArtistRepo::update(pool, id, &input)
            .await
            .map_err(|e| map_unique_violation(e, conflict(id, &new_name)))?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(artist_id = %artist.id, "Artist updated");
        Ok(artist)
    }

    /// Update only the bio and social links.
    pub async fn update_bio(pool: &PgPool, id: &str, input: UpdateArtistBio) -> AppResult<Artist> {
        Self::update(pool, id, input.into()).await
    }

    /// Set the image and/or cover URL. Blank or missing URLs leave the stored
    /// value alone; the row is written either way.
    pub async fn update_media(
        pool: &PgPool,
        id: &str,
        image_url: Option<&str>,
        cover_url: Option<&str>,
    ) -> AppResult<Artist> {
        let artist = ArtistRepo::update_media(
            pool,
            id,
            effective_media_url(image_url),
            effective_media_url(cover_url),
        )
        .await?
        .ok_or_else(|| not_found(id))?;

        tracing::info!(
            artist_id = %artist.id,
            image_url = ?artist.image_url,
            cover_url = ?artist.cover_url,
            "Artist media updated"
        );
        Ok(artist)
    }

    pub async fn increment_followers(pool: &PgPool, id: &str) -> AppResult<Artist> {
        let artist = ArtistRepo::increment_followers(pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(artist_id = %id, followers = artist.followers_count, "Artist followed");
        Ok(artist)
    }

    /// Decrement followers; the count never drops below zero.
    pub async fn decrement_followers(pool: &PgPool, id: &str) -> AppResult<Artist> {
        let artist = ArtistRepo::decrement_followers(pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(artist_id = %id, followers = artist.followers_count, "Artist unfollowed");
        Ok(artist)
    }

    /// Delete an artist together with its releases.
    pub async fn remove(pool: &PgPool, id: &str) -> AppResult<()> {
        if !ArtistRepo::delete(pool, id).await? {
            return Err(not_found(id));
        }
        tracing::info!(artist_id = %id, "Artist deleted");
        Ok(())
    }

    /// Substring search over name and bio, most-followed first.
    pub async fn search(pool: &PgPool, params: &SearchParams) -> AppResult<Vec<Artist>> {
        let query = require_query(params.query.as_deref())?;
        let page = PageRequest::new(params.page, params.limit)?;
        let artists =
            ArtistRepo::search(pool, &contains_pattern(query), page.limit, page.offset()).await?;
        Ok(artists)
    }
}
