//! Release lifecycle: creation with status derivation, scoped lookups,
//! partial updates, song membership, listings, search and cover lookup.

use chrono::Utc;
use melodia_core::error::CoreError;
use melodia_core::release::{
    dedup_song_ids, derive_status, ensure_songs_mutable, flag_latest, merge_song_ids,
    remove_song_ids, same_song_set, validate_new_release, validate_release_changes,
    NewReleaseFields, ReleaseChangeFields, ReleaseType, SongChange,
};
use melodia_core::search::{contains_pattern, require_query, PageRequest};
use melodia_core::types::ReleaseId;
use melodia_db::models::release::{
    CreateRelease, FlaggedRelease, NewRelease, Release, ReleaseChanges, ReleaseDetail, SongCover,
    UpdateRelease,
};
use melodia_db::repositories::{ArtistRepo, ReleaseRepo};
use melodia_storage::{AssetFolder, AssetStore, Upload};
use sqlx::PgPool;
use uuid::Uuid;

use super::map_unique_violation;
use crate::error::{AppError, AppResult};
use crate::query::SearchParams;

/// Which releases an id may resolve to.
#[derive(Debug, Clone, Copy)]
pub enum ReleaseScope<'a> {
    /// Any release.
    Any,
    /// Only releases owned by this artist.
    Artist(&'a str),
}

impl ReleaseScope<'_> {
    fn not_found(self, id: ReleaseId) -> AppError {
        let core = match self {
            ReleaseScope::Any => CoreError::NotFound {
                entity: "Release",
                id: id.to_string(),
            },
            ReleaseScope::Artist(artist_id) => CoreError::NotFoundForArtist {
                entity: "Release",
                id: id.to_string(),
                artist_id: artist_id.to_string(),
            },
        };
        AppError::Core(core)
    }
}

fn title_conflict(title: &str) -> impl FnOnce(&str) -> Option<CoreError> {
    let title = title.to_string();
    move |constraint| {
        (constraint == "uq_releases_artist_title").then(|| CoreError::ReleaseTitleTaken(title))
    }
}

async fn ensure_artist_exists(pool: &PgPool, artist_id: &str) -> AppResult<()> {
    if ArtistRepo::exists(pool, artist_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Artist",
            id: artist_id.to_string(),
        }))
    }
}

pub struct ReleaseCatalog;

impl ReleaseCatalog {
    /// Create a release under `artist_id`.
    ///
    /// Every failing field rule is reported at once. The stored status is
    /// derived from the requested status and `scheduledPublishAt`; song ids
    /// are de-duplicated. A `cover` upload replaces `coverUrl` and is only
    /// stored once the artist, the fields and the title have been checked.
    pub async fn create(
        pool: &PgPool,
        assets: &dyn AssetStore,
        artist_id: &str,
        mut input: CreateRelease,
        cover: Option<&Upload>,
    ) -> AppResult<Release> {
        let now = Utc::now();
        let release_date = validate_new_release(
            &NewReleaseFields {
                title: &input.title,
                release_date: &input.release_date,
                status: input.status,
                scheduled_publish_at: input.scheduled_publish_at,
                cover_url: input.cover_url.as_deref(),
                has_cover_upload: cover.is_some(),
                genres: input.genres.as_deref(),
                song_ids: input.song_ids.as_deref(),
            },
            now,
        )?;

        ensure_artist_exists(pool, artist_id).await?;

        if ReleaseRepo::find_by_artist_and_title(pool, artist_id, &input.title)
            .await?
            .is_some()
        {
            tracing::debug!(artist_id, title = %input.title, "Rejected duplicate release title");
            return Err(CoreError::ReleaseTitleTaken(input.title).into());
        }

        if let Some(upload) = cover {
            input.cover_url = Some(assets.store(upload, AssetFolder::Releases).await?);
        }

        let status = derive_status(input.status, input.scheduled_publish_at, now);
        let new_release = NewRelease {
            id: Uuid::now_v7(),
            artist_id: artist_id.to_string(),
            title: input.title,
            release_type: input.release_type,
            status,
            release_date,
            scheduled_publish_at: input.scheduled_publish_at,
            cover_url: input.cover_url,
            genres: input.genres,
            song_ids: dedup_song_ids(input.song_ids.unwrap_or_default()),
        };

        let release = ReleaseRepo::create(pool, &new_release)
            .await
            .map_err(|e| map_unique_violation(e, title_conflict(&new_release.title)))?;

        tracing::info!(
            release_id = %release.id,
            artist_id,
            status = %release.status,
            songs = release.song_ids.len(),
            "Release created"
        );
        Ok(release)
    }

    /// Resolve a release within `scope`.
    pub async fn find(pool: &PgPool, scope: ReleaseScope<'_>, id: ReleaseId) -> AppResult<Release> {
        let found = match scope {
            ReleaseScope::Any => ReleaseRepo::find_by_id(pool, id).await?,
            ReleaseScope::Artist(artist_id) => {
                ReleaseRepo::find_for_artist(pool, artist_id, id).await?
            }
        };
        found.ok_or_else(|| scope.not_found(id))
    }

    /// A release together with a summary of its artist.
    pub async fn find_detail(pool: &PgPool, id: ReleaseId) -> AppResult<ReleaseDetail> {
        let release = Self::find(pool, ReleaseScope::Any, id).await?;
        let artist = ArtistRepo::find_summary(pool, &release.artist_id)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!("Release {id} references a missing artist"))
            })?;
        Ok(ReleaseDetail { release, artist })
    }

    /// Shallow-merge the supplied fields.
    ///
    /// Supplied fields must satisfy the same rules as on creation. A changed
    /// title is re-checked against the artist's other releases, and changing
    /// the song set of a published release is refused. `status` is stored as
    /// given.
    pub async fn update(
        pool: &PgPool,
        scope: ReleaseScope<'_>,
        id: ReleaseId,
        input: UpdateRelease,
    ) -> AppResult<Release> {
        let release_date = validate_release_changes(&ReleaseChangeFields {
            title: input.title.as_deref(),
            release_date: input.release_date.as_deref(),
            cover_url: input.cover_url.as_deref(),
            genres: input.genres.as_deref(),
            song_ids: input.song_ids.as_deref(),
        })?;

        let current = Self::find(pool, scope, id).await?;

        if let Some(song_ids) = &input.song_ids {
            if !same_song_set(song_ids, &current.song_ids) {
                ensure_songs_mutable(current.status, SongChange::Replace)?;
            }
        }

        if let Some(title) = input.title.as_deref().filter(|t| *t != current.title) {
            let taken = ReleaseRepo::find_by_artist_and_title(pool, &current.artist_id, title)
                .await?
                .is_some_and(|other| other.id != current.id);
            if taken {
                return Err(CoreError::ReleaseTitleTaken(title.to_string()).into());
            }
        }

        let new_title = input.title.clone().unwrap_or_default();
        let changes = ReleaseChanges {
            title: input.title,
            release_type: input.release_type,
            status: input.status,
            release_date,
            scheduled_publish_at: input.scheduled_publish_at,
            cover_url: input.cover_url,
            genres: input.genres,
            song_ids: input.song_ids.map(dedup_song_ids),
        };

        let release = ReleaseRepo::update(pool, id, &changes)
            .await
            .map_err(|e| map_unique_violation(e, title_conflict(&new_title)))?
            .ok_or_else(|| scope.not_found(id))?;

        tracing::info!(release_id = %release.id, status = %release.status, "Release updated");
        Ok(release)
    }

    /// Store `upload` in the releases folder and make it the release cover.
    pub async fn update_cover(
        pool: &PgPool,
        assets: &dyn AssetStore,
        artist_id: &str,
        id: ReleaseId,
        upload: &Upload,
    ) -> AppResult<Release> {
        Self::find(pool, ReleaseScope::Artist(artist_id), id).await?;
        let cover_url = assets.store(upload, AssetFolder::Releases).await?;
        let input = UpdateRelease {
            cover_url: Some(cover_url),
            ..Default::default()
        };
        Self::update(pool, ReleaseScope::Artist(artist_id), id, input).await
    }

    /// Merge `song_ids` into the release's songs. Refused once published.
    pub async fn add_songs(
        pool: &PgPool,
        scope: ReleaseScope<'_>,
        id: ReleaseId,
        song_ids: &[String],
    ) -> AppResult<Release> {
        let current = Self::find(pool, scope, id).await?;
        ensure_songs_mutable(current.status, SongChange::Add)?;

        let merged = merge_song_ids(&current.song_ids, song_ids);
        let release = ReleaseRepo::set_song_ids(pool, id, &merged)
            .await?
            .ok_or_else(|| scope.not_found(id))?;

        tracing::info!(release_id = %id, songs = release.song_ids.len(), "Songs added to release");
        Ok(release)
    }

    /// Drop `song_ids` from the release's songs. Refused once published.
    pub async fn remove_songs(
        pool: &PgPool,
        scope: ReleaseScope<'_>,
        id: ReleaseId,
        song_ids: &[String],
    ) -> AppResult<Release> {
        let current = Self::find(pool, scope, id).await?;
        ensure_songs_mutable(current.status, SongChange::Remove)?;

        let remaining = remove_song_ids(&current.song_ids, song_ids);
        let release = ReleaseRepo::set_song_ids(pool, id, &remaining)
            .await?
            .ok_or_else(|| scope.not_found(id))?;

        tracing::info!(
            release_id = %id,
            songs = release.song_ids.len(),
            "Songs removed from release"
        );
        Ok(release)
    }

    pub async fn remove(pool: &PgPool, scope: ReleaseScope<'_>, id: ReleaseId) -> AppResult<()> {
        let deleted = match scope {
            ReleaseScope::Any => ReleaseRepo::delete(pool, id).await?,
            ReleaseScope::Artist(artist_id) => {
                ReleaseRepo::delete_for_artist(pool, artist_id, id).await?
            }
        };
        if !deleted {
            return Err(scope.not_found(id));
        }
        tracing::info!(release_id = %id, "Release deleted");
        Ok(())
    }

    pub async fn list_all(pool: &PgPool) -> AppResult<Vec<Release>> {
        Ok(ReleaseRepo::list_all(pool).await?)
    }

    /// An artist's releases, newest first, optionally of one type.
    pub async fn list_by_artist(
        pool: &PgPool,
        artist_id: &str,
        release_type: Option<ReleaseType>,
    ) -> AppResult<Vec<Release>> {
        ensure_artist_exists(pool, artist_id).await?;
        Ok(ReleaseRepo::list_by_artist(pool, artist_id, release_type).await?)
    }

    /// An artist's releases, newest first, each flagged when it shares the
    /// newest release date.
    pub async fn list_by_artist_with_latest_flag(
        pool: &PgPool,
        artist_id: &str,
    ) -> AppResult<Vec<FlaggedRelease>> {
        let releases = Self::list_by_artist(pool, artist_id, None).await?;
        Ok(flag_latest(releases, |r| r.release_date)
            .into_iter()
            .map(|(release, is_latest)| FlaggedRelease { release, is_latest })
            .collect())
    }

    /// The artist's first release in listing order, if any.
    pub async fn find_latest_by_artist(
        pool: &PgPool,
        artist_id: &str,
    ) -> AppResult<Option<Release>> {
        ensure_artist_exists(pool, artist_id).await?;
        Ok(ReleaseRepo::latest_by_artist(pool, artist_id).await?)
    }

    /// Substring search over titles, newest first.
    pub async fn search(pool: &PgPool, params: &SearchParams) -> AppResult<Vec<Release>> {
        let query = require_query(params.query.as_deref())?;
        let page = PageRequest::new(params.page, params.limit)?;
        let releases =
            ReleaseRepo::search(pool, &contains_pattern(query), page.limit, page.offset()).await?;
        Ok(releases)
    }

    /// Cover of the earliest-created release containing `song_id`.
    pub async fn cover_url_by_song_id(pool: &PgPool, song_id: &str) -> AppResult<SongCover> {
        let release = ReleaseRepo::find_by_song_id(pool, song_id)
            .await?
            .ok_or_else(|| CoreError::NoReleaseForSong(song_id.to_string()))?;

        match release.cover_url.filter(|url| !url.trim().is_empty()) {
            Some(cover_url) => Ok(SongCover { cover_url }),
            None => Err(CoreError::CoverMissing(release.id.to_string()).into()),
        }
    }
}
