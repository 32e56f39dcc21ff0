//! Release entity model and DTOs.

use melodia_core::release::{ReleaseStatus, ReleaseType};
use melodia_core::types::{ArtistId, CalendarDate, ReleaseId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::artist::ArtistSummary;

/// A row from the `releases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub id: ReleaseId,
    pub artist_id: ArtistId,
    pub title: String,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub release_type: ReleaseType,
    #[sqlx(try_from = "String")]
    pub status: ReleaseStatus,
    pub release_date: CalendarDate,
    pub scheduled_publish_at: Option<Timestamp>,
    pub cover_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub song_ids: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A release paired with its "latest release" flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedRelease {
    #[serde(flatten)]
    pub release: Release,
    pub is_latest: bool,
}

/// A release with a summary of its owning artist.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseDetail {
    #[serde(flatten)]
    pub release: Release,
    pub artist: ArtistSummary,
}

/// Request body for creating a release under an artist.
///
/// `title` and `release_date` default to empty so that missing values are
/// reported together with the other field rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRelease {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub release_type: ReleaseType,
    #[serde(default)]
    pub release_date: String,
    pub status: Option<ReleaseStatus>,
    pub scheduled_publish_at: Option<Timestamp>,
    pub cover_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub song_ids: Option<Vec<String>>,
}

/// Request body for a partial release update. Unsupplied fields are left
/// unchanged; `status` is applied literally.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRelease {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub release_type: Option<ReleaseType>,
    pub release_date: Option<String>,
    pub status: Option<ReleaseStatus>,
    pub scheduled_publish_at: Option<Timestamp>,
    pub cover_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub song_ids: Option<Vec<String>>,
}

/// Request body for the song add/remove endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongIdsInput {
    pub song_ids: Vec<String>,
}

/// Response body for the cover-by-song lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongCover {
    pub cover_url: String,
}

/// A fully resolved release ready for insertion.
#[derive(Debug, Clone)]
pub struct NewRelease {
    pub id: ReleaseId,
    pub artist_id: ArtistId,
    pub title: String,
    pub release_type: ReleaseType,
    pub status: ReleaseStatus,
    pub release_date: CalendarDate,
    pub scheduled_publish_at: Option<Timestamp>,
    pub cover_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub song_ids: Vec<String>,
}

/// Resolved column changes for a release update. `None` keeps the column.
#[derive(Debug, Clone, Default)]
pub struct ReleaseChanges {
    pub title: Option<String>,
    pub release_type: Option<ReleaseType>,
    pub status: Option<ReleaseStatus>,
    pub release_date: Option<CalendarDate>,
    pub scheduled_publish_at: Option<Timestamp>,
    pub cover_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub song_ids: Option<Vec<String>>,
}
