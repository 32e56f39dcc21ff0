//! Artist entity model and DTOs.

use std::collections::BTreeMap;

use melodia_core::types::{ArtistId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `artists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    pub bio: Option<String>,
    /// Free-form `{ "instagram": "https://..." }` map.
    pub social_links: Option<serde_json::Value>,
    pub image_url: Option<String>,
    pub cover_url: Option<String>,
    pub followers_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The slice of an artist embedded in release detail responses.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSummary {
    pub id: ArtistId,
    pub name: String,
    pub image_url: Option<String>,
}

/// DTO for creating a new artist. `id` is generated when omitted.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArtist {
    #[validate(length(max = 255, message = "Artist ID must be at most 255 characters"))]
    pub id: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    pub bio: Option<String>,
    pub social_links: Option<BTreeMap<String, String>>,
}

/// DTO for updating an artist. All fields optional; the id is immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtist {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    pub bio: Option<String>,
    pub social_links: Option<BTreeMap<String, String>>,
}

/// DTO for the bio endpoint: bio text and social links only.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtistBio {
    pub bio: Option<String>,
    pub social_links: Option<BTreeMap<String, String>>,
}

impl From<UpdateArtistBio> for UpdateArtist {
    fn from(input: UpdateArtistBio) -> Self {
        Self {
            name: None,
            bio: input.bio,
            social_links: input.social_links,
        }
    }
}
