//! Artist rules: id generation, social links, media URL selection.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::types::ArtistId;

/// Generate an artist id for callers that do not assign one.
pub fn generate_artist_id() -> ArtistId {
    uuid::Uuid::now_v7().to_string()
}

/// Pick the id to create an artist with: the caller's, trimmed, or a fresh one.
pub fn resolve_artist_id(requested: Option<&str>) -> ArtistId {
    match requested.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => generate_artist_id(),
    }
}

/// Social link keys are free-form (`instagram`, `website`, ...); values must
/// be non-empty.
pub fn validate_social_links(links: &BTreeMap<String, String>) -> Result<(), CoreError> {
    let errors: Vec<String> = links
        .iter()
        .filter(|(_, url)| url.trim().is_empty())
        .map(|(key, _)| format!("Social link '{key}' must not be empty"))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::InvalidFields {
            message: "Artist validation failed".to_string(),
            errors,
        })
    }
}

/// A media URL only counts when it is present and non-blank; anything else
/// leaves the stored URL untouched.
pub fn effective_media_url(url: Option<&str>) -> Option<&str> {
    url.map(str::trim).filter(|u| !u.is_empty())
}
