//! Release lifecycle rules.
//!
//! Covers field validation for new and updated releases, status derivation
//! from the requested status and publish schedule, song-membership rules
//! gated by status, and the "latest release" flag. Everything here is pure;
//! the caller supplies `now` so the rules stay deterministic under test.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{CalendarDate, Timestamp};

/// Message attached to every aggregated release validation failure.
pub const VALIDATION_MESSAGE: &str = "Release validation failed";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Kind of musical publication.
///
/// Serialized lowercase; parsing is case-insensitive (`"ALBUM"` is accepted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ReleaseType {
    Album,
    Single,
    Ep,
}

impl ReleaseType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Album => "album",
            Self::Single => "single",
            Self::Ep => "ep",
        }
    }
}

impl FromStr for ReleaseType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "album" => Ok(Self::Album),
            "single" => Ok(Self::Single),
            "ep" => Ok(Self::Ep),
            other => Err(CoreError::Validation(format!(
                "Unknown release type '{other}'. Must be one of: album, single, ep"
            ))),
        }
    }
}

impl TryFrom<String> for ReleaseType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication status of a release.
///
/// ```text
/// draft ──> scheduled ──> published
/// ```
///
/// Only draft and scheduled releases accept song-membership changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ReleaseStatus {
    Draft,
    Scheduled,
    Published,
}

impl ReleaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Published => "published",
        }
    }

    /// Whether songs may be added to or removed from a release in this status.
    pub fn allows_song_changes(self) -> bool {
        matches!(self, Self::Draft | Self::Scheduled)
    }
}

impl FromStr for ReleaseStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "scheduled" => Ok(Self::Scheduled),
            "published" => Ok(Self::Published),
            other => Err(CoreError::Validation(format!(
                "Unknown release status '{other}'. Must be one of: draft, scheduled, published"
            ))),
        }
    }
}

impl TryFrom<String> for ReleaseStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Normalize a release date input to a calendar date.
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp (converted to its UTC date),
/// or a zone-less `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp.
pub fn parse_release_date(input: &str) -> Result<CalendarDate, String> {
    let input = input.trim();
    if let Ok(date) = CalendarDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&chrono::Utc).date_naive());
    }
    if let Ok(ts) = chrono::NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }
    Err(format!(
        "Release date '{input}' must be an ISO date (YYYY-MM-DD) or timestamp"
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// The caller-supplied fields of a new release that carry rules.
#[derive(Debug, Clone, Copy)]
pub struct NewReleaseFields<'a> {
    pub title: &'a str,
    pub release_date: &'a str,
    pub status: Option<ReleaseStatus>,
    pub scheduled_publish_at: Option<Timestamp>,
    pub cover_url: Option<&'a str>,
    /// A cover file accompanies the request and satisfies the cover rule.
    pub has_cover_upload: bool,
    pub genres: Option<&'a [String]>,
    pub song_ids: Option<&'a [String]>,
}

/// Validate a new release, collecting every failing rule.
///
/// Returns the normalized release date on success.
pub fn validate_new_release(
    fields: &NewReleaseFields<'_>,
    now: Timestamp,
) -> Result<CalendarDate, CoreError> {
    let mut errors = Vec::new();

    if fields.title.trim().is_empty() {
        errors.push("Title is required".to_string());
    }

    if matches!(fields.genres, Some(genres) if genres.is_empty()) {
        errors.push("If genres are provided, at least one genre is required".to_string());
    }

    let has_cover_url = matches!(fields.cover_url, Some(url) if !url.trim().is_empty());
    if !has_cover_url && !fields.has_cover_upload {
        errors.push("Cover image is required".to_string());
    }

    if !matches!(fields.song_ids, Some(ids) if !ids.is_empty()) {
        errors.push("At least one song is required".to_string());
    }

    if fields.status == Some(ReleaseStatus::Scheduled) {
        match fields.scheduled_publish_at {
            None => errors
                .push("Scheduled publish date is required for programmed releases".to_string()),
            Some(at) if at <= now => {
                errors.push("Scheduled publish date must be in the future".to_string())
            }
            Some(_) => {}
        }
    }

    let date = parse_release_date(fields.release_date).map_err(|e| errors.push(e));

    match date {
        Ok(date) if errors.is_empty() => Ok(date),
        _ => Err(invalid(errors)),
    }
}

/// The fields of a partial release update that carry rules. `None` means
/// "not supplied".
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseChangeFields<'a> {
    pub title: Option<&'a str>,
    pub release_date: Option<&'a str>,
    pub cover_url: Option<&'a str>,
    pub genres: Option<&'a [String]>,
    pub song_ids: Option<&'a [String]>,
}

/// Validate the supplied fields of a partial update, collecting every
/// failing rule.
///
/// Returns the normalized release date when one was supplied.
pub fn validate_release_changes(
    fields: &ReleaseChangeFields<'_>,
) -> Result<Option<CalendarDate>, CoreError> {
    let mut errors = Vec::new();

    if matches!(fields.title, Some(title) if title.trim().is_empty()) {
        errors.push("Title must not be empty".to_string());
    }
    if matches!(fields.cover_url, Some(url) if url.trim().is_empty()) {
        errors.push("Cover image must not be empty".to_string());
    }
    if matches!(fields.genres, Some(genres) if genres.is_empty()) {
        errors.push("If genres are provided, at least one genre is required".to_string());
    }
    if matches!(fields.song_ids, Some(ids) if ids.is_empty()) {
        errors.push("At least one song is required".to_string());
    }

    let date = match fields.release_date {
        Some(raw) => match parse_release_date(raw) {
            Ok(date) => Some(date),
            Err(e) => {
                errors.push(e);
                None
            }
        },
        None => None,
    };

    if errors.is_empty() {
        Ok(date)
    } else {
        Err(invalid(errors))
    }
}

fn invalid(errors: Vec<String>) -> CoreError {
    CoreError::InvalidFields {
        message: VALIDATION_MESSAGE.to_string(),
        errors,
    }
}

// ---------------------------------------------------------------------------
// Status derivation
// ---------------------------------------------------------------------------

/// Compute the status a new release is stored with.
///
/// | scheduled_publish_at | requested | result     |
/// |----------------------|-----------|------------|
/// | in the future        | any       | scheduled  |
/// | now or past          | any       | published  |
/// | absent               | absent    | published  |
/// | absent               | `s`       | `s`        |
pub fn derive_status(
    requested: Option<ReleaseStatus>,
    scheduled_publish_at: Option<Timestamp>,
    now: Timestamp,
) -> ReleaseStatus {
    match (scheduled_publish_at, requested) {
        (Some(at), _) if at > now => ReleaseStatus::Scheduled,
        (Some(_), _) => ReleaseStatus::Published,
        (None, None) => ReleaseStatus::Published,
        (None, Some(status)) => status,
    }
}

// ---------------------------------------------------------------------------
// Song membership
// ---------------------------------------------------------------------------

/// Kind of song-membership mutation, used for guard messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SongChange {
    Add,
    Remove,
    Replace,
}

/// Reject song-membership mutation on a published release.
pub fn ensure_songs_mutable(status: ReleaseStatus, change: SongChange) -> Result<(), CoreError> {
    if status.allows_song_changes() {
        return Ok(());
    }
    let msg = match change {
        SongChange::Add => "Cannot add songs to published releases",
        SongChange::Remove => "Cannot remove songs from published releases",
        SongChange::Replace => "Cannot change the songs of published releases",
    };
    Err(CoreError::SongSetLocked(format!(
        "{msg}. Only draft and scheduled releases can be modified."
    )))
}

/// Collapse duplicates, keeping the first occurrence of each id.
pub fn dedup_song_ids<I>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// Existing ids in their order, then new ids not already present.
pub fn merge_song_ids(existing: &[String], added: &[String]) -> Vec<String> {
    dedup_song_ids(existing.iter().chain(added).cloned())
}

/// Existing ids minus every id in `removed`.
pub fn remove_song_ids(existing: &[String], removed: &[String]) -> Vec<String> {
    let removed: HashSet<&str> = removed.iter().map(String::as_str).collect();
    existing
        .iter()
        .filter(|id| !removed.contains(id.as_str()))
        .cloned()
        .collect()
}

/// Whether two song lists hold the same set of ids.
pub fn same_song_set(a: &[String], b: &[String]) -> bool {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    a == b
}

// ---------------------------------------------------------------------------
// Latest flag
// ---------------------------------------------------------------------------

/// Pair each release with its "latest" flag.
///
/// `ordered` must already be in listing order (release date descending,
/// title ascending). The first element is always latest, as is every
/// element whose date equals the maximum date.
pub fn flag_latest<T, F>(ordered: Vec<T>, date_of: F) -> Vec<(T, bool)>
where
    F: Fn(&T) -> CalendarDate,
{
    let Some(max) = ordered.iter().map(&date_of).max() else {
        return Vec::new();
    };
    ordered
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let latest = index == 0 || date_of(&item) == max;
            (item, latest)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
