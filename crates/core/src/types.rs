/// Artist identifiers are opaque strings, usually assigned by the identity
/// service that owns the user account.
pub type ArtistId = String;

/// Release identifiers are generated UUIDs.
pub type ReleaseId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date without time or zone (release dates).
pub type CalendarDate = chrono::NaiveDate;
