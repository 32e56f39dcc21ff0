//! Business operations over the repositories.
//!
//! Services own the advisory uniqueness pre-checks, map the store's
//! unique-constraint violations back onto the same domain conflicts, and
//! apply the pure rules from `melodia_core`. Handlers stay thin.

pub mod artist_registry;
pub mod release_catalog;

pub use artist_registry::ArtistRegistry;
pub use release_catalog::{ReleaseCatalog, ReleaseScope};

use melodia_core::error::CoreError;

use crate::error::AppError;

/// Translate a unique violation on `constraint` into a domain conflict,
/// passing any other database error through unchanged.
fn map_unique_violation(
    err: sqlx::Error,
    classify: impl FnOnce(&str) -> Option<CoreError>,
) -> AppError {
    let conflict = melodia_db::unique_violation(&err).and_then(classify);
    match conflict {
        Some(core) => {
            tracing::debug!(error = %err, "Unique violation mapped to conflict");
            AppError::Core(core)
        }
        None => AppError::Database(err),
    }
}
