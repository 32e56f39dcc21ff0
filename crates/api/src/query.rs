//! Shared query parameter types for API handlers.

use melodia_core::release::ReleaseType;
use serde::Deserialize;

/// Search parameters (`?query=&page=&limit=`).
///
/// Presence and bounds are checked by the services, so a missing `query`
/// surfaces as a validation error rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Parameters for `GET /artists/{id}/releases`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseListParams {
    #[serde(rename = "type")]
    pub release_type: Option<ReleaseType>,
    /// When set, each release carries `isLatest` and `type` is ignored.
    #[serde(default)]
    pub with_latest_flag: bool,
}
