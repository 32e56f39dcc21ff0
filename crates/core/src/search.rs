//! Search and pagination helpers shared by the artist and release listings.

use crate::error::CoreError;

/// Default page when the caller omits `page`.
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of results per page.
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Maximum number of results per page.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Validate user-supplied `page` / `limit`, applying defaults.
    ///
    /// `page` must be at least 1 and `limit` must lie in `1..=100`. The
    /// resulting offset must fit in an `i64`.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, CoreError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

        if page < 1 {
            return Err(CoreError::Validation(
                "Page must be greater than 0".to_string(),
            ));
        }
        if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
            return Err(CoreError::Validation(format!(
                "Limit must be between 1 and {MAX_SEARCH_LIMIT}"
            )));
        }
        if (page - 1).checked_mul(limit).is_none() {
            return Err(CoreError::Validation("Page is out of range".to_string()));
        }
        Ok(Self { page, limit })
    }

    /// Rows to skip: `(page - 1) * limit`.
    pub fn offset(self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Require a non-blank search query, returning it trimmed.
pub fn require_query(query: Option<&str>) -> Result<&str, CoreError> {
    match query.map(str::trim) {
        Some(q) if !q.is_empty() => Ok(q),
        _ => Err(CoreError::Validation(
            "Query parameter is required".to_string(),
        )),
    }
}

/// Build a case-insensitive substring pattern for `ILIKE`.
///
/// `%`, `_` and `\` in the query are escaped so they match literally.
pub fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
