//! Book release-date normalization and ISBN-derived links.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Marketplace used for the per-book search link.
pub const MARKETPLACE_SEARCH_BASE: &str = "https://www.amazon.com/s";

/// Parse an upstream `released` value into a UTC timestamp.
///
/// Accepted shapes:
/// - RFC 3339 with an offset or `Z` (`2005-11-08T00:00:00-05:00`)
/// - naive date-time, interpreted as UTC (`2005-11-08T00:00:00`, optional fraction)
/// - bare date, midnight UTC (`2005-11-08`)
///
/// `None` or a blank string is an absent release date, not an error.
pub fn parse_released(value: Option<&str>) -> Result<Option<Timestamp>, CoreError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(naive.and_utc()));
    }
    if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(naive.and_utc()));
    }

    Err(CoreError::MalformedRecord {
        field: "released",
        value: raw.to_string(),
    })
}

/// Strip hyphens and surrounding whitespace from an ISBN.
pub fn compact_isbn(isbn: &str) -> String {
    isbn.trim().chars().filter(|c| *c != '-').collect()
}

/// Book search link on the marketplace for the given ISBN.
pub fn marketplace_search_url(isbn: &str) -> String {
    format!(
        "{MARKETPLACE_SEARCH_BASE}?k={}&i=stripbooks",
        compact_isbn(isbn)
    )
}
