//! External-id extraction from upstream resource URLs.
//!
//! Every upstream record and every relationship reference is a URL of the
//! form `https://anapioficeandfire.com/api/<kind>/<n>`. The trailing integer
//! is the reconciliation key for the record's kind.

use crate::error::CoreError;
use crate::types::ExternalId;

/// Return the trailing integer of a resource reference such as
/// `.../characters/583` or `.../houses/17/`.
///
/// Anything other than a positive integer in the last path segment is a
/// [`CoreError::MalformedReference`]; callers must not substitute a default.
pub fn external_id(reference: &str) -> Result<ExternalId, CoreError> {
    let segment = reference
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();

    match segment.parse::<ExternalId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::MalformedReference(reference.to_string())),
    }
}
