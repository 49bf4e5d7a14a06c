/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Reconciliation key taken from the trailing segment of an upstream URL.
/// Stored as PostgreSQL INTEGER.
pub type ExternalId = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
