/// Row id; every table uses `BIGSERIAL` keys.
pub type DbId = i64;

/// Stored and serialized in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
