/// Entity primary keys (BIGSERIAL in PostgreSQL, a counter in memory).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
