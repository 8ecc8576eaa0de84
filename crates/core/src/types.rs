/// All database primary keys are PostgreSQL BIGINT / BIGSERIAL.
///
/// Document ids, user ids and change ids share this type. Document ids are
/// unique across every document type, and a user's id is also the id of
/// their profile document.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
