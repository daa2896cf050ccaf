/// All primary keys are UUIDs. User ids are the auth provider's subject ids.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
