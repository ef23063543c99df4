/// All entity primary keys are UUIDs (v7, so they sort by creation time).
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
