use chrono::{DateTime, Utc};

/// One historical revision of a stored object.
///
/// Version histories are carried as slices sorted newest-first; the source
/// that produced them guarantees the ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectVersion {
    /// Opaque version identifier assigned by the backing store.
    pub id: String,
    /// When this revision was written.
    pub last_modified: DateTime<Utc>,
    /// Payload size in bytes.
    pub size: u64,
}

impl ObjectVersion {
    pub fn new(id: impl Into<String>, last_modified: DateTime<Utc>, size: u64) -> Self {
        Self {
            id: id.into(),
            last_modified,
            size,
        }
    }
}
