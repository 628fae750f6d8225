use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Run configuration, passed explicitly to the engine at construction.
#[derive(Debug, Clone, Default)]
pub struct ReplicaConfig {
    /// Root directory of the target hierarchical store.
    pub root: PathBuf,
    /// Inclusive "not after" bound on selected versions. Absent means the
    /// most recent state of every object.
    pub cutoff: Option<DateTime<Utc>>,
}
