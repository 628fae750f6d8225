use std::collections::BTreeMap;

use async_trait::async_trait;
use hsdump_types::{Domain, ObjectVersion};

use crate::error::StoreResult;

/// Version history for every object belonging to one domain: object path to
/// its revisions, sorted newest-first within each path.
pub type VersionHistory = BTreeMap<String, Vec<ObjectVersion>>;

/// Read side: enumerates and fetches a domain's contents from the backing
/// object store.
#[async_trait]
pub trait DomainSource: Send + Sync {
    /// Load the domain document stored under `name`.
    async fn load_domain(&self, name: &str) -> StoreResult<Domain>;

    /// Load the full version history of every object under the domain's
    /// database prefix. Each path's versions are sorted newest-first and
    /// never empty.
    async fn load_version_history(&self, domain: &Domain) -> StoreResult<VersionHistory>;

    /// Fetch one object's payload bytes. `version` of `None` means the
    /// latest revision.
    async fn fetch_object(&self, path: &str, version: Option<&str>) -> StoreResult<Vec<u8>>;
}

/// Write side: persists domains and objects into a hierarchical store.
#[async_trait]
pub trait HierarchicalSink: Send + Sync {
    /// Persist the domain document under `<name>/.domain.json`. For every
    /// path segment between the store root and `name`, a marker document
    /// with the root cleared is created if one does not already exist.
    async fn store_domain(&self, name: &str, domain: &Domain) -> StoreResult<()>;

    /// Persist an object's payload under its original path, creating
    /// missing intermediate directories.
    async fn store_object(&self, path: &str, data: &[u8]) -> StoreResult<()>;
}
