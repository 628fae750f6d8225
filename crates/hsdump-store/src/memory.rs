use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use hsdump_types::{Domain, ObjectVersion};

use crate::error::{StoreError, StoreResult};
use crate::fs::DOMAIN_FILE;
use crate::path::normalize;
use crate::traits::{DomainSource, HierarchicalSink, VersionHistory};

/// In-memory [`DomainSource`] for tests and embedding.
///
/// Populated up front with domains, version histories, and payloads; behaves
/// like the S3 source, including newest-first ordering of inserted versions
/// (the caller inserts them in that order).
#[derive(Debug, Default)]
pub struct MemorySource {
    domains: HashMap<String, Domain>,
    history: VersionHistory,
    objects: HashMap<(String, String), Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a domain under `name`.
    pub fn insert_domain(&mut self, name: impl Into<String>, domain: Domain) {
        self.domains.insert(name.into(), domain);
    }

    /// Append a revision of `path` with its payload. Versions must be
    /// inserted newest-first, matching the source contract.
    pub fn insert_version(&mut self, path: impl Into<String>, version: ObjectVersion, data: Vec<u8>) {
        let path = path.into();
        self.objects.insert((path.clone(), version.id.clone()), data);
        self.history.entry(path).or_default().push(version);
    }
}

#[async_trait]
impl DomainSource for MemorySource {
    async fn load_domain(&self, name: &str) -> StoreResult<Domain> {
        self.domains
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_owned()))
    }

    async fn load_version_history(&self, domain: &Domain) -> StoreResult<VersionHistory> {
        let prefix = domain.db_prefix().ok_or(StoreError::MissingRoot)?;
        Ok(self
            .history
            .iter()
            .filter(|(path, _)| path.starts_with(&prefix))
            .map(|(path, versions)| (path.clone(), versions.clone()))
            .collect())
    }

    async fn fetch_object(&self, path: &str, version: Option<&str>) -> StoreResult<Vec<u8>> {
        let id = match version {
            Some(id) => id.to_owned(),
            None => self
                .history
                .get(path)
                .and_then(|versions| versions.first())
                .map(|v| v.id.clone())
                .ok_or_else(|| StoreError::NotFound(path.to_owned()))?,
        };
        self.objects
            .get(&(path.to_owned(), id))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(path.to_owned()))
    }
}

/// In-memory [`HierarchicalSink`] recording every written file by its
/// normalized path.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bytes stored under a normalized path, if any.
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.read().expect("lock poisoned").get(path).cloned()
    }

    /// All stored paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.files
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().expect("lock poisoned").is_empty()
    }
}

#[async_trait]
impl HierarchicalSink for MemorySink {
    async fn store_domain(&self, name: &str, domain: &Domain) -> StoreResult<()> {
        let parts = normalize(name)?;
        let marker = serde_json::to_vec(&domain.without_root())?;
        let document = serde_json::to_vec(domain)?;

        let mut files = self.files.write().expect("lock poisoned");
        for depth in 1..parts.len() {
            let key = format!("{}/{}", parts[..depth].join("/"), DOMAIN_FILE);
            files.entry(key).or_insert_with(|| marker.clone());
        }
        files.insert(format!("{}/{}", parts.join("/"), DOMAIN_FILE), document);
        Ok(())
    }

    async fn store_object(&self, path: &str, data: &[u8]) -> StoreResult<()> {
        let parts = normalize(path)?;
        self.files
            .write()
            .expect("lock poisoned")
            .insert(parts.join("/"), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hsdump_types::EntityId;

    fn domain() -> Domain {
        Domain {
            root: Some(EntityId::parse("g-d12a20a5-6c27622f-59a2-a82de4-afeaa7").unwrap()),
            owner: "tester".into(),
            ..Domain::default()
        }
    }

    fn version(id: &str, epoch_secs: i64) -> ObjectVersion {
        ObjectVersion::new(id, Utc.timestamp_opt(epoch_secs, 0).unwrap(), 0)
    }

    #[tokio::test]
    async fn load_domain_not_found() {
        let source = MemorySource::new();
        let err = source.load_domain("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn history_is_scoped_to_db_prefix() {
        let mut source = MemorySource::new();
        source.insert_domain("d", domain());
        source.insert_version(
            "db/d12a20a5-6c27622f/g/.group.json",
            version("v1", 100),
            b"a".to_vec(),
        );
        source.insert_version(
            "db/ffffffff-ffffffff/g/.group.json",
            version("v1", 100),
            b"b".to_vec(),
        );

        let history = source.load_version_history(&domain()).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history.contains_key("db/d12a20a5-6c27622f/g/.group.json"));
    }

    #[tokio::test]
    async fn history_requires_root() {
        let source = MemorySource::new();
        let err = source
            .load_version_history(&Domain::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingRoot));
    }

    #[tokio::test]
    async fn fetch_without_version_returns_newest() {
        let mut source = MemorySource::new();
        source.insert_version("p", version("new", 200), b"new".to_vec());
        source.insert_version("p", version("old", 100), b"old".to_vec());

        assert_eq!(source.fetch_object("p", None).await.unwrap(), b"new");
        assert_eq!(source.fetch_object("p", Some("old")).await.unwrap(), b"old");
    }

    #[tokio::test]
    async fn sink_records_markers_and_document() {
        let sink = MemorySink::new();
        sink.store_domain("home/user/data.h5", &domain()).await.unwrap();

        let own: Domain =
            serde_json::from_slice(&sink.file("home/user/data.h5/.domain.json").unwrap()).unwrap();
        assert_eq!(own, domain());
        let marker: Domain =
            serde_json::from_slice(&sink.file("home/.domain.json").unwrap()).unwrap();
        assert!(marker.root.is_none());
        assert!(sink.file("home/user/.domain.json").is_some());
    }

    #[tokio::test]
    async fn sink_rejects_root_paths() {
        let sink = MemorySink::new();
        assert!(matches!(
            sink.store_object(".", b"x").await.unwrap_err(),
            StoreError::PathSanitization(_)
        ));
        assert!(matches!(
            sink.store_domain("/", &domain()).await.unwrap_err(),
            StoreError::PathSanitization(_)
        ));
    }
}
