use hsdump_store::{DomainSource, HierarchicalSink, StoreResult};
use hsdump_types::ObjectVersion;
use tracing::{debug, info};

use crate::config::ReplicaConfig;
use crate::error::{EngineError, EngineResult};
use crate::resolve::select_version;

/// Known versions of one object path, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectListing {
    pub path: String,
    pub versions: Vec<ObjectVersion>,
}

/// Everything a source knows about one domain's objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainListing {
    pub name: String,
    pub objects: Vec<ObjectListing>,
}

/// Totals reported after a successful replication run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplicaSummary {
    pub domains: usize,
    pub objects: usize,
    pub bytes: u64,
}

/// Orchestrates domain replication: load metadata, resolve one version per
/// object, fetch payloads, and persist the snapshot.
///
/// Processing is sequential — one domain at a time, one object at a time —
/// and the first error aborts the entire run.
pub struct Replicator<S, K> {
    source: S,
    sink: K,
    config: ReplicaConfig,
}

impl<S: DomainSource, K: HierarchicalSink> Replicator<S, K> {
    pub fn new(source: S, sink: K, config: ReplicaConfig) -> Self {
        Self {
            source,
            sink,
            config,
        }
    }

    /// Report every object path and every known version for each requested
    /// domain, without fetching payloads.
    pub async fn list(&self, domains: &[String]) -> EngineResult<Vec<DomainListing>> {
        let mut listings = Vec::with_capacity(domains.len());
        for name in domains {
            let listing = self
                .list_domain(name)
                .await
                .map_err(|source| EngineError::Domain {
                    domain: name.clone(),
                    source,
                })?;
            listings.push(listing);
        }
        Ok(listings)
    }

    async fn list_domain(&self, name: &str) -> StoreResult<DomainListing> {
        let domain = self.source.load_domain(name).await?;
        let history = self.source.load_version_history(&domain).await?;
        let objects = history
            .into_iter()
            .map(|(path, versions)| ObjectListing { path, versions })
            .collect();
        Ok(DomainListing {
            name: name.to_owned(),
            objects,
        })
    }

    /// Replicate each requested domain into the sink, selecting per object
    /// the newest version no later than the configured cutoff.
    pub async fn replicate(&self, domains: &[String]) -> EngineResult<ReplicaSummary> {
        let mut summary = ReplicaSummary::default();
        for name in domains {
            let written = self
                .replicate_domain(name)
                .await
                .map_err(|source| EngineError::Domain {
                    domain: name.clone(),
                    source,
                })?;
            summary.domains += 1;
            summary.objects += written.0;
            summary.bytes += written.1;
        }
        info!(
            domains = summary.domains,
            objects = summary.objects,
            bytes = summary.bytes,
            "replication complete"
        );
        Ok(summary)
    }

    async fn replicate_domain(&self, name: &str) -> StoreResult<(usize, u64)> {
        info!(domain = name, "replicating domain");
        let domain = self.source.load_domain(name).await?;
        let history = self.source.load_version_history(&domain).await?;

        let mut objects = Vec::with_capacity(history.len());
        for (path, versions) in &history {
            let version = select_version(versions, self.config.cutoff);
            debug!(path = %path, version, "resolved version");
            let data = self.source.fetch_object(path, Some(version)).await?;
            objects.push((path.as_str(), data));
        }

        self.sink.store_domain(name, &domain).await?;
        let mut bytes = 0u64;
        for (path, data) in &objects {
            self.sink.store_object(path, data).await?;
            bytes += data.len() as u64;
        }
        Ok((objects.len(), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use hsdump_store::{MemorySink, MemorySource, StoreError};
    use hsdump_types::{Domain, EntityId};

    const ROOT_ID: &str = "g-d12a20a5-6c27622f-59a2-a82de4-afeaa7";
    const OBJECT_PATH: &str = "db/d12a20a5-6c27622f/.group.json";

    fn domain() -> Domain {
        Domain {
            root: Some(EntityId::parse(ROOT_ID).unwrap()),
            owner: "admin".into(),
            ..Domain::default()
        }
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn two_version_source() -> MemorySource {
        let mut source = MemorySource::new();
        source.insert_domain("home/user/domain.h5", domain());
        source.insert_version(
            OBJECT_PATH,
            ObjectVersion::new("Vnew", at("2022-10-10T00:00:00Z"), 0),
            Vec::new(),
        );
        source.insert_version(
            OBJECT_PATH,
            ObjectVersion::new("Vold", at("2022-10-05T00:00:00Z"), 1296),
            vec![0xab; 1296],
        );
        source
    }

    #[tokio::test]
    async fn replicate_restores_state_before_cutoff() {
        let config = ReplicaConfig {
            cutoff: Some(at("2022-10-10T00:00:00+01:00")),
            ..ReplicaConfig::default()
        };
        let engine = Replicator::new(two_version_source(), MemorySink::new(), config);

        let summary = engine
            .replicate(&["home/user/domain.h5".into()])
            .await
            .unwrap();
        assert_eq!(summary.domains, 1);
        assert_eq!(summary.objects, 1);
        assert_eq!(summary.bytes, 1296);

        let sink_path = OBJECT_PATH;
        let data = engine.sink.file(sink_path).expect("object written");
        assert_eq!(data.len(), 1296);
    }

    #[tokio::test]
    async fn replicate_without_cutoff_takes_newest() {
        let engine = Replicator::new(
            two_version_source(),
            MemorySink::new(),
            ReplicaConfig::default(),
        );
        let summary = engine
            .replicate(&["home/user/domain.h5".into()])
            .await
            .unwrap();
        assert_eq!(summary.bytes, 0);
        assert_eq!(engine.sink.file(OBJECT_PATH).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn replicate_writes_domain_document_and_markers() {
        let engine = Replicator::new(
            two_version_source(),
            MemorySink::new(),
            ReplicaConfig::default(),
        );
        engine
            .replicate(&["home/user/domain.h5".into()])
            .await
            .unwrap();

        let own: Domain = serde_json::from_slice(
            &engine.sink.file("home/user/domain.h5/.domain.json").unwrap(),
        )
        .unwrap();
        assert_eq!(own.root, Some(EntityId::parse(ROOT_ID).unwrap()));

        let marker: Domain =
            serde_json::from_slice(&engine.sink.file("home/.domain.json").unwrap()).unwrap();
        assert!(marker.root.is_none());
    }

    #[tokio::test]
    async fn first_error_aborts_the_run() {
        let engine = Replicator::new(
            two_version_source(),
            MemorySink::new(),
            ReplicaConfig::default(),
        );
        let err = engine
            .replicate(&["missing.h5".into(), "home/user/domain.h5".into()])
            .await
            .unwrap_err();
        match err {
            EngineError::Domain { domain, source } => {
                assert_eq!(domain, "missing.h5");
                assert!(matches!(source, StoreError::NotFound(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Nothing was written for the second domain either.
        assert!(engine.sink.is_empty());
    }

    #[tokio::test]
    async fn list_reports_all_versions_without_payloads() {
        let engine = Replicator::new(
            two_version_source(),
            MemorySink::new(),
            ReplicaConfig::default(),
        );
        let listings = engine.list(&["home/user/domain.h5".into()]).await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "home/user/domain.h5");
        assert_eq!(listings[0].objects.len(), 1);

        let object = &listings[0].objects[0];
        assert_eq!(object.path, OBJECT_PATH);
        assert_eq!(object.versions.len(), 2);
        assert_eq!(object.versions[0].id, "Vnew");
        assert_eq!(object.versions[1].id, "Vold");
        assert!(engine.sink.is_empty());
    }
}
