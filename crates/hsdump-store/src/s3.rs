use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use hsdump_types::{Domain, ObjectVersion};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::fs::DOMAIN_FILE;
use crate::traits::{DomainSource, VersionHistory};

/// [`DomainSource`] backed by a versioned S3 bucket laid out as an HSDS
/// database.
#[derive(Debug, Clone)]
pub struct S3DomainSource {
    client: Client,
    bucket: String,
}

impl S3DomainSource {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a source from the ambient AWS configuration (environment,
    /// profile, instance role).
    pub async fn from_env(bucket: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), bucket)
    }

    async fn get_bytes(&self, key: &str, version: Option<&str>) -> StoreResult<Vec<u8>> {
        let mut request = self.client.get_object().bucket(&self.bucket).key(key);
        if let Some(id) = version {
            request = request.version_id(id);
        }
        let output = request.send().await.map_err(|err| {
            let service = err.into_service_error();
            if service.is_no_such_key() {
                StoreError::NotFound(key.to_owned())
            } else {
                StoreError::S3(service.to_string())
            }
        })?;
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|err| StoreError::S3(err.to_string()))?;
        Ok(bytes.into_bytes().to_vec())
    }
}

fn to_utc(timestamp: Option<&aws_sdk_s3::primitives::DateTime>) -> DateTime<Utc> {
    timestamp
        .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[async_trait]
impl DomainSource for S3DomainSource {
    async fn load_domain(&self, name: &str) -> StoreResult<Domain> {
        let key = format!("{}/{}", name.trim_matches('/'), DOMAIN_FILE);
        let bytes = self.get_bytes(&key, None).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn load_version_history(&self, domain: &Domain) -> StoreResult<VersionHistory> {
        let prefix = domain.db_prefix().ok_or(StoreError::MissingRoot)?;

        let mut history: VersionHistory = BTreeMap::new();
        let mut key_marker: Option<String> = None;
        let mut version_marker: Option<String> = None;
        loop {
            let mut request = self
                .client
                .list_object_versions()
                .bucket(&self.bucket)
                .prefix(&prefix);
            if let Some(marker) = &key_marker {
                request = request.key_marker(marker);
            }
            if let Some(marker) = &version_marker {
                request = request.version_id_marker(marker);
            }
            let output = request
                .send()
                .await
                .map_err(|err| StoreError::S3(err.into_service_error().to_string()))?;

            for entry in output.versions() {
                let (Some(key), Some(id)) = (entry.key(), entry.version_id()) else {
                    continue;
                };
                history.entry(key.to_owned()).or_default().push(ObjectVersion::new(
                    id,
                    to_utc(entry.last_modified()),
                    entry.size().unwrap_or(0).max(0) as u64,
                ));
            }

            if output.is_truncated().unwrap_or(false) {
                key_marker = output.next_key_marker().map(str::to_owned);
                version_marker = output.next_version_id_marker().map(str::to_owned);
            } else {
                break;
            }
        }

        // S3 should already list versions newest-first per key; re-sort in
        // case a page boundary or backend quirk broke the ordering.
        for versions in history.values_mut() {
            versions.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        }

        debug!(prefix = %prefix, objects = history.len(), "loaded version history");
        Ok(history)
    }

    async fn fetch_object(&self, path: &str, version: Option<&str>) -> StoreResult<Vec<u8>> {
        self.get_bytes(path, version).await
    }
}
