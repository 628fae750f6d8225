use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hsdump_types::Domain;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::StoreResult;
use crate::path::normalize;
use crate::traits::HierarchicalSink;

/// Marker document written for every domain and ancestor directory.
pub const DOMAIN_FILE: &str = ".domain.json";

/// [`HierarchicalSink`] backed by the local filesystem.
///
/// All writes land below the configured root; names are sanitized so they
/// can neither escape the root nor overwrite it.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> StoreResult<(PathBuf, Vec<String>)> {
        let parts = normalize(name)?;
        let mut full = self.root.clone();
        full.extend(&parts);
        Ok((full, parts))
    }
}

#[async_trait]
impl HierarchicalSink for FsSink {
    async fn store_domain(&self, name: &str, domain: &Domain) -> StoreResult<()> {
        let (dir, parts) = self.resolve(name)?;
        tokio::fs::create_dir_all(&dir).await?;

        // Ancestor directories carry a marker without a root group, created
        // only where no marker exists yet.
        let marker = serde_json::to_vec(&domain.without_root())?;
        let mut ancestor = self.root.clone();
        for part in &parts[..parts.len() - 1] {
            ancestor.push(part);
            let path = ancestor.join(DOMAIN_FILE);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(&marker).await?;
                    file.flush().await?;
                    debug!(path = %path.display(), "created ancestor domain marker");
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
                Err(err) => return Err(err.into()),
            }
        }

        let document = serde_json::to_vec(domain)?;
        tokio::fs::write(dir.join(DOMAIN_FILE), document).await?;
        Ok(())
    }

    async fn store_object(&self, path: &str, data: &[u8]) -> StoreResult<()> {
        let (full, _) = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, data).await?;
        debug!(path = %full.display(), bytes = data.len(), "stored object");
        Ok(())
    }
}
