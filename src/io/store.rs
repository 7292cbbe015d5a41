//! Persisting rendered artifacts.

use std::path::{Component, Path, PathBuf};

use crate::foundation::error::{MockupError, MockupResult};

/// Destination for rendered artifacts.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist `bytes` under `key` and return the public URL.
    async fn store(&self, bytes: Vec<u8>, key: &str, content_type: &str) -> MockupResult<String>;

    /// Remove the artifact stored under `key`. Missing keys are not an error.
    async fn delete(&self, key: &str) -> MockupResult<()>;
}

/// Writes artifacts below a root directory and returns `file://` URLs.
#[derive(Clone, Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Store rooted at `root`; the directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> MockupResult<PathBuf> {
        let rel = Path::new(key);
        let normal = !key.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !normal {
            return Err(MockupError::storage(format!("invalid artifact key: {key:?}")));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait::async_trait]
impl ArtifactStore for DirStore {
    async fn store(&self, bytes: Vec<u8>, key: &str, content_type: &str) -> MockupResult<String> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| MockupError::storage(format!("create {}: {e}", parent.display())))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| MockupError::storage(format!("write {}: {e}", path.display())))?;

        let abs = std::path::absolute(&path)
            .map_err(|e| MockupError::storage(format!("resolve {}: {e}", path.display())))?;
        tracing::debug!(key, content_type, bytes = bytes.len(), "artifact written");
        Ok(format!("file://{}", abs.display()))
    }

    async fn delete(&self, key: &str) -> MockupResult<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MockupError::storage(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/store.rs"]
mod tests;
