//! In-process source and store, used by tests and embedders that keep artifacts in memory.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::{
    foundation::error::{MockupError, MockupResult},
    io::source::ImageSource,
    io::store::ArtifactStore,
};

/// Serves bytes registered up front, optionally after a fixed delay.
#[derive(Debug, Default)]
pub struct MemorySource {
    objects: HashMap<String, Vec<u8>>,
    delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl MemorySource {
    /// Empty source; every fetch fails until objects are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `url`.
    pub fn with(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.objects.insert(url.into(), bytes);
        self
    }

    /// Sleep for `delay` before answering each fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of fetches started so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ImageSource for MemorySource {
    async fn fetch(&self, url: &str) -> MockupResult<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.objects
            .get(url)
            .cloned()
            .ok_or_else(|| MockupError::storage(format!("no object at {url}")))
    }
}

/// One artifact held by [`MemoryStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredArtifact {
    /// Storage key.
    pub key: String,
    /// MIME type passed to `store`.
    pub content_type: String,
    /// Artifact bytes.
    pub bytes: Vec<u8>,
}

/// Keeps artifacts in a map and returns `memory://{key}` URLs.
///
/// Keys containing any configured failure marker are rejected, which lets tests fail one
/// upload of a pair.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredArtifact>>,
    fail_markers: Vec<String>,
    delay: Option<Duration>,
}

impl MemoryStore {
    /// Empty store that accepts every key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject keys containing `marker`.
    pub fn failing_on(mut self, marker: impl Into<String>) -> Self {
        self.fail_markers.push(marker.into());
        self
    }

    /// Sleep for `delay` before answering each store call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Snapshot of stored artifacts, ordered by key.
    pub fn artifacts(&self) -> Vec<StoredArtifact> {
        self.lock().values().cloned().collect()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoredArtifact>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl ArtifactStore for MemoryStore {
    async fn store(&self, bytes: Vec<u8>, key: &str, content_type: &str) -> MockupResult<String> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_markers.iter().any(|m| key.contains(m.as_str())) {
            return Err(MockupError::storage(format!("store rejected {key}")));
        }
        self.lock().insert(
            key.to_owned(),
            StoredArtifact {
                key: key.to_owned(),
                content_type: content_type.to_owned(),
                bytes,
            },
        );
        Ok(format!("memory://{key}"))
    }

    async fn delete(&self, key: &str) -> MockupResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/memory.rs"]
mod tests;
