//! Uploading a rendered mockup as a render/thumbnail pair.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    foundation::error::{MockupError, MockupResult},
    io::store::ArtifactStore,
    model::job::MockupUrls,
    render::pipeline::CompositeResult,
};

/// Storage keys of one artifact pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactKeys {
    /// Key of the full-size render.
    pub render: String,
    /// Key of the thumbnail.
    pub thumbnail: String,
}

impl ArtifactKeys {
    /// `{prefix}/{timestamp_ms}-{id}-render.{ext}` and the matching `-thumb` key.
    pub fn new(
        prefix: &str,
        at: DateTime<Utc>,
        id: Uuid,
        render_ext: &str,
        thumbnail_ext: &str,
    ) -> Self {
        let prefix = prefix.trim_matches('/');
        let stem = format!("{}-{}", at.timestamp_millis(), id.simple());
        let key = |suffix: &str, ext: &str| {
            if prefix.is_empty() {
                format!("{stem}-{suffix}.{ext}")
            } else {
                format!("{prefix}/{stem}-{suffix}.{ext}")
            }
        };
        Self {
            render: key("render", render_ext),
            thumbnail: key("thumb", thumbnail_ext),
        }
    }
}

/// Stores both artifacts concurrently; either both URLs are returned or neither.
#[derive(Clone)]
pub struct OutputPackager {
    store: Arc<dyn ArtifactStore>,
    key_prefix: String,
    timeout: Duration,
}

impl std::fmt::Debug for OutputPackager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputPackager")
            .field("key_prefix", &self.key_prefix)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl OutputPackager {
    /// Packager writing under `key_prefix`, giving each upload `timeout`.
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        key_prefix: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
            timeout,
        }
    }

    /// Upload the render and thumbnail of `rendered`.
    ///
    /// If one upload fails the other artifact is deleted best-effort and the failure is
    /// returned as a storage error.
    #[tracing::instrument(
        skip_all,
        fields(render_bytes = rendered.render.len(), thumb_bytes = rendered.thumbnail.len())
    )]
    pub async fn package(&self, rendered: CompositeResult) -> MockupResult<MockupUrls> {
        let keys = ArtifactKeys::new(
            &self.key_prefix,
            Utc::now(),
            Uuid::new_v4(),
            rendered.render_format.extension(),
            rendered.thumbnail_format.extension(),
        );

        let (render, thumbnail) = tokio::join!(
            self.upload(
                rendered.render,
                &keys.render,
                rendered.render_format.content_type()
            ),
            self.upload(
                rendered.thumbnail,
                &keys.thumbnail,
                rendered.thumbnail_format.content_type()
            ),
        );

        match (render, thumbnail) {
            (Ok(render_url), Ok(thumbnail_url)) => Ok(MockupUrls {
                render_url,
                thumbnail_url,
            }),
            (Ok(_), Err(e)) => {
                self.discard(&keys.render).await;
                Err(e)
            }
            (Err(e), Ok(_)) => {
                self.discard(&keys.thumbnail).await;
                Err(e)
            }
            (Err(e), Err(_)) => Err(e),
        }
    }

    async fn upload(&self, bytes: Vec<u8>, key: &str, content_type: &str) -> MockupResult<String> {
        match tokio::time::timeout(self.timeout, self.store.store(bytes, key, content_type)).await {
            Ok(Ok(url)) => Ok(url),
            Ok(Err(e @ MockupError::Storage(_))) => Err(e),
            Ok(Err(e)) => Err(MockupError::storage(format!("storing {key}: {e}"))),
            Err(_) => Err(MockupError::storage(format!(
                "storing {key} timed out after {} ms",
                self.timeout.as_millis()
            ))),
        }
    }

    async fn discard(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            tracing::warn!(key, error = %e, "failed to remove orphaned artifact");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/worker/package.rs"]
mod tests;
