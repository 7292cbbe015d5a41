use std::{sync::Arc, time::Duration};

use crate::{
    config::WorkerConfig,
    foundation::error::{MockupError, MockupResult, Stage},
    io::source::ImageSource,
    io::store::ArtifactStore,
    model::customizations::Customizations,
    model::job::MockupUrls,
    render::pipeline::Renderer,
    render::text::TextRenderer,
    worker::package::OutputPackager,
};

/// Fetch, render and package one mockup.
///
/// Both sources are fetched concurrently, compositing runs on the blocking pool and both
/// artifacts are uploaded concurrently. Nothing is stored unless rendering succeeded.
#[derive(Clone)]
pub struct MockupGenerator {
    source: Arc<dyn ImageSource>,
    renderer: Arc<Renderer>,
    packager: OutputPackager,
    fetch_timeout: Duration,
}

impl std::fmt::Debug for MockupGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockupGenerator")
            .field("renderer", &self.renderer)
            .field("packager", &self.packager)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

impl MockupGenerator {
    /// Generator wired from `config`.
    pub fn new(
        config: &WorkerConfig,
        source: Arc<dyn ImageSource>,
        store: Arc<dyn ArtifactStore>,
    ) -> Self {
        let renderer = Renderer::new(
            config.render_settings(),
            TextRenderer::new(config.font_dirs.clone()),
        );
        Self::from_parts(
            source,
            Arc::new(renderer),
            OutputPackager::new(store, config.key_prefix.clone(), config.store_timeout()),
            config.fetch_timeout(),
        )
    }

    /// Generator over explicit components.
    pub fn from_parts(
        source: Arc<dyn ImageSource>,
        renderer: Arc<Renderer>,
        packager: OutputPackager,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            renderer,
            packager,
            fetch_timeout,
        }
    }

    /// Produce and store a mockup, returning the render and thumbnail URLs.
    #[tracing::instrument(skip(self, customizations))]
    pub async fn generate_mockup(
        &self,
        logo_url: &str,
        template_url: &str,
        customizations: &Customizations,
    ) -> MockupResult<MockupUrls> {
        customizations
            .validate()
            .inspect_err(|e| log_failure(Stage::Validate, e))?;

        tracing::debug!(stage = %Stage::Fetch, "fetching sources");
        let (logo, template) = tokio::try_join!(
            self.fetch("logo", logo_url),
            self.fetch("template", template_url)
        )
        .inspect_err(|e| log_failure(Stage::Fetch, e))?;

        let renderer = Arc::clone(&self.renderer);
        let customizations = customizations.clone();
        let rendered = tokio::task::spawn_blocking(move || {
            renderer.render_mockup(&logo, &template, &customizations)
        })
        .await
        .map_err(|e| MockupError::render(format!("render task failed: {e}")))
        .and_then(|r| r)
        .inspect_err(|e| log_failure(render_stage(e), e))?;

        tracing::debug!(
            stage = %Stage::Package,
            width = rendered.render_size.0,
            height = rendered.render_size.1,
            "uploading artifacts"
        );
        self.packager
            .package(rendered)
            .await
            .inspect_err(|e| log_failure(Stage::Package, e))
    }

    async fn fetch(&self, what: &str, url: &str) -> MockupResult<Vec<u8>> {
        let bytes = tokio::time::timeout(self.fetch_timeout, self.source.fetch(url))
            .await
            .map_err(|_| {
                MockupError::storage(format!(
                    "fetching {what} from {url} timed out after {} ms",
                    self.fetch_timeout.as_millis()
                ))
            })??;
        tracing::debug!(what, bytes = bytes.len(), "source fetched");
        Ok(bytes)
    }
}

fn log_failure(stage: Stage, err: &MockupError) {
    tracing::error!(%stage, error = %err, "pipeline stage failed");
}

/// Stage a rendering failure belongs to.
fn render_stage(err: &MockupError) -> Stage {
    match err {
        MockupError::Validation(_) => Stage::Validate,
        MockupError::ImageDecode(_) => Stage::Decode,
        MockupError::TextClip(_) => Stage::Text,
        _ => Stage::Composite,
    }
}
