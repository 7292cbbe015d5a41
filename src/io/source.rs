//! Fetching logo and template bytes.
//!
//! Supported locations:
//!
//! - `http://...` / `https://...` fetched with `reqwest`
//! - `file:///abs/path` or a plain filesystem path

use std::{path::PathBuf, time::Duration};

use anyhow::Context;

use crate::foundation::error::{MockupError, MockupResult};

/// Source of encoded image bytes.
#[async_trait::async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the full body behind `url`.
    async fn fetch(&self, url: &str) -> MockupResult<Vec<u8>>;
}

/// Parsed source location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceLocation {
    /// HTTP(S) URL, kept verbatim.
    Http(String),
    /// Local file.
    File(PathBuf),
}

impl SourceLocation {
    /// Classify `url` by scheme. Schemes other than http, https and file are rejected.
    pub fn parse(url: &str) -> MockupResult<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(MockupError::validation("source url must be non-empty"));
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(Self::Http(url.to_owned()));
        }
        if let Some(path) = url.strip_prefix("file://") {
            if path.is_empty() {
                return Err(MockupError::validation(format!("empty file url: {url}")));
            }
            return Ok(Self::File(PathBuf::from(path)));
        }
        if let Some((scheme, _)) = url.split_once("://") {
            return Err(MockupError::validation(format!(
                "unsupported source scheme \"{scheme}\" in {url}"
            )));
        }
        Ok(Self::File(PathBuf::from(url)))
    }
}

/// HTTP(S) fetcher with a per-request timeout.
#[derive(Clone, Debug)]
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> MockupResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mockup-worker/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> MockupResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MockupError::storage(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MockupError::storage(format!(
                "GET {url} returned status {status}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| MockupError::storage(format!("reading body of {url} failed: {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Reads `file://` URLs and plain paths from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsImageSource;

#[async_trait::async_trait]
impl ImageSource for FsImageSource {
    async fn fetch(&self, url: &str) -> MockupResult<Vec<u8>> {
        let path = match SourceLocation::parse(url)? {
            SourceLocation::File(path) => path,
            SourceLocation::Http(_) => {
                return Err(MockupError::validation(format!(
                    "not a filesystem location: {url}"
                )));
            }
        };
        tokio::fs::read(&path)
            .await
            .map_err(|e| MockupError::storage(format!("read {}: {e}", path.display())))
    }
}

/// Dispatches to [`HttpImageSource`] or [`FsImageSource`] by scheme.
#[derive(Clone, Debug)]
pub struct RoutingImageSource {
    http: HttpImageSource,
    fs: FsImageSource,
}

impl RoutingImageSource {
    /// Router whose HTTP requests give up after `http_timeout`.
    pub fn new(http_timeout: Duration) -> MockupResult<Self> {
        Ok(Self {
            http: HttpImageSource::new(http_timeout)?,
            fs: FsImageSource,
        })
    }
}

#[async_trait::async_trait]
impl ImageSource for RoutingImageSource {
    async fn fetch(&self, url: &str) -> MockupResult<Vec<u8>> {
        match SourceLocation::parse(url)? {
            SourceLocation::Http(_) => self.http.fetch(url).await,
            SourceLocation::File(_) => self.fs.fetch(url).await,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/source.rs"]
mod tests;
