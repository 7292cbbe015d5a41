use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::{
    assets::encode::OutputFormat,
    foundation::error::{MockupError, MockupResult},
    model::job::RetryPolicy,
    render::pipeline::{DEFAULT_THUMBNAIL_MAX, RenderSettings},
};

/// Worker settings. Every field has a default suitable for local runs.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Per-source fetch timeout (default 15000).
    pub fetch_timeout_ms: u64,
    /// Per-artifact upload timeout (default 15000).
    pub store_timeout_ms: u64,
    /// Wall-clock budget for one job (default 60000).
    pub job_budget_ms: u64,
    /// Encoding of the full-size render (default JPEG q95).
    pub render_format: OutputFormat,
    /// Encoding of the thumbnail (default JPEG q80).
    pub thumbnail_format: OutputFormat,
    /// Thumbnail bounding box side (default 400).
    pub thumbnail_max: u32,
    /// Key prefix for stored artifacts (default `mockups`).
    pub key_prefix: String,
    /// Extra font directories searched in addition to system fonts.
    pub font_dirs: Vec<PathBuf>,
    /// Backoff schedule reported to the queue.
    pub retry: RetryPolicy,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        let render = RenderSettings::default();
        Self {
            fetch_timeout_ms: 15_000,
            store_timeout_ms: 15_000,
            job_budget_ms: 60_000,
            render_format: render.render_format,
            thumbnail_format: render.thumbnail_format,
            thumbnail_max: DEFAULT_THUMBNAIL_MAX,
            key_prefix: "mockups".to_owned(),
            font_dirs: Vec::new(),
            retry: RetryPolicy::default(),
        }
    }
}

impl WorkerConfig {
    /// Load configuration from `MOCKUP_*` environment variables with defaults.
    ///
    /// | Env Var                        | Default   |
    /// |--------------------------------|-----------|
    /// | `MOCKUP_FETCH_TIMEOUT_MS`      | `15000`   |
    /// | `MOCKUP_STORE_TIMEOUT_MS`      | `15000`   |
    /// | `MOCKUP_JOB_BUDGET_MS`         | `60000`   |
    /// | `MOCKUP_RENDER_FORMAT`         | `jpeg`    |
    /// | `MOCKUP_RENDER_QUALITY`        | `95`      |
    /// | `MOCKUP_THUMBNAIL_FORMAT`      | `jpeg`    |
    /// | `MOCKUP_THUMBNAIL_QUALITY`     | `80`      |
    /// | `MOCKUP_THUMBNAIL_MAX`         | `400`     |
    /// | `MOCKUP_KEY_PREFIX`            | `mockups` |
    /// | `MOCKUP_FONT_DIRS`             | (none)    |
    /// | `MOCKUP_RETRY_ATTEMPTS`        | `3`       |
    /// | `MOCKUP_RETRY_BASE_DELAY_MS`   | `2000`    |
    ///
    /// `MOCKUP_FONT_DIRS` uses the platform path-list separator.
    pub fn from_env() -> MockupResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`WorkerConfig::from_env`] but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> MockupResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cfg = Self {
            fetch_timeout_ms: parse_or(&get, "MOCKUP_FETCH_TIMEOUT_MS", d.fetch_timeout_ms)?,
            store_timeout_ms: parse_or(&get, "MOCKUP_STORE_TIMEOUT_MS", d.store_timeout_ms)?,
            job_budget_ms: parse_or(&get, "MOCKUP_JOB_BUDGET_MS", d.job_budget_ms)?,
            render_format: format_or(
                &get,
                "MOCKUP_RENDER_FORMAT",
                "MOCKUP_RENDER_QUALITY",
                d.render_format,
            )?,
            thumbnail_format: format_or(
                &get,
                "MOCKUP_THUMBNAIL_FORMAT",
                "MOCKUP_THUMBNAIL_QUALITY",
                d.thumbnail_format,
            )?,
            thumbnail_max: parse_or(&get, "MOCKUP_THUMBNAIL_MAX", d.thumbnail_max)?,
            key_prefix: get("MOCKUP_KEY_PREFIX")
                .map(|v| v.trim().to_owned())
                .unwrap_or(d.key_prefix),
            font_dirs: get("MOCKUP_FONT_DIRS")
                .map(|v| std::env::split_paths(&v).collect())
                .unwrap_or_default(),
            retry: RetryPolicy {
                attempts: parse_or(&get, "MOCKUP_RETRY_ATTEMPTS", d.retry.attempts)?,
                base_delay_ms: parse_or(
                    &get,
                    "MOCKUP_RETRY_BASE_DELAY_MS",
                    d.retry.base_delay_ms,
                )?,
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject zero timeouts, an empty thumbnail box, bad qualities and zero attempts.
    pub fn validate(&self) -> MockupResult<()> {
        for (name, v) in [
            ("fetch_timeout_ms", self.fetch_timeout_ms),
            ("store_timeout_ms", self.store_timeout_ms),
            ("job_budget_ms", self.job_budget_ms),
        ] {
            if v == 0 {
                return Err(MockupError::validation(format!("{name} must be > 0")));
            }
        }
        if self.thumbnail_max == 0 {
            return Err(MockupError::validation("thumbnail_max must be > 0"));
        }
        if self.retry.attempts == 0 {
            return Err(MockupError::validation("retry.attempts must be >= 1"));
        }
        self.render_format.validate()?;
        self.thumbnail_format.validate()
    }

    /// Per-source fetch timeout.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Per-artifact upload timeout.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Whole-job budget.
    pub fn job_budget(&self) -> Duration {
        Duration::from_millis(self.job_budget_ms)
    }

    /// Encodings and thumbnail bound for the renderer.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            render_format: self.render_format,
            thumbnail_format: self.thumbnail_format,
            thumbnail_max: self.thumbnail_max,
        }
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> MockupResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| MockupError::validation(format!("{key}={raw:?}: {e}"))),
    }
}

fn format_or<G>(
    get: &G,
    format_key: &str,
    quality_key: &str,
    default: OutputFormat,
) -> MockupResult<OutputFormat>
where
    G: Fn(&str) -> Option<String>,
{
    let default_quality = match default {
        OutputFormat::Jpeg { quality } => quality,
        OutputFormat::Png => 90,
    };
    let name = get(format_key).map(|v| v.trim().to_ascii_lowercase());
    match name.as_deref() {
        None if matches!(default, OutputFormat::Png) => Ok(default),
        None | Some("jpeg" | "jpg") => Ok(OutputFormat::Jpeg {
            quality: parse_or(get, quality_key, default_quality)?,
        }),
        Some("png") => Ok(OutputFormat::Png),
        Some(other) => Err(MockupError::validation(format!(
            "{format_key}={other:?}: expected jpeg or png"
        ))),
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
