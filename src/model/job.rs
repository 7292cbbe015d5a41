use std::time::Duration;

use crate::{
    foundation::error::{MockupError, MockupResult},
    model::customizations::Customizations,
};

/// Job payload consumed from the generation queue.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupJob {
    /// Mockup record the result is attached to.
    pub mockup_id: String,
    /// Location of the uploaded logo.
    pub logo_url: String,
    /// Location of the template photograph.
    pub template_url: String,
    /// Transform and style parameters; absent means all defaults.
    #[serde(default)]
    pub customizations: Customizations,
    /// Owner of the mockup.
    pub user_id: String,
    /// 1-based attempt number assigned by the queue.
    #[serde(default = "first_attempt")]
    pub attempt: u32,
}

fn first_attempt() -> u32 {
    1
}

impl MockupJob {
    /// Parse a queue payload. Structural problems are validation errors.
    pub fn from_json(bytes: &[u8]) -> MockupResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| MockupError::validation(format!("invalid job payload: {e}")))
    }

    /// Check identifiers and customization ranges.
    pub fn validate(&self) -> MockupResult<()> {
        for (field, value) in [
            ("mockupId", &self.mockup_id),
            ("logoUrl", &self.logo_url),
            ("templateUrl", &self.template_url),
            ("userId", &self.user_id),
        ] {
            if value.trim().is_empty() {
                return Err(MockupError::validation(format!("{field} must not be empty")));
            }
        }
        if self.attempt == 0 {
            return Err(MockupError::validation("attempt must be >= 1"));
        }
        self.customizations.validate()
    }
}

/// Lifecycle of a mockup record as seen by the surrounding job system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MockupStatus {
    /// Queued, not yet picked up.
    Pending,
    /// A worker is running the pipeline.
    Processing,
    /// Both artifacts are stored and their URLs attached.
    Completed,
    /// The attempt failed; an error message is attached.
    Failed,
}

impl MockupStatus {
    /// `true` for `Completed` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Allowed edges: `PENDING -> PROCESSING -> {COMPLETED | FAILED}`, plus `PENDING -> FAILED`
    /// for jobs rejected before processing starts.
    pub fn can_transition_to(self, next: MockupStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Failed)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
        )
    }
}

/// Durable addresses of the two artifacts of a successful generation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockupUrls {
    /// Full-size render.
    pub render_url: String,
    /// Thumbnail.
    pub thumbnail_url: String,
}

/// Status change pushed back to the surrounding system.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// New status.
    pub status: MockupStatus,
    /// Set on `Completed`.
    #[serde(flatten)]
    pub urls: Option<MockupUrls>,
    /// Set on `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set on `Failed`: whether the queue may schedule another attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    /// Set on `Failed` when the retry policy allows another attempt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
    /// Wall-clock time spent processing, set on terminal updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

impl StatusUpdate {
    /// Worker picked the job up.
    pub fn processing() -> Self {
        Self {
            status: MockupStatus::Processing,
            urls: None,
            error: None,
            retryable: None,
            retry_after_ms: None,
            processing_time_ms: None,
        }
    }

    /// Both artifacts are stored.
    pub fn completed(urls: MockupUrls, elapsed: Duration) -> Self {
        Self {
            status: MockupStatus::Completed,
            urls: Some(urls),
            error: None,
            retryable: None,
            retry_after_ms: None,
            processing_time_ms: Some(elapsed.as_millis() as u64),
        }
    }

    /// The attempt failed with `err`.
    pub fn failed(err: &MockupError, elapsed: Duration) -> Self {
        Self {
            status: MockupStatus::Failed,
            urls: None,
            error: Some(err.to_string()),
            retryable: Some(err.is_retryable()),
            retry_after_ms: None,
            processing_time_ms: Some(elapsed.as_millis() as u64),
        }
    }

    /// Attach the delay before the next attempt.
    pub fn with_retry_after(mut self, delay: Option<Duration>) -> Self {
        self.retry_after_ms = delay.map(|d| d.as_millis() as u64);
        self
    }
}

/// Backoff schedule the external queue applies between whole-pipeline attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first.
    pub attempts: u32,
    /// Delay before the second attempt, in milliseconds.
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before attempt `attempt` (1-based), or `None` once attempts are exhausted.
    ///
    /// The first attempt has no delay; attempt `n > 1` waits `base * 2^(n - 2)`.
    pub fn delay_before(self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.attempts {
            return None;
        }
        if attempt == 1 {
            return Some(Duration::ZERO);
        }
        let factor = 1u64.checked_shl(attempt - 2).unwrap_or(u64::MAX);
        Some(Duration::from_millis(
            self.base_delay_ms.saturating_mul(factor),
        ))
    }

    /// Whether a failed attempt `attempt` should be followed by another one.
    pub fn should_retry(self, err: &MockupError, attempt: u32) -> bool {
        err.is_retryable() && attempt < self.attempts
    }

    /// Delay before the attempt following a failed `attempt`, if there is one.
    pub fn next_delay(self, err: &MockupError, attempt: u32) -> Option<Duration> {
        if !self.should_retry(err, attempt) {
            return None;
        }
        self.delay_before(attempt + 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/job.rs"]
mod tests;
