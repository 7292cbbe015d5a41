//! Job lifecycle: status reporting, the overall budget and cancellation around
//! [`MockupGenerator::generate_mockup`].

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::{
    foundation::error::{MockupError, MockupResult, Stage},
    model::job::{MockupJob, MockupStatus, MockupUrls, RetryPolicy, StatusUpdate},
    worker::generate::MockupGenerator,
};

/// Receives status changes for mockup records.
#[async_trait::async_trait]
pub trait StatusReporter: Send + Sync {
    /// Record `update` for `mockup_id`.
    async fn report(&self, mockup_id: &str, update: &StatusUpdate) -> MockupResult<()>;
}

/// Logs status changes as structured events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

#[async_trait::async_trait]
impl StatusReporter for TracingReporter {
    async fn report(&self, mockup_id: &str, update: &StatusUpdate) -> MockupResult<()> {
        let payload = serde_json::to_string(update).context("serialize status update")?;
        tracing::info!(mockup_id, status = ?update.status, %payload, "status update");
        Ok(())
    }
}

/// Keeps every update in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    updates: Mutex<Vec<(String, StatusUpdate)>>,
}

impl MemoryReporter {
    /// Empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates received so far, in order.
    pub fn updates(&self) -> Vec<(String, StatusUpdate)> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Statuses received so far, in order.
    pub fn statuses(&self) -> Vec<MockupStatus> {
        self.updates().into_iter().map(|(_, u)| u.status).collect()
    }
}

#[async_trait::async_trait]
impl StatusReporter for MemoryReporter {
    async fn report(&self, mockup_id: &str, update: &StatusUpdate) -> MockupResult<()> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((mockup_id.to_owned(), update.clone()));
        Ok(())
    }
}

/// Result of one job attempt.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobOutcome {
    /// Both artifacts stored.
    Completed {
        /// Artifact URLs.
        urls: MockupUrls,
        /// Processing time.
        processing_time_ms: u64,
    },
    /// The attempt failed and the record was marked FAILED.
    Failed {
        /// Error message reported with the FAILED status.
        error: String,
        /// Whether the failure is transient.
        retryable: bool,
        /// Delay before the next attempt; absent when the retry policy is exhausted or the
        /// failure is permanent.
        #[serde(skip_serializing_if = "Option::is_none")]
        retry_after_ms: Option<u64>,
    },
    /// The attempt was cancelled; no terminal status was reported.
    Cancelled,
}

/// Runs queue jobs through the generator and reports their status.
#[derive(Clone)]
pub struct JobRunner {
    generator: MockupGenerator,
    reporter: Arc<dyn StatusReporter>,
    budget: Duration,
    retry: RetryPolicy,
}

impl std::fmt::Debug for JobRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobRunner")
            .field("generator", &self.generator)
            .field("budget", &self.budget)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl JobRunner {
    /// Runner giving each job at most `budget`.
    pub fn new(
        generator: MockupGenerator,
        reporter: Arc<dyn StatusReporter>,
        budget: Duration,
    ) -> Self {
        Self {
            generator,
            reporter,
            budget,
            retry: RetryPolicy::default(),
        }
    }

    /// Use `retry` to compute the delay reported with retryable failures.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Parse a raw queue payload and run it.
    ///
    /// Payloads that do not parse carry no usable mockup id, so nothing is reported for them.
    pub async fn run_job_json(&self, payload: &[u8], cancel: &CancellationToken) -> JobOutcome {
        match MockupJob::from_json(payload) {
            Ok(job) => self.run_job(&job, cancel).await,
            Err(e) => {
                tracing::error!(stage = %Stage::Validate, error = %e, "rejecting job payload");
                JobOutcome::Failed {
                    error: e.to_string(),
                    retryable: false,
                    retry_after_ms: None,
                }
            }
        }
    }

    /// Run one job: PENDING -> PROCESSING -> COMPLETED or FAILED.
    #[tracing::instrument(
        skip_all,
        fields(mockup_id = %job.mockup_id, user_id = %job.user_id, attempt = job.attempt)
    )]
    pub async fn run_job(&self, job: &MockupJob, cancel: &CancellationToken) -> JobOutcome {
        let started = Instant::now();
        let mut status = MockupStatus::Pending;

        if let Err(e) = job.validate() {
            tracing::error!(stage = %Stage::Validate, error = %e, "job rejected");
            return self.fail(job, &mut status, e, started).await;
        }

        self.transition(job, &mut status, StatusUpdate::processing())
            .await;
        tracing::info!(
            logo_url = %job.logo_url,
            template_url = %job.template_url,
            "processing mockup"
        );

        let work = self.generator.generate_mockup(
            &job.logo_url,
            &job.template_url,
            &job.customizations,
        );
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            r = tokio::time::timeout(self.budget, work) => Some(r),
        };

        match result {
            None => {
                tracing::warn!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "job cancelled"
                );
                JobOutcome::Cancelled
            }
            Some(Err(_)) => {
                let e = MockupError::timeout(format!(
                    "job exceeded its {} ms budget",
                    self.budget.as_millis()
                ));
                tracing::error!(stage = %Stage::Job, error = %e, "job timed out");
                self.fail(job, &mut status, e, started).await
            }
            Some(Ok(Err(e))) => {
                tracing::error!(
                    error = %e,
                    retryable = e.is_retryable(),
                    "mockup generation failed"
                );
                self.fail(job, &mut status, e, started).await
            }
            Some(Ok(Ok(urls))) => {
                let elapsed = started.elapsed();
                self.transition(
                    job,
                    &mut status,
                    StatusUpdate::completed(urls.clone(), elapsed),
                )
                .await;
                tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    render_url = %urls.render_url,
                    "mockup completed"
                );
                JobOutcome::Completed {
                    urls,
                    processing_time_ms: elapsed.as_millis() as u64,
                }
            }
        }
    }

    async fn fail(
        &self,
        job: &MockupJob,
        status: &mut MockupStatus,
        err: MockupError,
        started: Instant,
    ) -> JobOutcome {
        let retry_after = self.retry.next_delay(&err, job.attempt);
        if let Some(delay) = retry_after {
            tracing::info!(
                attempt = job.attempt,
                delay_ms = delay.as_millis() as u64,
                "attempt may be retried"
            );
        }
        let update = StatusUpdate::failed(&err, started.elapsed()).with_retry_after(retry_after);
        self.transition(job, status, update).await;
        JobOutcome::Failed {
            error: err.to_string(),
            retryable: err.is_retryable(),
            retry_after_ms: retry_after.map(|d| d.as_millis() as u64),
        }
    }

    async fn transition(&self, job: &MockupJob, status: &mut MockupStatus, update: StatusUpdate) {
        if !status.can_transition_to(update.status) {
            tracing::error!(
                from = ?status,
                to = ?update.status,
                "illegal status transition skipped"
            );
            return;
        }
        *status = update.status;
        if let Err(e) = self.reporter.report(&job.mockup_id, &update).await {
            tracing::warn!(status = ?update.status, error = %e, "status report failed");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/worker/job.rs"]
mod tests;
