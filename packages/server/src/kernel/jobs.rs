//! In-process background jobs.
//!
//! Report work (calling the scraping pipeline, syncing, re-analysing) must not
//! hold an HTTP request open. Handlers enqueue a [`Job`]; the [`JobRunner`]
//! drains the channel and executes jobs through a [`JobHandler`] with bounded
//! concurrency.
//!
//! ```text
//! route handler
//!     │
//!     └─► JobQueue::enqueue(Job)
//!             └─► mpsc channel
//!
//! JobRunner
//!     │
//!     ├─► recv job
//!     ├─► acquire semaphore permit
//!     └─► spawn JobHandler::handle(job), log failures
//! ```
//!
//! Jobs are not persisted. A restart loses queued work; the scheduled sync
//! picks stale reports up again.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info};

use crate::common::{CompanyId, ReportId};

/// Default number of jobs executed at the same time.
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Job {
    /// First scrape of a freshly created report
    ProcessReport {
        report_id: ReportId,
        company_id: CompanyId,
    },
    /// Pull new reviews for an existing report
    SyncReport { report_id: ReportId },
    /// Recompute the analysis from stored reviews
    AnalyzeReport { report_id: ReportId },
}

impl Job {
    pub fn kind(&self) -> &'static str {
        match self {
            Job::ProcessReport { .. } => "process_report",
            Job::SyncReport { .. } => "sync_report",
            Job::AnalyzeReport { .. } => "analyze_report",
        }
    }

    pub fn report_id(&self) -> ReportId {
        match self {
            Job::ProcessReport { report_id, .. }
            | Job::SyncReport { report_id }
            | Job::AnalyzeReport { report_id } => *report_id,
        }
    }
}

#[async_trait]
pub trait JobQueue: Send + Sync {
    async fn enqueue(&self, job: Job) -> Result<()>;
}

#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn handle(&self, job: Job) -> Result<()>;
}

// =============================================================================
// Channel queue
// =============================================================================

#[derive(Clone)]
pub struct ChannelJobQueue {
    sender: mpsc::UnboundedSender<Job>,
}

impl ChannelJobQueue {
    /// Create a queue and the receiving end to hand to a [`JobRunner`].
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Job>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl JobQueue for ChannelJobQueue {
    async fn enqueue(&self, job: Job) -> Result<()> {
        debug!(job = job.kind(), report_id = %job.report_id(), "Enqueueing job");
        self.sender
            .send(job)
            .map_err(|e| anyhow!("job runner is not running, dropped {}", e.0.kind()))
    }
}

// =============================================================================
// Runner
// =============================================================================

pub struct JobRunner {
    receiver: mpsc::UnboundedReceiver<Job>,
    handler: Arc<dyn JobHandler>,
    permits: Arc<Semaphore>,
}

impl JobRunner {
    pub fn new(receiver: mpsc::UnboundedReceiver<Job>, handler: Arc<dyn JobHandler>) -> Self {
        Self::with_concurrency(receiver, handler, DEFAULT_CONCURRENCY)
    }

    pub fn with_concurrency(
        receiver: mpsc::UnboundedReceiver<Job>,
        handler: Arc<dyn JobHandler>,
        concurrency: usize,
    ) -> Self {
        Self {
            receiver,
            handler,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Run until every queue handle has been dropped, then wait for in-flight
    /// jobs to finish.
    pub async fn run(mut self) {
        info!("Job runner started");

        let mut in_flight = tokio::task::JoinSet::new();

        while let Some(job) = self.receiver.recv().await {
            let permit = match self.permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let handler = self.handler.clone();

            in_flight.spawn(async move {
                let kind = job.kind();
                let report_id = job.report_id();
                debug!(job = kind, report_id = %report_id, "Running job");

                if let Err(e) = handler.handle(job).await {
                    error!(job = kind, report_id = %report_id, error = %e, "Job failed");
                }
                drop(permit);
            });

            // Reap finished tasks so the set does not grow unbounded
            while in_flight.try_join_next().is_some() {}
        }

        while in_flight.join_next().await.is_some() {}
        info!("Job runner stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHandler {
        seen: Mutex<Vec<Job>>,
    }

    #[async_trait]
    impl JobHandler for RecordingHandler {
        async fn handle(&self, job: Job) -> Result<()> {
            let fail = matches!(job, Job::AnalyzeReport { .. });
            self.seen.lock().unwrap().push(job);
            if fail {
                return Err(anyhow!("boom"));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn runner_executes_every_job_and_survives_failures() {
        let (queue, receiver) = ChannelJobQueue::new();
        let handler = Arc::new(RecordingHandler::default());
        let runner = JobRunner::with_concurrency(receiver, handler.clone(), 2);

        let report_id = ReportId::new();
        queue.enqueue(Job::AnalyzeReport { report_id }).await.unwrap();
        queue.enqueue(Job::SyncReport { report_id }).await.unwrap();
        drop(queue);

        runner.run().await;

        let seen = handler.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&Job::SyncReport { report_id }));
    }

    #[tokio::test]
    async fn enqueue_fails_once_runner_is_gone() {
        let (queue, receiver) = ChannelJobQueue::new();
        drop(receiver);

        let result = queue
            .enqueue(Job::SyncReport {
                report_id: ReportId::new(),
            })
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn jobs_serialize_with_type_tag() {
        let report_id = ReportId::new();
        let value = serde_json::to_value(Job::SyncReport { report_id }).unwrap();
        assert_eq!(value["type"], "sync_report");
        assert_eq!(value["report_id"], report_id.to_string());
    }
}
