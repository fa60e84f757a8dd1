//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! Scheduled tasks never do report work themselves; they enqueue jobs.
//!
//! ```text
//! Scheduler (SYNC_CRON, daily by default)
//!     │
//!     └─► VocReport::find_stale()
//!             ├─► never completed (job lost) → enqueue Job::ProcessReport
//!             └─► completed                  → enqueue Job::SyncReport
//!
//! Scheduler (hourly)
//!     │
//!     └─► UserSession::delete_expired()
//! ```

use anyhow::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use super::{Job, JobQueue};
use crate::domains::auth::UserSession;
use crate::domains::reports::models::VocReport;
use sqlx::PgPool;

/// Start all scheduled tasks
pub async fn start_scheduler(
    pool: PgPool,
    jobs: Arc<dyn JobQueue>,
    cron: &str,
    stale_after_hours: i64,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sync_pool = pool.clone();
    let sync_job = CronJob::new_async(cron, move |_uuid, _lock| {
        let pool = sync_pool.clone();
        let jobs = jobs.clone();
        Box::pin(async move {
            if let Err(e) = run_stale_report_sync(&pool, jobs.as_ref(), stale_after_hours).await {
                tracing::error!("Scheduled report sync failed: {}", e);
            }
        })
    })?;

    scheduler.add(sync_job).await?;

    let cleanup_job = CronJob::new_async("0 0 * * * *", move |_uuid, _lock| {
        let pool = pool.clone();
        Box::pin(async move {
            match UserSession::delete_expired(&pool).await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Expired sessions removed"),
                Err(e) => tracing::error!("Session cleanup failed: {}", e),
            }
        })
    })?;

    scheduler.add(cleanup_job).await?;
    scheduler.start().await?;

    tracing::info!(
        cron = %cron,
        stale_after_hours,
        "Scheduled tasks started (stale report sync, hourly session cleanup)"
    );
    Ok(scheduler)
}

/// Enqueue work for every report not updated within `stale_after_hours`.
/// Completed reports get a sync; reports that never completed get their
/// initial scrape again. Returns how many were queued.
pub async fn run_stale_report_sync(
    pool: &PgPool,
    jobs: &dyn JobQueue,
    stale_after_hours: i64,
) -> Result<usize> {
    let cutoff = Utc::now() - Duration::hours(stale_after_hours);
    let reports = VocReport::find_stale(cutoff, pool).await?;

    if reports.is_empty() {
        tracing::info!("No stale reports to sync");
        return Ok(0);
    }

    let mut queued = 0;
    for report in reports {
        let job = match report.completed_at {
            Some(_) => Job::SyncReport {
                report_id: report.id,
            },
            None => Job::ProcessReport {
                report_id: report.id,
                company_id: report.company_id,
            },
        };
        match jobs.enqueue(job).await {
            Ok(()) => {
                queued += 1;
                tracing::info!(report_id = %report.id, business = %report.business_name, status = %report.status, "Queued scheduled sync");
            }
            Err(e) => tracing::warn!(report_id = %report.id, error = %e, "Failed to queue sync"),
        }
    }

    Ok(queued)
}
