use super::scheduler::{CronSchedule, OneShotReminder};
use crate::error::ScheduleError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

/// Something that can run a reminder when the wall clock matches a schedule.
#[async_trait]
pub trait TimerBackend: Send + Sync {
    async fn register(
        &self, schedule: CronSchedule, reminder: Arc<OneShotReminder>,
    ) -> Result<Uuid, ScheduleError>;
}

/// In-memory cron jobs, evaluated in UTC. Everything registered here is lost on restart.
pub struct CronBackend {
    scheduler: JobScheduler,
}

impl CronBackend {
    pub async fn start() -> Result<Self, ScheduleError> {
        let scheduler = JobScheduler::new().await?;
        scheduler.start().await?;
        Ok(CronBackend { scheduler })
    }
}

#[async_trait]
impl TimerBackend for CronBackend {
    async fn register(
        &self, schedule: CronSchedule, reminder: Arc<OneShotReminder>,
    ) -> Result<Uuid, ScheduleError> {
        let expression = schedule.job_expression();
        // cron repeats every year, so the job drops itself after the run that actually fires
        let job = Job::new_async(expression.as_str(), move |uuid, scheduler| {
            let reminder = Arc::clone(&reminder);
            Box::pin(run_reminder_job(reminder, uuid, scheduler, Utc::now()))
        })
        .map_err(|e| ScheduleError::InvalidSchedule(format!("`{expression}`: {e:?}")))?;

        Ok(self.scheduler.add(job).await?)
    }
}

async fn run_reminder_job(
    reminder: Arc<OneShotReminder>, job_id: Uuid, scheduler: JobScheduler, now: DateTime<Utc>,
) {
    if !reminder.is_due(now) {
        tracing::debug!(
            "Reminder job {job_id} ticked early, waiting for {}",
            reminder.fire_at()
        );
        return;
    }
    reminder.fire().await;
    if let Err(e) = scheduler.remove(&job_id).await {
        tracing::warn!("Failed to remove finished reminder job {job_id}: {e:?}");
    }
}
