use super::backend::TimerBackend;
use crate::error::ScheduleError;
use crate::notifier::{reminder_text, Notifier};
use crate::store::Assignment;
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Reminders go out one day ahead of the deadline.
pub fn reminder_time(deadline: DateTime<Utc>) -> DateTime<Utc> {
    deadline - Duration::days(1)
}

/// Calendar fields of a fire instant in UTC, day of week left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CronSchedule {
    pub minute: u32,
    pub hour: u32,
    pub day: u32,
    pub month: u32,
}

impl CronSchedule {
    pub fn at(instant: DateTime<Utc>) -> Self {
        CronSchedule {
            minute: instant.minute(),
            hour: instant.hour(),
            day: instant.day(),
            month: instant.month(),
        }
    }

    /// Same fields with a leading seconds column, as tokio-cron-scheduler reads them.
    pub fn job_expression(&self) -> String {
        format!("0 {self}")
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {} *", self.minute, self.hour, self.day, self.month)
    }
}

/// A reminder that sends at most once no matter how often its timer goes off.
pub struct OneShotReminder {
    assignment: Assignment,
    fire_at: DateTime<Utc>,
    notifier: Arc<dyn Notifier>,
    fired: AtomicBool,
}

impl OneShotReminder {
    pub fn new(assignment: Assignment, notifier: Arc<dyn Notifier>) -> Self {
        OneShotReminder {
            fire_at: reminder_time(assignment.deadline),
            assignment,
            notifier,
            fired: AtomicBool::new(false),
        }
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn fire_at(&self) -> DateTime<Utc> {
        self.fire_at
    }

    /// Cron fields carry no year, so a timer can match a year (or more) early. Those ticks
    /// must be ignored; the minute of slack covers the seconds cron drops.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.fire_at - Duration::minutes(1)
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Returns whether this call was the one that fired.
    pub async fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        let content = reminder_text(&self.assignment);
        match self.notifier.send(content).await {
            Ok(()) => tracing::info!(
                "Sent reminder for assignment #{} ({})",
                self.assignment.id,
                self.assignment.subject
            ),
            Err(e) => tracing::error!(
                "Failed to send reminder for assignment #{}: {e}",
                self.assignment.id
            ),
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Scheduled { job_id: Uuid, fire_at: DateTime<Utc> },
    /// The reminder window had already passed.
    Skipped { fire_at: DateTime<Utc> },
}

pub struct ReminderScheduler {
    backend: Arc<dyn TimerBackend>,
    // keyed by backend job id
    registry: Mutex<HashMap<Uuid, Arc<OneShotReminder>>>,
}

impl ReminderScheduler {
    pub fn new(backend: Arc<dyn TimerBackend>) -> Self {
        ReminderScheduler { backend, registry: Mutex::new(HashMap::new()) }
    }

    /// Arms a one-shot reminder a day before `assignment.deadline`.
    ///
    /// Nothing is registered when that moment is not strictly after `now`. Every call registers
    /// a fresh timer; there is no deduplication against earlier calls for the same assignment.
    pub async fn schedule_reminder(
        &self, assignment: &Assignment, now: DateTime<Utc>, notifier: Arc<dyn Notifier>,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        let fire_at = reminder_time(assignment.deadline);
        if fire_at <= now {
            tracing::info!(
                "Not scheduling a reminder for assignment #{}: deadline is less than a day away",
                assignment.id
            );
            return Ok(ScheduleOutcome::Skipped { fire_at });
        }

        let schedule = CronSchedule::at(fire_at);
        let reminder = Arc::new(OneShotReminder::new(assignment.clone(), notifier));
        let job_id = self.backend.register(schedule, Arc::clone(&reminder)).await?;

        let mut registry = self.registry.lock().await;
        registry.retain(|_, reminder| !reminder.has_fired());
        registry.insert(job_id, reminder);
        tracing::info!(
            "Scheduled reminder for assignment #{} at {fire_at} (`{schedule}`)",
            assignment.id
        );
        Ok(ScheduleOutcome::Scheduled { job_id, fire_at })
    }

    /// `(assignment id, fire instant)` of every reminder that hasn't gone off yet, soonest first.
    pub async fn pending(&self) -> Vec<(i64, DateTime<Utc>)> {
        let registry = self.registry.lock().await;
        let mut pending: Vec<_> = registry
            .values()
            .filter(|reminder| !reminder.has_fired())
            .map(|reminder| (reminder.assignment().id, reminder.fire_at()))
            .collect();
        pending.sort_by_key(|&(id, fire_at)| (fire_at, id));
        pending
    }
}
