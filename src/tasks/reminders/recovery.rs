use super::scheduler::{reminder_time, ReminderScheduler, ScheduleOutcome};
use crate::error::RecoveryError;
use crate::notifier::Notifier;
use crate::store::pending_assignments;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryReport {
    pub scheduled: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Re-arms reminders for every assignment whose deadline hasn't passed yet.
///
/// Timers only live in memory, so this runs once the bot is up. Assignments whose reminder
/// moment went by while the bot was down are skipped rather than sent late. If the reminder
/// channel can't be resolved, or the store can't be read, nothing is scheduled.
pub async fn recover_pending_reminders(
    pool: &SqlitePool, scheduler: &ReminderScheduler, notifier: Arc<dyn Notifier>,
    now: DateTime<Utc>,
) -> Result<RecoveryReport, RecoveryError> {
    notifier.check_destination().await?;

    let assignments = pending_assignments(pool, now).await?;
    let mut report = RecoveryReport::default();
    if assignments.is_empty() {
        tracing::info!("No upcoming assignments, no reminders to restore");
        return Ok(report);
    }

    for assignment in &assignments {
        if reminder_time(assignment.deadline) < now {
            tracing::debug!("Reminder for assignment #{} already due, skipping", assignment.id);
            report.skipped += 1;
            continue;
        }
        match scheduler.schedule_reminder(assignment, now, Arc::clone(&notifier)).await {
            Ok(ScheduleOutcome::Scheduled { .. }) => report.scheduled += 1,
            Ok(ScheduleOutcome::Skipped { .. }) => report.skipped += 1,
            Err(e) => {
                tracing::error!("Failed to restore reminder for assignment #{}: {e}", assignment.id);
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use crate::notifier::testing::RecordingNotifier;
    use crate::store::{create_assignment, memory_pool, NewAssignment};
    use crate::tasks::reminders::backend::testing::ManualBackend;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 1, 16, 0, 0).unwrap()
    }

    async fn seed(pool: &SqlitePool) {
        for (subject, offset) in [
            ("A", Duration::hours(12)),
            ("B", Duration::hours(36)),
            ("C", -Duration::hours(1)),
        ] {
            create_assignment(
                pool,
                NewAssignment {
                    subject: subject.into(),
                    deadline: now() + offset,
                    details: "fixture".into(),
                },
            )
            .await
            .unwrap();
        }
    }

    async fn restart(pool: &SqlitePool) -> (RecoveryReport, Vec<DateTime<Utc>>, Arc<ManualBackend>) {
        let backend = Arc::new(ManualBackend::default());
        let scheduler = ReminderScheduler::new(backend.clone());
        let report = recover_pending_reminders(
            pool,
            &scheduler,
            Arc::new(RecordingNotifier::default()),
            now(),
        )
        .await
        .unwrap();
        let fire_times = scheduler.pending().await.into_iter().map(|(_, at)| at).collect();
        (report, fire_times, backend)
    }

    #[tokio::test]
    async fn restores_only_reminders_still_ahead() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let (report, fire_times, backend) = restart(&pool).await;

        // A: reminder time passed; B: scheduled; C: deadline passed, not even loaded
        assert_eq!(report, RecoveryReport { scheduled: 1, skipped: 1, failed: 0 });
        assert_eq!(fire_times, vec![now() + Duration::hours(12)]);
        assert_eq!(backend.schedules().len(), 1);
    }

    #[tokio::test]
    async fn repeated_restarts_produce_the_same_fire_times() {
        let pool = memory_pool().await;
        seed(&pool).await;

        let (first_report, first, _) = restart(&pool).await;
        let (second_report, second, _) = restart(&pool).await;
        assert_eq!(first_report, second_report);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_store_is_not_an_error() {
        let pool = memory_pool().await;
        let (report, fire_times, backend) = restart(&pool).await;
        assert_eq!(report, RecoveryReport::default());
        assert!(fire_times.is_empty());
        assert!(backend.schedules().is_empty());
    }

    #[tokio::test]
    async fn unreachable_channel_aborts_the_pass() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let backend = Arc::new(ManualBackend::default());
        let scheduler = ReminderScheduler::new(backend.clone());

        let result = recover_pending_reminders(
            &pool,
            &scheduler,
            Arc::new(RecordingNotifier::unreachable()),
            now(),
        )
        .await;

        assert!(matches!(result, Err(RecoveryError::Notify(NotifyError::Unresolvable(_)))));
        assert!(backend.schedules().is_empty());
        assert!(scheduler.pending().await.is_empty());
    }

    #[tokio::test]
    async fn restored_reminder_notifies_once() {
        let pool = memory_pool().await;
        seed(&pool).await;
        let backend = Arc::new(ManualBackend::default());
        let scheduler = ReminderScheduler::new(backend.clone());
        let notifier = Arc::new(RecordingNotifier::default());

        recover_pending_reminders(&pool, &scheduler, notifier.clone(), now()).await.unwrap();
        backend.fire_all().await;
        backend.fire_all().await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("**B**"));
    }
}
