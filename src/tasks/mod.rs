use crate::Data;
use chrono::Utc;
use reminders::recovery::recover_pending_reminders;
use std::sync::Arc;

pub mod reminders;

/// Startup work that needs both the store and a live Discord connection.
pub async fn task_handler(data: Arc<Data>) {
    match recover_pending_reminders(&data.pool, &data.scheduler, Arc::clone(&data.notifier), Utc::now())
        .await
    {
        Ok(report) => tracing::info!(
            "Restored reminders: {} scheduled, {} skipped, {} failed",
            report.scheduled,
            report.skipped,
            report.failed
        ),
        Err(e) => tracing::error!("Reminder recovery aborted: {e}"),
    }
    if let Some((id, fire_at)) = data.scheduler.pending().await.first() {
        tracing::info!("Next reminder: assignment #{id} at {fire_at}");
    }
}
