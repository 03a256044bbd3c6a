use crate::deadline::{normalize_details, validate_subject, DeadlineRules};
use crate::error::ValidationError;
use crate::notifier::{announcement_text, Notifier};
use crate::store::{create_assignment, NewAssignment};
use crate::tasks::reminders::scheduler::ReminderScheduler;
use crate::util::{send_ephemeral_text, GENERIC_FAILURE};
use crate::{Context, Error};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

fn validate_input(
    rules: &DeadlineRules, subject: &str, deadline: &str, details: Option<String>,
    now: DateTime<Utc>,
) -> Result<NewAssignment, ValidationError> {
    Ok(NewAssignment {
        subject: validate_subject(subject)?,
        deadline: rules.validate_deadline(deadline, now)?,
        details: normalize_details(details),
    })
}

/// Validates, stores, schedules the reminder and announces; returns the text to reply with.
///
/// A failed store write stops before anything is scheduled. A failed schedule is only logged.
pub(crate) async fn register_assignment(
    pool: &SqlitePool, rules: &DeadlineRules, scheduler: &ReminderScheduler,
    notifier: Arc<dyn Notifier>, subject: &str, deadline: &str, details: Option<String>,
    now: DateTime<Utc>,
) -> String {
    let new = match validate_input(rules, subject, deadline, details, now) {
        Ok(new) => new,
        Err(rejection) => return rejection.to_string(),
    };

    let assignment = match create_assignment(pool, new).await {
        Ok(assignment) => assignment,
        Err(e) => {
            tracing::error!("Failed to save assignment: {e}");
            return GENERIC_FAILURE.to_string();
        }
    };

    if let Err(e) = scheduler.schedule_reminder(&assignment, now, Arc::clone(&notifier)).await {
        tracing::error!("Failed to schedule reminder for assignment #{}: {e}", assignment.id);
    }

    if let Err(e) = notifier.send(announcement_text(&assignment, now)).await {
        tracing::error!("Failed to announce assignment #{}: {e}", assignment.id);
        return GENERIC_FAILURE.to_string();
    }

    format!("Assignment for **{}** saved and announced!", assignment.subject)
}

/// Register an assignment and get reminded a day before it's due
///
/// /setassignment <subject> <deadline YYYY-MM-DD> [details]
#[poise::command(slash_command, rename = "setassignment", guild_only)]
pub async fn set_assignment(
    ctx: Context<'_>, #[description = "Subject of the assignment"] subject: String,
    #[description = "Deadline (YYYY-MM-DD)"] deadline: String,
    #[description = "Details of the assignment"] details: Option<String>,
) -> Result<(), Error> {
    let data = ctx.data();
    let reply = register_assignment(
        &data.pool,
        &data.deadline_rules,
        &data.scheduler,
        Arc::clone(&data.notifier),
        &subject,
        &deadline,
        details,
        Utc::now(),
    )
    .await;
    send_ephemeral_text(ctx, &reply).await
}
