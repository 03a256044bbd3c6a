use crate::deadline::format_remaining;
use crate::store::{pending_assignments, Assignment};
use crate::util::{into_pages, paginate, send_ephemeral_text, GENERIC_FAILURE};
use crate::{Context, Error};
use chrono::{DateTime, Utc};

const PAGE_ITEMS: usize = 8;

fn list_entry(assignment: &Assignment, now: DateTime<Utc>) -> String {
    format!(
        "**{0}** · <t:{1}:F> · {2} left\n> {3}",
        assignment.subject,
        assignment.deadline.timestamp(),
        format_remaining(assignment.deadline, now),
        assignment.details
    )
}

/// Shows every assignment that isn't due yet
#[poise::command(slash_command, rename = "assignments", guild_only)]
pub async fn assignment_list(
    ctx: Context<'_>, #[description = "The page to start on"] start_page: Option<usize>,
) -> Result<(), Error> {
    let now = Utc::now();
    let assignments = match pending_assignments(&ctx.data().pool, now).await {
        Ok(assignments) => assignments,
        Err(e) => {
            tracing::error!("Failed to load assignments: {e}");
            return send_ephemeral_text(ctx, GENERIC_FAILURE).await;
        }
    };
    if assignments.is_empty() {
        return send_ephemeral_text(ctx, "No upcoming assignments.").await;
    }

    let entries = assignments.iter().map(|a| list_entry(a, now)).collect();
    paginate(
        ctx,
        into_pages(entries, PAGE_ITEMS),
        "Upcoming assignments".to_string(),
        start_page.unwrap_or(1).saturating_sub(1),
    )
    .await
}
