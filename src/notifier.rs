use crate::deadline::format_remaining;
use crate::error::NotifyError;
use crate::store::Assignment;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poise::serenity_prelude::{ChannelId, Http};
use std::sync::Arc;

/// Where announcements and reminders end up.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, content: String) -> Result<(), NotifyError>;

    /// Fails when the destination can't be resolved at all.
    async fn check_destination(&self) -> Result<(), NotifyError>;
}

pub struct ChannelNotifier {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl ChannelNotifier {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        ChannelNotifier { http, channel_id }
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn send(&self, content: String) -> Result<(), NotifyError> {
        self.channel_id.say(&*self.http, content).await?;
        Ok(())
    }

    async fn check_destination(&self) -> Result<(), NotifyError> {
        let channel = self.channel_id.to_channel(&*self.http).await.map_err(|e| {
            tracing::warn!("failed to fetch channel {}: {e}", self.channel_id);
            NotifyError::Unresolvable(self.channel_id)
        })?;
        if channel.guild().is_none() {
            return Err(NotifyError::Unresolvable(self.channel_id));
        }
        Ok(())
    }
}

pub fn announcement_text(assignment: &Assignment, now: DateTime<Utc>) -> String {
    format!(
        "📚 **New assignment: {0}**\nDeadline: <t:{1}:F> (<t:{1}:R>)\nTime remaining: {2}\nDetails: {3}",
        assignment.subject,
        assignment.deadline.timestamp(),
        format_remaining(assignment.deadline, now),
        assignment.details
    )
}

pub fn reminder_text(assignment: &Assignment) -> String {
    format!(
        "⏰ **Reminder:** the assignment for **{0}** is due tomorrow, <t:{1}:F>.\nDetails: {2}",
        assignment.subject,
        assignment.deadline.timestamp(),
        assignment.details
    )
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Keeps every message instead of sending it.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<String>>,
        pub unreachable: bool,
    }

    impl RecordingNotifier {
        pub fn unreachable() -> Self {
            RecordingNotifier { unreachable: true, ..Default::default() }
        }

        pub fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, content: String) -> Result<(), NotifyError> {
            if self.unreachable {
                return Err(NotifyError::Unresolvable(ChannelId::new(1)));
            }
            self.sent.lock().unwrap().push(content);
            Ok(())
        }

        async fn check_destination(&self) -> Result<(), NotifyError> {
            if self.unreachable {
                return Err(NotifyError::Unresolvable(ChannelId::new(1)));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn messages_mention_subject_deadline_and_details() {
        let deadline = Utc.with_ymd_and_hms(2024, 12, 3, 6, 30, 0).unwrap();
        let assignment = Assignment {
            id: 7,
            subject: "Physics".into(),
            deadline,
            details: "Lab report".into(),
            created_at: deadline,
        };
        let now = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();

        let announcement = announcement_text(&assignment, now);
        assert!(announcement.contains("Physics"));
        assert!(announcement.contains(&format!("<t:{}:F>", deadline.timestamp())));
        assert!(announcement.contains("2 day(s), 6 hour(s), 30 minute(s)"));
        assert!(announcement.contains("Lab report"));

        let reminder = reminder_text(&assignment);
        assert!(reminder.contains("**Physics** is due tomorrow"));
        assert!(reminder.contains("Lab report"));
    }
}
