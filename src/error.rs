use poise::serenity_prelude::{self as serenity, ChannelId};
use thiserror::Error;
use tokio_cron_scheduler::JobSchedulerError;

/// Rejections shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid date format. Please use YYYY-MM-DD.")]
    MalformedDate,
    #[error("The deadline cannot be in the past.")]
    DeadlineInPast,
    #[error("The subject cannot be empty.")]
    EmptySubject,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification channel {0} could not be resolved")]
    Unresolvable(ChannelId),
    #[error("failed to deliver notification: {0}")]
    Discord(#[from] serenity::Error),
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid reminder schedule: {0}")]
    InvalidSchedule(String),
    #[error("scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),
}

/// Reasons a startup recovery pass gives up without scheduling anything.
#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("could not load pending assignments: {0}")]
    Store(#[from] StoreError),
    #[error("reminder destination unavailable: {0}")]
    Notify(#[from] NotifyError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: `{value}`")]
    Invalid { var: &'static str, value: String },
}
