use crate::error::ValidationError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;

pub const DEFAULT_DEADLINE_TIME: NaiveTime = match NaiveTime::from_hms_opt(16, 0, 0) {
    Some(time) => time,
    None => NaiveTime::MIN,
};
pub const DETAILS_PLACEHOLDER: &str = "No details provided.";

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// How a `YYYY-MM-DD` deadline is turned into an instant.
pub struct DeadlineRules {
    /// YYYY-MM-DD, nothing else
    calendar_date: Regex,
    time_of_day: NaiveTime,
}

impl DeadlineRules {
    pub fn new(time_of_day: NaiveTime) -> Result<Self, regex::Error> {
        Ok(DeadlineRules {
            calendar_date: Regex::new(r"^\d{4}-\d{2}-\d{2}$")?,
            time_of_day,
        })
    }

    /// Parses `raw` and pins it to the configured time of day in UTC.
    ///
    /// Rejects anything that isn't exactly `YYYY-MM-DD` (including impossible dates such as
    /// `2024-13-01`) and deadlines that land strictly before `now`.
    pub fn validate_deadline(
        &self, raw: &str, now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, ValidationError> {
        if !self.calendar_date.is_match(raw) {
            return Err(ValidationError::MalformedDate);
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ValidationError::MalformedDate)?;
        let deadline = date.and_time(self.time_of_day).and_utc();
        if deadline < now {
            return Err(ValidationError::DeadlineInPast);
        }
        Ok(deadline)
    }
}

pub fn validate_subject(raw: &str) -> Result<String, ValidationError> {
    let subject = raw.trim();
    if subject.is_empty() {
        return Err(ValidationError::EmptySubject);
    }
    Ok(subject.to_string())
}

pub fn normalize_details(raw: Option<String>) -> String {
    match raw {
        Some(details) if !details.trim().is_empty() => details.trim().to_string(),
        _ => DETAILS_PLACEHOLDER.to_string(),
    }
}

/// "2 day(s), 6 hour(s), 30 minute(s)"
///
/// Days are floored over the whole delta, hours and minutes over the truncated remainder, so a
/// deadline that already passed comes out with negative components.
pub fn format_remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = (deadline - now).num_milliseconds();
    let days = delta.div_euclid(MS_PER_DAY);
    let hours = (delta % MS_PER_DAY).div_euclid(MS_PER_HOUR);
    let minutes = (delta % MS_PER_HOUR).div_euclid(MS_PER_MINUTE);
    format!("{days} day(s), {hours} hour(s), {minutes} minute(s)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, TimeZone, Timelike};

    fn rules() -> DeadlineRules {
        DeadlineRules::new(DEFAULT_DEADLINE_TIME).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn accepts_future_date_and_keeps_calendar_day() {
        let now = at(2024, 12, 1, 0, 0);
        let deadline = rules().validate_deadline("2024-12-15", now).unwrap();
        assert_eq!((deadline.year(), deadline.month(), deadline.day()), (2024, 12, 15));
        assert_eq!((deadline.hour(), deadline.minute()), (16, 0));
    }

    #[test]
    fn same_day_deadline_is_valid_until_the_deadline_time() {
        let rules = rules();
        assert!(rules.validate_deadline("2024-12-01", at(2024, 12, 1, 16, 0)).is_ok());
        assert_eq!(
            rules.validate_deadline("2024-12-01", at(2024, 12, 1, 16, 1)),
            Err(ValidationError::DeadlineInPast)
        );
    }

    #[test]
    fn rejects_anything_but_iso_calendar_dates() {
        let now = at(2024, 12, 1, 0, 0);
        let rules = rules();
        for raw in ["2024-13-01", "12/15/2024", "", "2024-1-15", "2024-02-30", " 2024-12-15", "2024-12-15 16:00"] {
            assert_eq!(
                rules.validate_deadline(raw, now),
                Err(ValidationError::MalformedDate),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_past_deadlines() {
        let now = at(2024, 12, 1, 0, 0);
        assert_eq!(
            rules().validate_deadline("2024-11-30", now),
            Err(ValidationError::DeadlineInPast)
        );
    }

    #[test]
    fn uses_configured_time_of_day() {
        let rules = DeadlineRules::new(NaiveTime::from_hms_opt(20, 10, 0).unwrap()).unwrap();
        let deadline = rules.validate_deadline("2024-12-15", at(2024, 12, 1, 0, 0)).unwrap();
        assert_eq!(deadline, at(2024, 12, 15, 20, 10));
    }

    #[test]
    fn formats_remaining_time_exactly() {
        let now = at(2024, 12, 1, 0, 0);
        let deadline = at(2024, 12, 3, 6, 30);
        assert_eq!(format_remaining(deadline, now), "2 day(s), 6 hour(s), 30 minute(s)");
        assert_eq!(
            format_remaining(now + Duration::seconds(59), now),
            "0 day(s), 0 hour(s), 0 minute(s)"
        );
    }

    #[test]
    fn negative_remaining_time_keeps_floored_components() {
        let now = at(2024, 12, 1, 12, 0);
        let deadline = now - Duration::minutes(90);
        assert_eq!(format_remaining(deadline, now), "-1 day(s), -2 hour(s), -30 minute(s)");
    }

    #[test]
    fn subject_and_details_are_normalized() {
        assert_eq!(validate_subject("  Math  "), Ok("Math".to_string()));
        assert_eq!(validate_subject("   "), Err(ValidationError::EmptySubject));
        assert_eq!(normalize_details(None), DETAILS_PLACEHOLDER);
        assert_eq!(normalize_details(Some(" ".into())), DETAILS_PLACEHOLDER);
        assert_eq!(normalize_details(Some("Chapter 4".into())), "Chapter 4");
    }
}
