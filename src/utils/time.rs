use crate::error::{other_error, CalendarResult};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike};

/// Resolve a naive local time, taking the earlier instant when DST makes it ambiguous
pub fn to_local(naive: NaiveDateTime) -> CalendarResult<DateTime<Local>> {
    match Local.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => Ok(dt),
        chrono::LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        chrono::LocalResult::None => Err(other_error(&format!("Invalid local time: {}", naive))),
    }
}

/// Local midnight at the start of `date`
pub fn start_of_day(date: NaiveDate) -> CalendarResult<DateTime<Local>> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| other_error("Failed to create datetime"))?;
    to_local(naive)
}

/// Start of the current hour, so meetings that began this hour still show up
pub fn top_of_hour(now: &DateTime<Local>) -> CalendarResult<DateTime<Local>> {
    let naive = now
        .date_naive()
        .and_hms_opt(now.hour(), 0, 0)
        .ok_or_else(|| other_error("Failed to create datetime"))?;
    to_local(naive)
}

/// 23:59:59 on the same day as `now`
pub fn end_of_day(now: &DateTime<Local>) -> CalendarResult<DateTime<Local>> {
    let naive = now
        .date_naive()
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| other_error("Failed to create datetime"))?;
    to_local(naive)
}

/// Midnight at the start of tomorrow
pub fn start_of_tomorrow(now: &DateTime<Local>) -> CalendarResult<DateTime<Local>> {
    let tomorrow = now
        .date_naive()
        .succ_opt()
        .ok_or_else(|| other_error("Date out of range"))?;
    start_of_day(tomorrow)
}

/// Human-readable countdown until an event, `None` once it has started
pub fn format_countdown(until: Duration) -> Option<String> {
    if until < Duration::zero() {
        return None;
    }

    let days = until.num_days();
    let hours = until.num_hours() % 24;
    let minutes = until.num_minutes() % 60;

    let text = if days > 0 {
        if days == 1 {
            "in 1 day".to_string()
        } else {
            format!("in {} days", days)
        }
    } else if hours > 0 {
        if hours == 1 {
            if minutes > 0 {
                format!("in 1 hr {} min", minutes)
            } else {
                "in 1 hour".to_string()
            }
        } else {
            format!("in {} hours", hours)
        }
    } else if minutes > 0 {
        if minutes == 1 {
            "in 1 minute".to_string()
        } else {
            format!("in {} minutes", minutes)
        }
    } else {
        "starting now".to_string()
    };

    Some(text)
}

/// Greeting for the hour of day
pub fn greeting(now: &DateTime<Local>) -> &'static str {
    match now.hour() {
        0..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_countdown_boundaries() {
        assert_eq!(
            format_countdown(Duration::minutes(59) + Duration::seconds(59)).as_deref(),
            Some("in 59 minutes")
        );
        assert_eq!(format_countdown(Duration::hours(1)).as_deref(), Some("in 1 hour"));
        assert_eq!(
            format_countdown(Duration::hours(1) + Duration::minutes(5)).as_deref(),
            Some("in 1 hr 5 min")
        );
        assert_eq!(format_countdown(Duration::seconds(-1)), None);
        assert_eq!(format_countdown(Duration::zero()).as_deref(), Some("starting now"));
    }

    #[test]
    fn test_format_countdown_units() {
        assert_eq!(format_countdown(Duration::seconds(59)).as_deref(), Some("starting now"));
        assert_eq!(format_countdown(Duration::minutes(1)).as_deref(), Some("in 1 minute"));
        assert_eq!(
            format_countdown(Duration::hours(3) + Duration::minutes(40)).as_deref(),
            Some("in 3 hours")
        );
        assert_eq!(format_countdown(Duration::hours(24)).as_deref(), Some("in 1 day"));
        assert_eq!(
            format_countdown(Duration::days(3) + Duration::hours(5)).as_deref(),
            Some("in 3 days")
        );
    }

    #[test]
    fn test_window_helpers() {
        let now = Local.with_ymd_and_hms(2023, 1, 4, 10, 42, 17).unwrap();

        let start = top_of_hour(&now).unwrap();
        assert_eq!(start.format("%Y-%m-%d %H:%M:%S").to_string(), "2023-01-04 10:00:00");

        let end = end_of_day(&now).unwrap();
        assert_eq!(end.format("%Y-%m-%d %H:%M:%S").to_string(), "2023-01-04 23:59:59");

        let tomorrow = start_of_tomorrow(&now).unwrap();
        assert_eq!(
            tomorrow.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2023-01-05 00:00:00"
        );
    }

    #[test]
    fn test_greeting() {
        let morning = Local.with_ymd_and_hms(2023, 1, 4, 8, 0, 0).unwrap();
        let afternoon = Local.with_ymd_and_hms(2023, 1, 4, 12, 0, 0).unwrap();
        let evening = Local.with_ymd_and_hms(2023, 1, 4, 17, 0, 0).unwrap();
        assert_eq!(greeting(&morning), "Good morning");
        assert_eq!(greeting(&afternoon), "Good afternoon");
        assert_eq!(greeting(&evening), "Good evening");
    }
}
