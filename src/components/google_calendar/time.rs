use crate::error::{google_calendar_error, CalendarResult};
use crate::utils::time::start_of_day;
use chrono::{DateTime, Local, NaiveDate};
use super::models::EventDateTime;

/// Resolve an event start into a local timestamp and an all-day flag
pub fn parse_event_start(start: &EventDateTime) -> CalendarResult<(DateTime<Local>, bool)> {
    if let Some(date_time) = &start.date_time {
        let dt = DateTime::parse_from_rfc3339(date_time)
            .map_err(|e| google_calendar_error(&format!("Failed to parse datetime: {}", e)))?;
        Ok((dt.with_timezone(&Local), false))
    } else if let Some(date) = &start.date {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| google_calendar_error(&format!("Failed to parse date: {}", e)))?;
        Ok((start_of_day(date)?, true))
    } else {
        Err(google_calendar_error("Event has no start time"))
    }
}
