use crate::components::{CalendarProvider, Event};
use crate::error::{other_error, CalendarResult};
use crate::utils::time::to_local;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveTime};

/// Sample calendar for screenshots and trying the dashboard without credentials
pub struct DemoCalendar {
    upcoming: Vec<Event>,
}

impl DemoCalendar {
    pub fn new(now: DateTime<Local>) -> CalendarResult<Self> {
        Ok(Self {
            upcoming: demo_events(now)?,
        })
    }
}

fn at(now: DateTime<Local>, days: i64, hour: u32, minute: u32) -> CalendarResult<DateTime<Local>> {
    let date = now.date_naive() + Duration::days(days);
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| other_error("Invalid demo time"))?;
    to_local(date.and_time(time))
}

fn demo_event(
    id: &str,
    title: &str,
    start_time: DateTime<Local>,
    is_all_day: bool,
    meeting_url: Option<&str>,
) -> Event {
    Event {
        id: id.to_string(),
        title: title.to_string(),
        start_time,
        is_all_day,
        meeting_url: meeting_url.map(str::to_string),
        detail_url: Some(format!("https://calendar.google.com/event/{}", id)),
    }
}

/// No events today, four over the next three days
pub fn demo_events(now: DateTime<Local>) -> CalendarResult<Vec<Event>> {
    Ok(vec![
        demo_event(
            "123",
            "Team Standup",
            at(now, 1, 10, 30)?,
            false,
            Some("https://meet.google.com/abc-defg-hij"),
        ),
        demo_event("456", "Focus Time", at(now, 2, 0, 0)?, true, None),
        demo_event(
            "789",
            "All Hands",
            at(now, 2, 10, 0)?,
            false,
            Some("https://meet.google.com/xyz-uvwx-yz"),
        ),
        demo_event(
            "101",
            "1:1 Meeting",
            at(now, 3, 14, 30)?,
            false,
            Some("https://meet.google.com/one-two-three"),
        ),
    ])
}

#[async_trait]
impl CalendarProvider for DemoCalendar {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn fetch_today(&self) -> CalendarResult<Vec<Event>> {
        Ok(Vec::new())
    }

    async fn fetch_upcoming(
        &self,
        max_count: usize,
        _exclude_today: bool,
    ) -> CalendarResult<Vec<Event>> {
        Ok(self.upcoming.iter().take(max_count).cloned().collect())
    }

    async fn fetch_next(&self) -> CalendarResult<Option<Event>> {
        Ok(self.upcoming.first().cloned())
    }
}
