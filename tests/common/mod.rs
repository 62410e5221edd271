use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone};
use mycal::components::{CalendarProvider, Event};
use mycal::error::{google_calendar_error, CalendarResult};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fixed "now" shared by the integration tests
#[allow(dead_code)]
pub fn base_time() -> DateTime<Local> {
    Local.with_ymd_and_hms(2023, 1, 4, 9, 0, 0).unwrap()
}

/// Build an event starting `hours` after the base time
#[allow(dead_code)]
pub fn event(title: &str, hours: i64, meeting_url: Option<&str>) -> Event {
    Event {
        id: title.to_lowercase().replace(' ', "-"),
        title: title.to_string(),
        start_time: base_time() + Duration::hours(hours),
        is_all_day: false,
        meeting_url: meeting_url.map(str::to_string),
        detail_url: Some(format!("https://calendar.google.com/event/{}", title)),
    }
}

/// Mock calendar provider with canned results and call counters
#[derive(Debug, Default)]
pub struct MockCalendar {
    pub today: Vec<Event>,
    pub upcoming: Vec<Event>,
    pub next: Option<Event>,
    pub fail_today: bool,
    pub fail_upcoming: bool,
    pub fail_next: bool,
    /// Added latency for today's events
    pub delay: Option<std::time::Duration>,
    pub today_calls: AtomicUsize,
    pub upcoming_calls: AtomicUsize,
    pub next_calls: AtomicUsize,
}

#[allow(dead_code)]
impl MockCalendar {
    pub fn new(today: Vec<Event>, upcoming: Vec<Event>, next: Option<Event>) -> Self {
        Self {
            today,
            upcoming,
            next,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.today_calls.load(Ordering::SeqCst),
            self.upcoming_calls.load(Ordering::SeqCst),
            self.next_calls.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl CalendarProvider for MockCalendar {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_today(&self) -> CalendarResult<Vec<Event>> {
        self.today_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_today {
            return Err(google_calendar_error("today unavailable"));
        }
        Ok(self.today.clone())
    }

    async fn fetch_upcoming(
        &self,
        max_count: usize,
        _exclude_today: bool,
    ) -> CalendarResult<Vec<Event>> {
        self.upcoming_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_upcoming {
            return Err(google_calendar_error("upcoming unavailable"));
        }
        Ok(self.upcoming.iter().take(max_count).cloned().collect())
    }

    async fn fetch_next(&self) -> CalendarResult<Option<Event>> {
        self.next_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next {
            return Err(google_calendar_error("next unavailable"));
        }
        Ok(self.next.clone())
    }
}
