use crate::error::CalendarResult;
use async_trait::async_trait;

pub mod demo;
pub mod event;
pub mod google_calendar;

pub use demo::DemoCalendar;
pub use event::Event;
pub use google_calendar::GoogleCalendar;

/// Number of events in the "next event" lookahead batch
pub const NEXT_EVENT_LOOKAHEAD: usize = 5;

/// Read access to a calendar
///
/// Implementations own authentication and network I/O. Every list comes back
/// sorted by start time.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Events from the top of the current hour until the end of today
    async fn fetch_today(&self) -> CalendarResult<Vec<Event>>;

    /// Up to `max_count` future events, starting tomorrow when `exclude_today` is set
    async fn fetch_upcoming(&self, max_count: usize, exclude_today: bool)
        -> CalendarResult<Vec<Event>>;

    /// First timed event starting strictly after now
    async fn fetch_next(&self) -> CalendarResult<Option<Event>>;
}
