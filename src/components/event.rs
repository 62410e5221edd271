use chrono::{DateTime, Duration, Local};

/// A calendar event as the dashboard sees it
///
/// Built once per fetch and never mutated. `id` refers back to the provider's
/// record when something downstream needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Local>,
    pub is_all_day: bool,
    pub meeting_url: Option<String>,
    pub detail_url: Option<String>,
}

impl Event {
    /// Time left until the event starts, negative once it has started
    pub fn time_until_start(&self, now: DateTime<Local>) -> Duration {
        self.start_time - now
    }

    /// Meeting link, if any non-empty one exists
    pub fn meeting_link(&self) -> Option<&str> {
        self.meeting_url.as_deref().filter(|url| !url.is_empty())
    }
}
