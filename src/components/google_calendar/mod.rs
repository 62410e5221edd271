pub mod models;
pub mod normalize;
pub mod time;
pub mod token;

pub use models::GoogleEvent;
pub use token::TokenManager;

use crate::components::{CalendarProvider, Event, NEXT_EVENT_LOOKAHEAD};
use crate::config::Config;
use crate::error::{google_calendar_error, CalendarResult};
use crate::utils::time::{end_of_day, start_of_tomorrow, top_of_hour};
use async_trait::async_trait;
use chrono::{DateTime, Local, SecondsFormat};
use models::EventsResponse;
use normalize::normalize_all;
use reqwest::Client;
use tracing::debug;
use url::Url;

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Query window for one `events.list` call
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub time_min: DateTime<Local>,
    pub time_max: Option<DateTime<Local>>,
    pub max_results: Option<usize>,
}

impl EventQuery {
    /// Rest of today, starting at the top of the current hour
    pub fn today(now: &DateTime<Local>) -> CalendarResult<Self> {
        Ok(Self {
            time_min: top_of_hour(now)?,
            time_max: Some(end_of_day(now)?),
            max_results: None,
        })
    }

    /// Next `max_count` events from now, or from tomorrow when excluding today
    pub fn upcoming(
        now: &DateTime<Local>,
        max_count: usize,
        exclude_today: bool,
    ) -> CalendarResult<Self> {
        let time_min = if exclude_today {
            start_of_tomorrow(now)?
        } else {
            *now
        };
        Ok(Self {
            time_min,
            time_max: None,
            max_results: Some(max_count),
        })
    }

    /// Build the `events.list` URL for a calendar
    pub fn url(&self, calendar_id: &str) -> CalendarResult<Url> {
        let mut url = Url::parse(API_BASE)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Invalid API base URL"))?
            .extend(["calendars", calendar_id, "events"]);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("showDeleted", "false");
            query.append_pair("singleEvents", "true");
            query.append_pair("orderBy", "startTime");
            query.append_pair(
                "timeMin",
                &self.time_min.to_rfc3339_opts(SecondsFormat::Secs, false),
            );
            if let Some(time_max) = &self.time_max {
                query.append_pair(
                    "timeMax",
                    &time_max.to_rfc3339_opts(SecondsFormat::Secs, false),
                );
            }
            if let Some(max_results) = self.max_results {
                query.append_pair("maxResults", &max_results.to_string());
            }
        }

        Ok(url)
    }
}

/// Google Calendar access over the REST API
pub struct GoogleCalendar {
    calendar_id: String,
    token_manager: TokenManager,
    client: Client,
}

impl GoogleCalendar {
    pub fn new(config: &Config) -> Self {
        let client = Client::new();
        Self {
            calendar_id: config.calendar_id.clone(),
            token_manager: TokenManager::new(config, client.clone()),
            client,
        }
    }

    /// Run one `events.list` query and normalize the result
    async fn list_events(&self, query: &EventQuery) -> CalendarResult<Vec<Event>> {
        let access_token = self.token_manager.access_token().await?;
        let url = query.url(&self.calendar_id)?;
        debug!("Fetching events: {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let body: EventsResponse = response.json().await.map_err(|e| {
            google_calendar_error(&format!("Failed to parse events response: {}", e))
        })?;

        Ok(normalize_all(&body.items))
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendar {
    fn name(&self) -> &'static str {
        "google_calendar"
    }

    async fn fetch_today(&self) -> CalendarResult<Vec<Event>> {
        let query = EventQuery::today(&Local::now())?;
        self.list_events(&query).await
    }

    async fn fetch_upcoming(
        &self,
        max_count: usize,
        exclude_today: bool,
    ) -> CalendarResult<Vec<Event>> {
        let query = EventQuery::upcoming(&Local::now(), max_count, exclude_today)?;
        self.list_events(&query).await
    }

    async fn fetch_next(&self) -> CalendarResult<Option<Event>> {
        let now = Local::now();
        let query = EventQuery::upcoming(&now, NEXT_EVENT_LOOKAHEAD, false)?;
        let events = self.list_events(&query).await?;
        Ok(first_timed_after(events, now))
    }
}

/// First non-all-day event starting strictly after `now`
pub fn first_timed_after(events: Vec<Event>, now: DateTime<Local>) -> Option<Event> {
    events
        .into_iter()
        .find(|event| !event.is_all_day && event.start_time > now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn event(id: &str, start: DateTime<Local>, is_all_day: bool) -> Event {
        Event {
            id: id.to_string(),
            title: id.to_string(),
            start_time: start,
            is_all_day,
            meeting_url: None,
            detail_url: None,
        }
    }

    #[test]
    fn test_today_query_window() {
        let now = Local.with_ymd_and_hms(2023, 1, 4, 10, 42, 0).unwrap();
        let query = EventQuery::today(&now).unwrap();
        assert_eq!(query.time_min.format("%H:%M:%S").to_string(), "10:00:00");
        assert_eq!(
            query.time_max.map(|t| t.format("%H:%M:%S").to_string()),
            Some("23:59:59".to_string())
        );
        assert_eq!(query.max_results, None);
    }

    #[test]
    fn test_upcoming_query_window() {
        let now = Local.with_ymd_and_hms(2023, 1, 4, 10, 42, 0).unwrap();

        let query = EventQuery::upcoming(&now, 5, true).unwrap();
        assert_eq!(
            query.time_min.format("%Y-%m-%d %H:%M").to_string(),
            "2023-01-05 00:00"
        );
        assert_eq!(query.max_results, Some(5));

        let query = EventQuery::upcoming(&now, 5, false).unwrap();
        assert_eq!(query.time_min, now);
    }

    #[test]
    fn test_query_url() {
        let now = Local.with_ymd_and_hms(2023, 1, 4, 10, 42, 0).unwrap();
        let url = EventQuery::upcoming(&now, 5, false)
            .unwrap()
            .url("team@example.com")
            .unwrap();

        assert!(url
            .path()
            .ends_with("/calendars/team@example.com/events"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("singleEvents".to_string(), "true".to_string())));
        assert!(pairs.contains(&("orderBy".to_string(), "startTime".to_string())));
        assert!(pairs.contains(&("maxResults".to_string(), "5".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "timeMax"));
    }

    #[test]
    fn test_first_timed_after_skips_all_day_and_started() {
        let now = Local.with_ymd_and_hms(2023, 1, 4, 10, 0, 0).unwrap();
        let events = vec![
            event("started", now - Duration::minutes(5), false),
            event("all-day", now + Duration::hours(1), true),
            event("exactly-now", now, false),
            event("next", now + Duration::hours(2), false),
        ];
        assert_eq!(first_timed_after(events, now).map(|e| e.id), Some("next".to_string()));
        assert_eq!(first_timed_after(Vec::new(), now), None);
    }
}
