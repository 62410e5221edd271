use crate::components::event::Event;
use crate::error::CalendarResult;
use super::models::GoogleEvent;
use super::time::parse_event_start;
use tracing::warn;

/// Title used when an event has no summary
pub const UNTITLED: &str = "(No title)";

/// Convert a raw record into a domain event
pub fn normalize(raw: &GoogleEvent) -> CalendarResult<Event> {
    let (start_time, is_all_day) = parse_event_start(&raw.start)?;

    Ok(Event {
        id: raw.id.clone(),
        title: raw
            .summary
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNTITLED.to_string()),
        start_time,
        is_all_day,
        meeting_url: meeting_url(raw),
        detail_url: raw.html_link.clone().filter(|link| !link.is_empty()),
    })
}

/// Normalize a page of records, dropping cancelled and unreadable ones
pub fn normalize_all(items: &[GoogleEvent]) -> Vec<Event> {
    items
        .iter()
        .filter(|item| !item.is_cancelled())
        .filter_map(|item| match normalize(item) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Skipping event {}: {}", item.id, e);
                None
            }
        })
        .collect()
}

/// Conference entry point, then hangout link, then a URL-looking location
fn meeting_url(raw: &GoogleEvent) -> Option<String> {
    let conference = raw
        .conference_data
        .as_ref()
        .and_then(|data| data.entry_points.first())
        .and_then(|entry| entry.uri.clone());

    conference
        .or_else(|| raw.hangout_link.clone())
        .filter(|url| !url.is_empty())
        .or_else(|| {
            raw.location
                .clone()
                .filter(|location| location.starts_with("http"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::google_calendar::models::{
        ConferenceData, EntryPoint, EventDateTime,
    };

    fn raw_event(id: &str) -> GoogleEvent {
        GoogleEvent {
            id: id.to_string(),
            summary: Some("Standup".to_string()),
            start: EventDateTime {
                date_time: Some("2023-01-04T10:30:00+00:00".to_string()),
                date: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_meeting_url_priority() {
        let mut raw = raw_event("a");
        raw.location = Some("https://zoom.us/j/1".to_string());
        assert_eq!(meeting_url(&raw).as_deref(), Some("https://zoom.us/j/1"));

        raw.hangout_link = Some("https://meet.google.com/abc".to_string());
        assert_eq!(meeting_url(&raw).as_deref(), Some("https://meet.google.com/abc"));

        raw.conference_data = Some(ConferenceData {
            entry_points: vec![EntryPoint {
                uri: Some("https://meet.google.com/xyz".to_string()),
            }],
        });
        assert_eq!(meeting_url(&raw).as_deref(), Some("https://meet.google.com/xyz"));
    }

    #[test]
    fn test_location_without_url_is_not_a_link() {
        let mut raw = raw_event("a");
        raw.location = Some("Room 4".to_string());
        assert_eq!(meeting_url(&raw), None);
    }

    #[test]
    fn test_normalize_fields() {
        let mut raw = raw_event("abc");
        raw.html_link = Some("https://calendar.google.com/event?eid=abc".to_string());
        raw.summary = None;

        let event = normalize(&raw).unwrap();
        assert_eq!(event.id, "abc");
        assert_eq!(event.title, UNTITLED);
        assert!(!event.is_all_day);
        assert_eq!(
            event.detail_url.as_deref(),
            Some("https://calendar.google.com/event?eid=abc")
        );
    }

    #[test]
    fn test_normalize_all_drops_cancelled_and_broken() {
        let mut cancelled = raw_event("cancelled");
        cancelled.status = Some("cancelled".to_string());
        let mut broken = raw_event("broken");
        broken.start = EventDateTime::default();

        let events = normalize_all(&[raw_event("ok"), cancelled, broken]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "ok");
    }
}
