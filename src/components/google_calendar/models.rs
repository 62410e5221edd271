use serde::Deserialize;

/// Response body of `events.list`
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
}

/// Raw event record as returned by the Google Calendar API
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoogleEvent {
    #[serde(default)]
    pub id: String,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub html_link: Option<String>,
    pub hangout_link: Option<String>,
    #[serde(default)]
    pub start: EventDateTime,
    pub conference_data: Option<ConferenceData>,
}

/// Either a timed start (`dateTime`) or an all-day start (`date`)
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceData {
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    pub uri: Option<String>,
}

impl GoogleEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }
}
