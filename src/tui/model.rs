//! State, messages and commands of the interactive dashboard.
//!
//! [`ViewState`] is owned by the event loop and only changed by
//! [`update`](super::update::update). Background tasks talk to the loop
//! exclusively through [`AppMessage`] values and the loop asks for side
//! effects by returning [`Command`] values.

use crate::components::Event;
use crate::error::{CalendarResult, Error};
use chrono::{DateTime, Local};
use crossterm::event::KeyEvent;
use std::time::Duration;

/// Today's list must be shorter than this for upcoming events to be fetched and shown
pub const UPCOMING_THRESHOLD: usize = 3;

/// Maximum number of upcoming events to fetch
pub const UPCOMING_LIMIT: usize = 5;

/// Everything one fetch produces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Agenda {
    pub today: Vec<Event>,
    pub upcoming: Vec<Event>,
    pub next: Option<Event>,
}

/// Input to the event loop
#[derive(Debug)]
pub enum AppMessage {
    /// A key from the terminal
    Key(KeyEvent),
    /// The once-per-second clock
    Tick,
    /// Terminal size changed, only needs a redraw
    Resize,
    /// A fetch finished, `request` is the id it was issued with
    Fetched {
        request: u64,
        result: CalendarResult<Agenda>,
    },
    /// The process was asked to terminate
    Shutdown,
}

/// Side effect requested by a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fetch,
    OpenUrl(String),
    ScheduleTick,
    Quit,
}

/// Snapshot of what should be on screen
#[derive(Debug)]
pub struct ViewState {
    today_events: Vec<Event>,
    upcoming_events: Vec<Event>,
    next_event: Option<Event>,
    all_events: Vec<Event>,
    selected_index: usize,
    pub status: String,
    pub last_refresh_time: DateTime<Local>,
    pub last_error: Option<Error>,
    /// When a fetch was last issued, used to gate automatic refreshes
    pub last_fetch_issued: Option<DateTime<Local>>,
    /// Highest request id applied so far
    pub last_applied_request: Option<u64>,
    /// Data older than this is refreshed on the next tick
    pub refresh_interval: Duration,
}

impl ViewState {
    pub fn new(now: DateTime<Local>, refresh_interval: Duration) -> Self {
        Self {
            today_events: Vec::new(),
            upcoming_events: Vec::new(),
            next_event: None,
            all_events: Vec::new(),
            selected_index: 0,
            status: String::new(),
            last_refresh_time: now,
            last_error: None,
            last_fetch_issued: None,
            last_applied_request: None,
            refresh_interval,
        }
    }

    /// State for a one-shot render, nothing selected
    pub fn from_agenda(agenda: Agenda, now: DateTime<Local>) -> Self {
        let mut state = Self::new(now, Duration::from_secs(crate::config::DEFAULT_REFRESH_SECS));
        state.replace_events(agenda);
        state
    }

    pub fn today_events(&self) -> &[Event] {
        &self.today_events
    }

    pub fn upcoming_events(&self) -> &[Event] {
        &self.upcoming_events
    }

    pub fn next_event(&self) -> Option<&Event> {
        self.next_event.as_ref()
    }

    /// Today's events followed by upcoming ones, the list the cursor moves over
    pub fn all_events(&self) -> &[Event] {
        &self.all_events
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.all_events.get(self.selected_index)
    }

    /// Whether the upcoming section is shown at all
    pub fn shows_upcoming(&self) -> bool {
        self.today_events.len() < UPCOMING_THRESHOLD && !self.upcoming_events.is_empty()
    }

    /// Highlighted row inside the today section
    pub fn today_highlight(&self) -> Option<usize> {
        section_highlight(self.selected_index as i64, self.today_events.len())
    }

    /// Highlighted row inside the upcoming section
    pub fn upcoming_highlight(&self) -> Option<usize> {
        let relative = self.selected_index as i64 - self.today_events.len() as i64;
        section_highlight(relative, self.upcoming_events.len())
    }

    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected_index + 1 < self.all_events.len() {
            self.selected_index += 1;
        }
    }

    /// Full replace of the event lists, keeping the cursor in range
    pub fn replace_events(&mut self, agenda: Agenda) {
        self.today_events = agenda.today;
        self.upcoming_events = agenda.upcoming;
        self.next_event = agenda.next;
        self.all_events = self
            .today_events
            .iter()
            .chain(self.upcoming_events.iter())
            .cloned()
            .collect();

        if self.all_events.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.all_events.len() {
            self.selected_index = self.all_events.len() - 1;
        }
    }
}

fn section_highlight(relative: i64, len: usize) -> Option<usize> {
    if relative >= 0 && (relative as usize) < len {
        Some(relative as usize)
    } else {
        None
    }
}
