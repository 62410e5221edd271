//! State transitions of the dashboard.
//!
//! `update()` applies one message to the state and returns the side effects
//! the runtime should run. It performs no I/O and takes "now" as an argument
//! so every transition can be replayed in tests.

use super::model::{AppMessage, Command, ViewState};
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, error, warn};

pub const STATUS_REFRESHING: &str = "Refreshing...";
pub const STATUS_NO_LINK: &str = "No meeting link for this event";

/// Commands issued when the loop starts
pub fn init(state: &mut ViewState, now: DateTime<Local>) -> Vec<Command> {
    state.last_fetch_issued = Some(now);
    vec![Command::Fetch, Command::ScheduleTick]
}

/// Apply a message to the state and return the commands for the runtime
pub fn update(state: &mut ViewState, msg: AppMessage, now: DateTime<Local>) -> Vec<Command> {
    match msg {
        AppMessage::Key(key) => handle_key(state, key, now),

        AppMessage::Tick => {
            if refresh_due(state, now) {
                debug!("Data older than {:?}, refreshing", state.refresh_interval);
                state.last_fetch_issued = Some(now);
                vec![Command::ScheduleTick, Command::Fetch]
            } else {
                vec![Command::ScheduleTick]
            }
        }

        AppMessage::Resize => Vec::new(),

        AppMessage::Fetched { request, result } => {
            match result {
                Ok(agenda) => {
                    // Results apply in completion order; an older request can
                    // still overwrite a newer one here.
                    if let Some(applied) = state.last_applied_request {
                        if request < applied {
                            warn!(
                                "Applying fetch #{} after newer fetch #{} completed",
                                request, applied
                            );
                        }
                    }
                    debug!(
                        "Fetch #{} applied: {} today, {} upcoming",
                        request,
                        agenda.today.len(),
                        agenda.upcoming.len()
                    );

                    state.replace_events(agenda);
                    state.last_refresh_time = now;
                    state.status.clear();
                    state.last_error = None;
                    state.last_applied_request = Some(
                        state
                            .last_applied_request
                            .map_or(request, |applied| applied.max(request)),
                    );
                }
                Err(e) => {
                    error!("Fetch #{} failed: {}", request, e);
                    state.last_error = Some(e);
                }
            }
            Vec::new()
        }

        AppMessage::Shutdown => vec![Command::Quit],
    }
}

fn handle_key(state: &mut ViewState, key: KeyEvent, now: DateTime<Local>) -> Vec<Command> {
    if key.kind == KeyEventKind::Release {
        return Vec::new();
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => vec![Command::Quit],
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            vec![Command::Quit]
        }

        KeyCode::Up | KeyCode::Char('k') => {
            state.select_previous();
            Vec::new()
        }

        KeyCode::Down | KeyCode::Char('j') => {
            state.select_next();
            Vec::new()
        }

        KeyCode::Enter => {
            let Some(event) = state.selected_event() else {
                return Vec::new();
            };
            match event.meeting_link() {
                Some(url) => {
                    let command = Command::OpenUrl(url.to_string());
                    state.status = format!("Opening {}...", event.title);
                    vec![command]
                }
                None => {
                    state.status = STATUS_NO_LINK.to_string();
                    Vec::new()
                }
            }
        }

        KeyCode::Char('r') => {
            state.status = STATUS_REFRESHING.to_string();
            state.last_fetch_issued = Some(now);
            vec![Command::Fetch]
        }

        _ => Vec::new(),
    }
}

/// Whether a tick at `now` should start a fetch
fn refresh_due(state: &ViewState, now: DateTime<Local>) -> bool {
    let older_than_interval = |since: DateTime<Local>| {
        (now - since)
            .to_std()
            .map(|elapsed| elapsed > state.refresh_interval)
            .unwrap_or(false)
    };

    older_than_interval(state.last_refresh_time)
        && state.last_fetch_issued.map_or(true, older_than_interval)
}
