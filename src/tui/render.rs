//! Text rendering of the dashboard.
//!
//! Every function here is a pure transform of its arguments: the same state,
//! context and "now" always produce the same string. Colours come from the
//! [`Theme`] inside [`RenderContext`], never from global state.

use super::model::ViewState;
use super::theme::Theme;
use crate::components::Event;
use crate::utils::time::{format_countdown, greeting};
use chrono::{DateTime, Local};
use crossterm::style::{style, Stylize};
use std::fmt::Write as _;

pub const HELP_TEXT: &str = "↑/↓ navigate • enter join • r refresh • q quit";
pub const NO_EVENTS_TODAY: &str = "No events remaining today";
const DIVIDER: &str = "─────────────────────────────────";
const SECTION_ICON: &str = "🗓";

/// Everything besides the view state that affects rendering
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub theme: Theme,
    pub user_name: String,
    pub hyperlinks: bool,
}

impl RenderContext {
    pub fn new(theme: Theme, user_name: impl Into<String>, hyperlinks: bool) -> Self {
        Self {
            theme,
            user_name: user_name.into(),
            hyperlinks,
        }
    }
}

/// Full interactive frame
pub fn render(state: &ViewState, ctx: &RenderContext, now: DateTime<Local>) -> String {
    render_frame(state, ctx, now, true)
}

/// One-shot output for static and demo mode: no selection, status or help
pub fn render_static(state: &ViewState, ctx: &RenderContext, now: DateTime<Local>) -> String {
    render_frame(state, ctx, now, false)
}

fn render_frame(
    state: &ViewState,
    ctx: &RenderContext,
    now: DateTime<Local>,
    interactive: bool,
) -> String {
    let theme = &ctx.theme;
    let mut out = String::new();

    let _ = writeln!(out, "{}", render_header(ctx, now));

    if let Some(countdown) = state
        .next_event()
        .and_then(|event| render_countdown(event, ctx, now))
    {
        let _ = writeln!(out, "{}", countdown);
    }

    if interactive && !state.status.is_empty() {
        let _ = writeln!(out, "{}", style(&state.status).with(theme.success).italic());
    }

    let highlight = |index: Option<usize>| if interactive { index } else { None };

    out.push('\n');
    let _ = writeln!(out, "{}", render_section_title("Today", ctx));
    if state.today_events().is_empty() {
        let _ = writeln!(
            out,
            " {}",
            style(NO_EVENTS_TODAY).with(theme.muted).italic()
        );
    } else {
        let _ = writeln!(
            out,
            "{}",
            render_event_list(state.today_events(), true, highlight(state.today_highlight()), ctx)
        );
    }

    if state.shows_upcoming() {
        out.push('\n');
        let _ = writeln!(out, "{}", render_section_title("Upcoming", ctx));
        let _ = writeln!(
            out,
            "{}",
            render_event_list(
                state.upcoming_events(),
                false,
                highlight(state.upcoming_highlight()),
                ctx
            )
        );
    }

    if interactive {
        out.push('\n');
        let _ = writeln!(out, "{}", style(HELP_TEXT).with(theme.muted));
    }

    if let Some(err) = &state.last_error {
        let _ = writeln!(out, "{}", style(format!("Error: {}", err)).with(theme.error));
    }

    out
}

/// Date and greeting in a rounded box
pub fn render_header(ctx: &RenderContext, now: DateTime<Local>) -> String {
    let theme = &ctx.theme;
    let date = format!("  {}", now.format("%A, %B %-d, %Y"));
    let hello = format!("  {}, {}!", greeting(&now), ctx.user_name);
    let width = date.chars().count().max(hello.chars().count()) + 2;

    let border = |s: &str| style(s.to_string()).with(theme.primary);
    let pad = |s: &str| " ".repeat(width - s.chars().count());

    let mut out = String::new();
    let _ = writeln!(out, "{}", border(&format!("╭{}╮", "─".repeat(width))));
    let _ = writeln!(
        out,
        "{}{}{}{}",
        border("│"),
        style(&date).with(theme.secondary).bold(),
        pad(&date),
        border("│")
    );
    let _ = writeln!(
        out,
        "{}{}{}{}",
        border("│"),
        style(&hello).with(theme.text).italic(),
        pad(&hello),
        border("│")
    );
    let _ = write!(out, "{}", border(&format!("╰{}╯", "─".repeat(width))));
    out
}

/// "Next: <title> <countdown>", or `None` once the event has started
pub fn render_countdown(event: &Event, ctx: &RenderContext, now: DateTime<Local>) -> Option<String> {
    let countdown = format_countdown(event.time_until_start(now))?;
    let theme = &ctx.theme;
    Some(format!(
        "{} {} {}",
        style("Next:").with(theme.muted),
        style(&event.title).with(theme.text).bold(),
        style(countdown).with(theme.accent).bold()
    ))
}

pub fn render_section_title(title: &str, ctx: &RenderContext) -> String {
    style(format!("{} {}", SECTION_ICON, title))
        .with(ctx.theme.primary)
        .bold()
        .to_string()
}

/// Events separated by dividers, `highlight` is the selected row if any
pub fn render_event_list(
    events: &[Event],
    is_today: bool,
    highlight: Option<usize>,
    ctx: &RenderContext,
) -> String {
    let gutter = style("│").with(ctx.theme.muted).to_string();
    let mut lines = Vec::new();

    for (i, event) in events.iter().enumerate() {
        lines.extend(render_event(event, is_today, highlight == Some(i), ctx));
        if i + 1 < events.len() {
            lines.push(style(DIVIDER).with(ctx.theme.muted).to_string());
        }
    }

    lines
        .iter()
        .map(|line| format!("{} {}", gutter, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Title line, time line and links for one event
pub fn render_event(event: &Event, is_today: bool, selected: bool, ctx: &RenderContext) -> Vec<String> {
    let theme = &ctx.theme;
    let mut rows = Vec::new();

    let title = if selected {
        style(format!(" ▸ {} ", event.title))
            .with(theme.text)
            .on(theme.selected_bg)
            .bold()
            .to_string()
    } else {
        style(&event.title).with(theme.text).bold().to_string()
    };
    rows.push(title);

    let time = if event.is_all_day {
        style(format!("{} · All day", event.start_time.format("%A")))
            .with(theme.warning)
            .italic()
            .to_string()
    } else {
        let format = if is_today { "%-I:%M %p" } else { "%a · %-I:%M %p" };
        style(event.start_time.format(format).to_string())
            .with(theme.secondary)
            .to_string()
    };

    if ctx.hyperlinks {
        let mut links = Vec::new();
        if let Some(url) = event.meeting_link() {
            links.push(hyperlink("[Join]", url, theme.success));
        }
        if let Some(url) = event.detail_url.as_deref() {
            links.push(hyperlink("[Cal]", url, theme.muted));
        }
        if links.is_empty() {
            rows.push(time);
        } else {
            rows.push(format!("{}  {}", time, links.join(" ")));
        }
    } else {
        rows.push(time);
        if let Some(url) = event.meeting_link() {
            rows.push(style(format!("  ↳ {}", url)).with(theme.muted).to_string());
        }
    }

    rows
}

/// OSC 8 terminal hyperlink
fn hyperlink(text: &str, url: &str, color: crossterm::style::Color) -> String {
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, style(text).with(color))
}
