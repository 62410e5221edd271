//! The event loop driving the interactive dashboard.
//!
//! The loop owns the [`ViewState`] and is its only writer. Key presses, clock
//! ticks, signals and fetch results all arrive on one `mpsc` channel and are
//! applied one at a time, each followed by exactly one redraw. Fetches and
//! link opening run as separate tasks that report back through the channel.

use super::fetch::fetch_agenda;
use super::model::{AppMessage, Command, ViewState};
use super::render::{render, RenderContext};
use super::terminal::TerminalGuard;
use super::update::{init, update};
use crate::components::CalendarProvider;
use crate::error::CalendarResult;
use crate::shutdown;
use chrono::{DateTime, Local};
use crossterm::event::{Event as TermEvent, EventStream};
use futures::StreamExt;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const TICK_INTERVAL: Duration = Duration::from_secs(1);
const CHANNEL_CAPACITY: usize = 64;

/// Settings for one dashboard session
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub render: RenderContext,
    pub refresh_interval: Duration,
}

/// Run the dashboard until the user quits or the process is signalled
pub async fn run(provider: Arc<dyn CalendarProvider>, options: RunOptions) -> CalendarResult<()> {
    let mut terminal = TerminalGuard::enter()?;

    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();

    spawn_input_reader(tx.clone(), cancel.clone());
    tokio::spawn(shutdown::forward_signals(tx.clone(), cancel.clone()));

    let ctx = options.render;
    let result = event_loop(
        provider,
        options.refresh_interval,
        (tx, rx),
        cancel,
        |state: &ViewState, now: DateTime<Local>| terminal.draw(&render(state, &ctx, now)),
    )
    .await;

    terminal.restore()?;
    result
}

/// Apply messages from `channel` until a `Quit` command, calling `draw` once
/// at start and once after every applied message.
///
/// `cancel` is cancelled on every exit path, which stops the tick timer and
/// any other task that was handed a clone of it.
pub async fn event_loop<F>(
    provider: Arc<dyn CalendarProvider>,
    refresh_interval: Duration,
    channel: (mpsc::Sender<AppMessage>, mpsc::Receiver<AppMessage>),
    cancel: CancellationToken,
    mut draw: F,
) -> CalendarResult<()>
where
    F: FnMut(&ViewState, DateTime<Local>) -> CalendarResult<()>,
{
    let (tx, mut rx) = channel;
    let _cancel_on_exit = cancel.clone().drop_guard();
    info!("Dashboard started with {} provider", provider.name());

    let mut dispatcher = Dispatcher::new(tx, provider, cancel);
    let now = Local::now();
    let mut state = ViewState::new(now, refresh_interval);

    let startup = init(&mut state, now);
    let mut flow = dispatcher.execute(startup);
    if flow.is_continue() {
        draw(&state, now)?;
    }

    while flow.is_continue() {
        let Some(msg) = rx.recv().await else {
            break;
        };
        let now = Local::now();
        let commands = update(&mut state, msg, now);
        flow = dispatcher.execute(commands);
        if flow.is_continue() {
            draw(&state, now)?;
        }
    }

    // In-flight fetches finish on their own and find the channel closed
    info!("Dashboard stopped");
    Ok(())
}

/// Runs the commands returned by `update`
struct Dispatcher {
    tx: mpsc::Sender<AppMessage>,
    provider: Arc<dyn CalendarProvider>,
    cancel: CancellationToken,
    next_request: u64,
}

impl Dispatcher {
    fn new(
        tx: mpsc::Sender<AppMessage>,
        provider: Arc<dyn CalendarProvider>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            tx,
            provider,
            cancel,
            next_request: 1,
        }
    }

    fn execute(&mut self, commands: Vec<Command>) -> ControlFlow<()> {
        for command in commands {
            match command {
                Command::Fetch => self.spawn_fetch(),
                Command::OpenUrl(url) => spawn_open_url(url),
                Command::ScheduleTick => self.schedule_tick(),
                Command::Quit => return ControlFlow::Break(()),
            }
        }
        ControlFlow::Continue(())
    }

    fn spawn_fetch(&mut self) {
        let request = self.next_request;
        self.next_request += 1;
        debug!("Issuing fetch #{}", request);

        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = fetch_agenda(provider.as_ref()).await;
            if tx.send(AppMessage::Fetched { request, result }).await.is_err() {
                debug!("Fetch #{} finished after the dashboard closed", request);
            }
        });
    }

    /// One tick, one second from now. `update` re-arms it.
    fn schedule_tick(&self) {
        let tx = self.tx.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = sleep(TICK_INTERVAL) => {
                    let _ = tx.send(AppMessage::Tick).await;
                }
            }
        });
    }
}

fn spawn_open_url(url: String) {
    tokio::task::spawn_blocking(move || {
        info!("Opening {}", url);
        if let Err(e) = webbrowser::open(&url) {
            warn!("Failed to open {}: {}", url, e);
        }
    });
}

/// Forward terminal input into the loop until cancelled
fn spawn_input_reader(tx: mpsc::Sender<AppMessage>, cancel: CancellationToken) {
    tokio::spawn(async move {
        let mut events = EventStream::new();
        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => break,
                next = events.next() => next,
            };

            let msg = match next {
                Some(Ok(TermEvent::Key(key))) => AppMessage::Key(key),
                Some(Ok(TermEvent::Resize(_, _))) => AppMessage::Resize,
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    error!("Failed to read terminal input: {}", e);
                    break;
                }
                None => break,
            };

            if tx.send(msg).await.is_err() {
                break;
            }
        }
    });
}
