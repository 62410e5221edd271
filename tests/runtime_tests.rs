mod common;

use chrono::{DateTime, Local};
use common::{event, MockCalendar};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mycal::error::{terminal_error, CalendarResult};
use mycal::tui::{event_loop, AppMessage, ViewState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const REFRESH: Duration = Duration::from_secs(300);

/// What one redraw saw
#[derive(Debug, Clone)]
struct Frame {
    today: usize,
    applied: Option<u64>,
    status: String,
}

struct Harness {
    tx: mpsc::Sender<AppMessage>,
    frames: mpsc::UnboundedReceiver<Frame>,
    handle: JoinHandle<CalendarResult<()>>,
}

impl Harness {
    fn start(provider: Arc<MockCalendar>) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let (frame_tx, frames) = mpsc::unbounded_channel();
        let draw = move |state: &ViewState, _now: DateTime<Local>| {
            let _ = frame_tx.send(Frame {
                today: state.today_events().len(),
                applied: state.last_applied_request,
                status: state.status.clone(),
            });
            Ok(())
        };
        let handle = tokio::spawn(event_loop(
            provider,
            REFRESH,
            (tx.clone(), rx),
            CancellationToken::new(),
            draw,
        ));
        Self { tx, frames, handle }
    }

    async fn press(&self, code: KeyCode) {
        self.tx
            .send(AppMessage::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .await
            .unwrap();
    }

    /// Frames drawn until `pred` matches, the matching one last
    async fn frames_until(&mut self, pred: impl Fn(&Frame) -> bool) -> Vec<Frame> {
        let mut seen = Vec::new();
        while let Some(frame) = self.frames.recv().await {
            let done = pred(&frame);
            seen.push(frame);
            if done {
                return seen;
            }
        }
        panic!("loop stopped drawing, frames so far: {:?}", seen);
    }

    fn drain(&mut self) -> Vec<Frame> {
        let mut seen = Vec::new();
        while let Ok(frame) = self.frames.try_recv() {
            seen.push(frame);
        }
        seen
    }
}

fn standup_calendar() -> MockCalendar {
    MockCalendar::new(
        vec![event("Standup", 1, Some("https://meet.google.com/abc"))],
        vec![event("Planning", 24, None)],
        None,
    )
}

#[tokio::test(start_paused = true)]
async fn test_start_fetches_and_redraws_once_per_message() {
    let provider = Arc::new(standup_calendar());
    let mut harness = Harness::start(Arc::clone(&provider));

    // Initial frame, then the startup fetch result
    let frames = harness.frames_until(|f| f.applied == Some(1)).await;
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].applied, None);
    assert_eq!(frames[0].today, 0);
    assert_eq!(frames[1].today, 1);
    assert_eq!(provider.calls().0, 1);

    // Manual refresh: one frame for the key, one for the result
    harness.press(KeyCode::Char('r')).await;
    let frames = harness.frames_until(|f| f.applied == Some(2)).await;
    assert_eq!(frames.first().map(|f| f.status.as_str()), Some("Refreshing..."));
    assert!(frames.last().unwrap().status.is_empty());
    assert_eq!(provider.calls().0, 2);

    harness.press(KeyCode::Char('q')).await;
    harness.handle.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_tick_rearms_once_per_second() {
    let provider = Arc::new(standup_calendar());
    let mut harness = Harness::start(Arc::clone(&provider));
    harness.frames_until(|f| f.applied == Some(1)).await;

    tokio::time::sleep(Duration::from_secs(10)).await;
    harness.press(KeyCode::Char('q')).await;
    (&mut harness.handle).await.unwrap().unwrap();

    // One redraw per tick, no free-running timers and no extra fetches
    let ticks = harness.drain().len();
    assert!((9..=11).contains(&ticks), "got {} tick frames", ticks);
    assert_eq!(provider.calls().0, 1);
}

#[tokio::test(start_paused = true)]
async fn test_fetch_finishing_after_quit_is_dropped() {
    let provider = Arc::new(MockCalendar {
        delay: Some(Duration::from_secs(5)),
        ..standup_calendar()
    });
    let mut harness = Harness::start(Arc::clone(&provider));
    harness.frames_until(|f| f.applied.is_none()).await;

    harness.press(KeyCode::Char('q')).await;
    (&mut harness.handle).await.unwrap().unwrap();

    // The startup fetch completes later and has nowhere to go
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(provider.calls(), (1, 1, 1));
    assert!(harness.drain().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_draw_failure_cancels_background_tasks() {
    let provider = Arc::new(standup_calendar());
    let (tx, rx) = mpsc::channel(64);
    let cancel = CancellationToken::new();

    let result = event_loop(provider, REFRESH, (tx, rx), cancel.clone(), |_, _| {
        Err(terminal_error("terminal closed"))
    })
    .await;

    assert!(result.is_err());
    assert!(cancel.is_cancelled());
}
