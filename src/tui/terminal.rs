use crate::error::{terminal_error, CalendarResult};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use std::io::{self, IsTerminal, Stdout, Write};
use tracing::error;

/// Raw-mode alternate screen, restored on drop
pub struct TerminalGuard {
    stdout: Stdout,
    active: bool,
}

impl TerminalGuard {
    pub fn enter() -> CalendarResult<Self> {
        let mut stdout = io::stdout();
        if !stdout.is_terminal() {
            return Err(terminal_error("watch mode needs an interactive terminal"));
        }

        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, Hide)?;

        Ok(Self {
            stdout,
            active: true,
        })
    }

    /// Replace the screen contents with `frame`
    pub fn draw(&mut self, frame: &str) -> CalendarResult<()> {
        // Raw mode does not translate newlines
        let frame = frame.replace('\n', "\r\n");
        queue!(
            self.stdout,
            MoveTo(0, 0),
            Clear(ClearType::All),
            Print(frame)
        )?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn restore(&mut self) -> CalendarResult<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.stdout, Show, LeaveAlternateScreen)?;
        disable_raw_mode()?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            error!("Failed to restore terminal: {}", e);
        }
    }
}
