// src/ui/app.rs

//! Dashboard runner: terminal setup/cleanup, key handling and redraws.
//!
//! The loop is blocking (crossterm polling), so callers run it on a
//! blocking thread. It ends when the user quits or when the shared
//! shutdown token is cancelled from elsewhere (e.g. SIGINT), and always
//! cancels that token on the way out.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::cursor::Show;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::render::draw_page;
use super::{Page, PageUpdate, Pager};

/// Longest a single terminal poll blocks before pending updates are checked.
const UPDATE_POLL: Duration = Duration::from_millis(25);

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    NextPage,
    PrevPage,
}

/// Map a key event to a dashboard action.
pub fn action_for_key(key: KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        // Raw mode swallows SIGINT, so Ctrl-C arrives as a key.
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('n') | KeyCode::Right | KeyCode::Tab => Some(KeyAction::NextPage),
        KeyCode::Char('p') | KeyCode::Left | KeyCode::BackTab => Some(KeyAction::PrevPage),
        _ => None,
    }
}

/// The full-screen dashboard.
pub struct Dashboard {
    pages: Vec<Page>,
    pager: Pager,
    updates: mpsc::UnboundedReceiver<PageUpdate>,
    shutdown: CancellationToken,
    tick_rate: Duration,
}

impl Dashboard {
    pub fn new(
        pages: Vec<Page>,
        updates: mpsc::UnboundedReceiver<PageUpdate>,
        shutdown: CancellationToken,
    ) -> Self {
        let pager = Pager::new(pages.len());
        Self {
            pages,
            pager,
            updates,
            shutdown,
            tick_rate: Duration::from_millis(250),
        }
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Apply an action. Returns true when the dashboard should close.
    pub fn apply(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Quit => {
                info!("quit requested from keyboard");
                return true;
            }
            KeyAction::NextPage => {
                let page = self.pager.next();
                debug!(page, "next page");
            }
            KeyAction::PrevPage => {
                let page = self.pager.prev();
                debug!(page, "previous page");
            }
        }
        false
    }

    /// Take the terminal and run until quit or shutdown.
    pub fn run(mut self) -> Result<()> {
        if self.pages.is_empty() {
            self.shutdown.cancel();
            return Ok(());
        }

        let result = match TerminalGuard::enter() {
            Ok(mut guard) => self.event_loop(&mut guard.terminal),
            Err(err) => Err(err).context("setting up the terminal"),
        };

        self.shutdown.cancel();
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while !self.shutdown.is_cancelled() {
            let page = &self.pages[self.pager.current()];
            let pager = self.pager;
            terminal
                .draw(|frame| draw_page(frame, page, &pager))
                .context("drawing dashboard")?;

            if let Some(action) = self.wait_for_input()? {
                if self.apply(action) {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Block until a key action, a job update or the end of the tick.
    ///
    /// Terminal events are polled in short slices so an update arriving
    /// mid-tick triggers a redraw without waiting for the full tick.
    fn wait_for_input(&mut self) -> Result<Option<KeyAction>> {
        let deadline = Instant::now() + self.tick_rate;
        loop {
            if self.drain_updates() > 0 || self.shutdown.is_cancelled() {
                return Ok(None);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(None);
            }

            if event::poll(remaining.min(UPDATE_POLL)).context("polling terminal events")? {
                if let Event::Key(key) = event::read().context("reading terminal event")? {
                    if let Some(action) = action_for_key(key) {
                        return Ok(Some(action));
                    }
                }
            }
        }
    }

    /// Consume pending updates and return how many there were.
    ///
    /// Panes read job snapshots directly, so an update only means the
    /// screen is stale.
    pub fn drain_updates(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(PageUpdate { page, update }) = self.updates.try_recv() {
            debug!(
                page,
                key = %update.key,
                job = %update.name,
                status = %update.status,
                "job update"
            );
            drained += 1;
        }
        drained
    }
}

/// Raw mode + alternate screen, restored on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            restore_terminal(&mut stdout);
            return Err(err);
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                restore_terminal(&mut io::stdout());
                Err(err)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal(self.terminal.backend_mut());
    }
}

/// Leave the alternate screen, show the cursor and turn raw mode off.
///
/// Errors are ignored; this runs while tearing down.
pub fn restore_terminal<W: Write>(out: &mut W) {
    let _ = execute!(out, LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}
