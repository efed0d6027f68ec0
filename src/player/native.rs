//! Terminal run loop for the looper.
//!
//! Owns the terminal while a session runs: raw mode, alternate screen and
//! mouse capture are enabled for the duration and always restored, including
//! when SIGTERM or SIGHUP arrive.

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use super::input::handle_event;
use super::render::draw;
use super::session::LoopSession;
use super::state::InputResult;
use crate::backend::VideoPlayer;
use crate::video::LoopLink;

/// Longest wait for terminal input while paused; player events are
/// drained at least this often.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// How a looper run ended.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    /// State at exit
    pub link: LoopLink,
    /// The link rendered with the configured base URL
    pub link_url: String,
    /// Whether a signal ended the run
    pub interrupted: bool,
}

/// Restores the terminal when dropped.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(stdout: &mut Stdout) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = Self;
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            Hide
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            Show,
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = disable_raw_mode();
    }
}

/// Flag set by SIGTERM/SIGHUP (and SIGINT outside raw mode).
fn register_quit_flag() -> Result<Arc<AtomicBool>> {
    let quit = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&quit))?;
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&quit))?;
    #[cfg(unix)]
    signal_hook::flag::register(signal_hook::consts::SIGHUP, Arc::clone(&quit))?;
    Ok(quit)
}

/// Run a session in the terminal until the user quits.
///
/// Loads the session's video, then multiplexes terminal input, player
/// events and the session's pollers on this thread. The player is shut
/// down before returning.
#[cfg(not(tarpaulin_include))]
pub fn run_looper<P: VideoPlayer>(session: &mut LoopSession<P>) -> Result<LoopOutcome> {
    let quit = register_quit_flag()?;
    session
        .start()
        .with_context(|| format!("Failed to load {}", session.state().video_id))?;

    let mut stdout = io::stdout();
    let guard = TerminalGuard::enter(&mut stdout)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, session, &quit);

    session.teardown();
    drop(terminal);
    drop(guard);

    let interrupted = result?;
    let outcome = LoopOutcome {
        link: session.link(),
        link_url: session.link_url(),
        interrupted,
    };
    info!("looper finished: {}", outcome.link_url);
    Ok(outcome)
}

/// Returns whether a signal ended the loop.
#[cfg(not(tarpaulin_include))]
fn event_loop<P: VideoPlayer>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    session: &mut LoopSession<P>,
    quit: &AtomicBool,
) -> Result<bool> {
    loop {
        if quit.load(Ordering::Relaxed) {
            debug!("quit signal received");
            return Ok(true);
        }

        session.pump_events();
        session.tick(Instant::now());

        if session.state().needs_render {
            let backend = session.player().name();
            let link = session.link_url();
            terminal.draw(|frame| draw(frame, session.state_mut(), backend, &link))?;
        }

        let timeout = session
            .next_wakeup(Instant::now())
            .map_or(IDLE_POLL, |wait| wait.min(IDLE_POLL));

        if event::poll(timeout)? {
            // Drain everything queued so drags don't lag behind
            loop {
                if handle_event(event::read()?, session) == InputResult::Quit {
                    return Ok(false);
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
}
