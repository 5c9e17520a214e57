//! Terminal user interface (TUI) for helpdesk.
//!
//! ## Entry points
//!
//! - [`run_tui`]: full-screen console with the tickets, knowledgebase and
//!   live logs views.

pub mod app;
pub mod knowledgebase;
pub mod logs;
pub mod markdown;
pub mod tickets;

use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, info};

/// Raw mode plus the alternate screen, undone on drop.
///
/// Where the terminal supports it, key disambiguation is switched on so that
/// Ctrl+I is reported apart from Tab.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err).context("failed to enter alternate screen");
        }

        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(info);
        }));

        let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false)
            && execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
            )
            .is_ok();
        debug!(keyboard_enhanced, "terminal ready");

        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self {
            terminal,
            keyboard_enhanced,
        })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(self.terminal.backend_mut(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the console until the user quits.
///
/// Draws, waits up to `tick_rate` for a key, then lets the active view do its
/// housekeeping (draining log entries, expiring notices).
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn or read.
pub fn run_tui(app: &mut App, tick_rate: Duration) -> Result<()> {
    let mut guard = TerminalGuard::enter()?;
    app.set_keyboard_enhanced(guard.keyboard_enhanced);
    info!(route = %app.route(), "console started");

    let result = event_loop(&mut guard.terminal, app, tick_rate);

    app.shutdown();
    drop(guard);
    info!("console closed");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;
        if app.should_quit() {
            return Ok(());
        }

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Resize(width, height) => debug!(width, height, "terminal resized"),
                _ => {}
            }
        }

        app.tick();
    }
}
