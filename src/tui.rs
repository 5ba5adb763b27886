use std::io::{self, Stderr};
use std::time::Duration;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::debug;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Interval of the tick that animates the "Thinking..." placeholder and
/// lets the main loop notice finished replies
pub const TICK_RATE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Merges the crossterm event stream and a tick timer into one channel
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<TerminalEvent>,
    _tx: mpsc::UnboundedSender<TerminalEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let tx_events = tx.clone();
        tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            while let Some(evt) = reader.next().await {
                let terminal_event = match evt {
                    // Key release events are reported on some platforms; ignore them
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Some(TerminalEvent::Key(key)),
                    Ok(Event::Mouse(mouse)) => Some(TerminalEvent::Mouse(mouse)),
                    Ok(Event::Resize(w, h)) => Some(TerminalEvent::Resize(w, h)),
                    Ok(_) => None,
                    Err(err) => {
                        // The stream does not recover; stop instead of spinning on errors
                        debug!(error = %err, "terminal event stream failed");
                        break;
                    }
                };

                if let Some(terminal_event) = terminal_event {
                    if tx_events.send(terminal_event).is_err() {
                        break;
                    }
                }
            }
        });

        let tx_tick = tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tx_tick.send(TerminalEvent::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx: tx }
    }

    pub async fn next(&mut self) -> Option<TerminalEvent> {
        self.rx.recv().await
    }
}

/// Raw mode, alternate screen and mouse capture, in that order
fn enter_terminal_modes() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)
}

/// Undo [`enter_terminal_modes`] in reverse order
fn leave_terminal_modes() -> io::Result<()> {
    execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()
}

pub fn init() -> Result<Tui> {
    enter_terminal_modes()?;

    match Terminal::new(CrosstermBackend::new(io::stderr())) {
        Ok(terminal) => Ok(terminal),
        Err(err) => {
            // Don't leave the shell in raw mode if the backend can't start
            let _ = leave_terminal_modes();
            Err(err.into())
        }
    }
}

pub fn restore() -> Result<()> {
    leave_terminal_modes()?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = leave_terminal_modes();
        original_hook(panic_info);
    }));
}
