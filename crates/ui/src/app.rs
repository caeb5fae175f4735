use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use tracing::{debug, info, warn};

use crate::bar::Orientation;
use crate::queue::UpdateReceiver;
use crate::terminal::TerminalGuard;
use crate::theme::{DisplayConfig, MeterTheme};
use crate::view::{LevelBar, MeterView};
use crate::UiError;

/// Asks a running [`MeterApp`] to leave its loop. Cheap to clone, usable from
/// any thread.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    stop: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// Owns the terminal and all drawing. Level updates reach it only through the
/// queue.
pub struct MeterApp {
    view: MeterView,
    theme: MeterTheme,
    orientation: Orientation,
    updates: UpdateReceiver,
    stop: StopHandle,
    frame_interval: Duration,
}

impl MeterApp {
    pub fn new(
        display: &DisplayConfig,
        updates: UpdateReceiver,
        frame_interval: Duration,
    ) -> Result<Self, UiError> {
        Ok(Self {
            view: MeterView::default(),
            theme: MeterTheme::from_config(display)?,
            orientation: display.orientation,
            updates,
            stop: StopHandle::default(),
            frame_interval,
        })
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn view(&self) -> &MeterView {
        &self.view
    }

    /// Applies every queued update in arrival order. Returns how many there were.
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Some(frame) = self.updates.pop() {
            self.view.apply(&frame);
            applied += 1;
        }
        applied
    }

    pub fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<(), UiError> {
        terminal.draw(|frame| {
            frame.render_widget(
                LevelBar::new(&self.view, &self.theme, self.orientation),
                frame.area(),
            )
        })?;
        Ok(())
    }

    /// Blocks until a stop is requested, the user quits, or the terminal fails.
    pub fn run(mut self) -> Result<(), UiError> {
        let mut terminal = TerminalGuard::new()?;
        info!(orientation = ?self.orientation, "meter ui started");

        let mut dirty = true;
        while !self.stop.is_stop_requested() {
            if self.apply_pending() > 0 {
                dirty = true;
            }
            if dirty {
                if let Err(err) = self.draw(&mut *terminal) {
                    warn!(%err, "failed to draw level bar");
                }
                dirty = false;
            }

            if event::poll(self.frame_interval)? {
                match event::read()? {
                    Event::Key(key) if is_quit(&key) => {
                        info!("quit requested from keyboard");
                        break;
                    }
                    Event::Resize(width, height) => {
                        debug!(width, height, "terminal resized");
                        dirty = true;
                    }
                    _ => {}
                }
            }
        }

        info!("meter ui stopped");
        Ok(())
    }
}

// Raw mode swallows the terminal's SIGINT, so Ctrl+C arrives as a key.
fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
