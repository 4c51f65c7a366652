use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Frame clock and input pump for the interactive demo.
///
/// The stage runs on wall-clock time: each frame advances it by however long
/// the previous frame took, and input is only collected until the next frame
/// is due.
pub struct EventHandler {
    frame_budget: Duration,
    last_frame: Instant,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self {
            frame_budget: Duration::from_millis(tick_rate_ms.max(1)),
            last_frame: Instant::now(),
        }
    }

    /// Time since the previous frame. Restarts the frame clock.
    pub fn frame(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        elapsed
    }

    /// Wait out the rest of the frame budget for input, then drain anything
    /// else already queued
    pub fn input(&self) -> Result<Vec<AppEvent>> {
        let mut events = Vec::new();
        let mut wait = poll_timeout(self.frame_budget, self.last_frame.elapsed());
        while event::poll(wait)? {
            if let Some(event) = translate(event::read()?) {
                events.push(event);
            }
            wait = Duration::ZERO;
        }
        Ok(events)
    }
}

fn poll_timeout(budget: Duration, spent: Duration) -> Duration {
    budget.saturating_sub(spent)
}

fn translate(event: Event) -> Option<AppEvent> {
    match event {
        // Release and repeat events arrive on some terminals
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

/// Application events
#[derive(Debug, PartialEq, Eq)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
}
