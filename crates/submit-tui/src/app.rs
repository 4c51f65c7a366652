use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use submit_core::sim::{Stage, StageSnapshot};
use submit_core::{AppConfig, Completion, Operation};
use tracing::debug;

use crate::input::Action;
use crate::theme::Theme;

/// Interactive demo state: one button on a wall-clock stage
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub stage: Stage,
    pub should_quit: bool,
    /// Status message to display
    pub status_message: Option<String>,
    /// The status message reports a rejected action
    pub status_is_warning: bool,
    /// Success callbacks that have run
    finished: Rc<Cell<u32>>,
    /// Cancel callbacks that have run
    settled: Rc<Cell<u32>>,
}

impl App {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            theme: Theme::from_config(&config.ui),
            stage: Stage::from_config(&config),
            config,
            should_quit: false,
            status_message: None,
            status_is_warning: false,
            finished: Rc::new(Cell::new(0)),
            settled: Rc::new(Cell::new(0)),
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        let (operation, result) = match action {
            Action::Quit => {
                self.should_quit = true;
                return;
            }
            Action::None => return,
            Action::BeginLoading => (Operation::BeginLoading, self.stage.begin_loading(None)),
            Action::CancelLoading => {
                let callback = count(&self.settled);
                (Operation::CancelLoading, self.stage.cancel_loading(callback))
            }
            Action::BeginSuccess => {
                let callback = count(&self.finished);
                (Operation::BeginSuccess, self.stage.begin_success(callback))
            }
            Action::RunFullCycle => {
                let callback = count(&self.finished);
                (Operation::RunFullCycle, self.stage.run_full_cycle(callback))
            }
            Action::Reset => {
                self.stage.reset_to_original();
                (Operation::ResetToOriginal, Ok(()))
            }
        };

        match result {
            Ok(()) => self.set_status(operation.to_string()),
            Err(e) => self.set_warning(format!("Ignored: {}", e)),
        }
    }

    /// Advance the stage by the wall-clock time since the last frame
    pub fn tick(&mut self, elapsed: Duration) {
        self.stage.advance(elapsed);
        for event in self.stage.take_trace() {
            debug!(at_ms = event.at_ms, "{:?}", event.kind);
        }
    }

    pub fn snapshot(&self) -> StageSnapshot {
        self.stage.snapshot()
    }

    pub fn finished_count(&self) -> u32 {
        self.finished.get()
    }

    pub fn settled_count(&self) -> u32 {
        self.settled.get()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_warning = false;
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_warning = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_warning = false;
    }
}

fn count(counter: &Rc<Cell<u32>>) -> Option<Completion> {
    let counter = Rc::clone(counter);
    Some(Box::new(move || counter.set(counter.get() + 1)))
}

#[cfg(test)]
mod tests {
    use submit_core::Phase;

    use super::*;

    fn app() -> App {
        App::new(Arc::new(AppConfig::default()))
    }

    #[test]
    fn test_actions_drive_the_stage() {
        let mut app = app();
        app.handle_action(Action::BeginLoading);
        assert_eq!(app.snapshot().phase, Phase::Shrinking);
        assert_eq!(app.status_message.as_deref(), Some("begin_loading"));

        app.tick(Duration::from_millis(200));
        assert_eq!(app.snapshot().phase, Phase::Spinning);

        app.handle_action(Action::BeginSuccess);
        app.tick(Duration::from_millis(300));
        assert_eq!(app.finished_count(), 1);

        app.tick(Duration::from_secs(1));
        assert_eq!(app.snapshot().phase, Phase::Idle);
    }

    #[test]
    fn test_cancel_counts_settled() {
        let mut app = app();
        app.handle_action(Action::BeginLoading);
        app.tick(Duration::from_millis(200));
        app.handle_action(Action::CancelLoading);
        app.tick(Duration::from_millis(100));
        assert_eq!(app.settled_count(), 1);
        assert_eq!(app.finished_count(), 0);
    }

    #[test]
    fn test_rejected_action_sets_status() {
        let mut app = app();
        app.handle_action(Action::CancelLoading);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Ignored: cancel_loading is not allowed while idle")
        );
        assert!(app.status_is_warning);
        assert_eq!(app.snapshot().phase, Phase::Idle);

        app.handle_action(Action::BeginLoading);
        assert!(!app.status_is_warning);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        app.handle_action(Action::Quit);
        assert!(app.should_quit);
        app.clear_status();
        assert!(app.status_message.is_none());
    }
}
