use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use super::clock::VirtualClock;
use super::scheduler::VirtualScheduler;
use super::surface::SimSurface;
use crate::button::{ButtonAnimationController, ButtonEvent, Completion, Operation, Phase};
use crate::color::Color;
use crate::config::AppConfig;
use crate::surface::{ButtonSurface, Size};
use crate::timing::TimingProfile;
use crate::Result;

pub type SimController = ButtonAnimationController<SimSurface, VirtualScheduler>;

/// What happened on the stage, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceKind {
    /// A public operation was called
    Operation { operation: Operation, accepted: bool },
    /// A completion or timer was delivered to the controller
    Dispatched { event: ButtonEvent },
    PhaseChanged { from: Phase, to: Phase },
    /// The completion passed to an operation ran
    Callback { operation: Operation },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEvent {
    pub at_ms: f64,
    #[serde(flatten)]
    pub kind: TraceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinnerSnapshot {
    pub running: bool,
    pub visible: bool,
    pub angle: f64,
    pub color: Color,
}

/// Presented state of the button at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageSnapshot {
    pub at_ms: f64,
    pub phase: Phase,
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub scale: f64,
    pub spinner: SpinnerSnapshot,
}

enum Source {
    Animation,
    Timer,
}

/// A controller over a virtual-time host.
///
/// Nothing moves until [`advance`](Self::advance) is called, which delivers
/// every completion and timer that falls due, earliest first.
pub struct Stage {
    clock: VirtualClock,
    controller: SimController,
    trace: Vec<TraceEvent>,
    callbacks: Rc<RefCell<Vec<TraceEvent>>>,
}

impl Stage {
    pub fn new(size: Size, corner_radius: f64, title: &str, timing: TimingProfile) -> Self {
        let clock = VirtualClock::new();
        let surface = SimSurface::new(clock.clone(), size, corner_radius, Some(title));
        let scheduler = VirtualScheduler::new(clock.clone());
        Self {
            controller: ButtonAnimationController::new(surface, scheduler, timing),
            clock,
            trace: Vec::new(),
            callbacks: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Stage for the `[button]` and `[timing]` config sections
    pub fn from_config(config: &AppConfig) -> Self {
        let button = &config.button;
        let mut stage = Self::new(
            Size::new(button.width, button.height),
            button.corner_radius,
            &button.title,
            config.timing_profile(),
        );
        stage.controller.set_spinner_color(button.spinner_color);
        stage
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn controller(&self) -> &SimController {
        &self.controller
    }

    /// Direct access for property setters. Operations called through here
    /// are not traced.
    pub fn controller_mut(&mut self) -> &mut SimController {
        &mut self.controller
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn surface(&self) -> &SimSurface {
        self.controller.surface()
    }

    pub fn begin_loading(&mut self, on_phase_settled: Option<Completion>) -> Result<()> {
        let callback = self.observe(Operation::BeginLoading, on_phase_settled);
        self.operation(Operation::BeginLoading, |c| c.begin_loading(callback))
    }

    pub fn cancel_loading(&mut self, on_settled: Option<Completion>) -> Result<()> {
        let callback = self.observe(Operation::CancelLoading, on_settled);
        self.operation(Operation::CancelLoading, |c| c.cancel_loading(callback))
    }

    pub fn begin_success(&mut self, on_finished: Option<Completion>) -> Result<()> {
        let callback = self.observe(Operation::BeginSuccess, on_finished);
        self.operation(Operation::BeginSuccess, |c| c.begin_success(callback))
    }

    pub fn run_full_cycle(&mut self, on_finished: Option<Completion>) -> Result<()> {
        let callback = self.observe(Operation::RunFullCycle, on_finished);
        self.operation(Operation::RunFullCycle, |c| c.run_full_cycle(callback))
    }

    /// Hard reset. Never rejected, so there is no result to hand back.
    pub fn reset_to_original(&mut self) {
        let before = self.controller.phase();
        self.controller.reset_to_original();
        self.settle_operation(Operation::ResetToOriginal, true, before);
    }

    /// Wrap a completion so the trace records when it runs
    fn observe(&self, operation: Operation, callback: Option<Completion>) -> Option<Completion> {
        let clock = self.clock.clone();
        let callbacks = Rc::clone(&self.callbacks);
        Some(Box::new(move || {
            callbacks.borrow_mut().push(TraceEvent {
                at_ms: millis(clock.now()),
                kind: TraceKind::Callback { operation },
            });
            if let Some(callback) = callback {
                callback();
            }
        }))
    }

    fn operation<F>(&mut self, operation: Operation, f: F) -> Result<()>
    where
        F: FnOnce(&mut SimController) -> Result<()>,
    {
        let before = self.controller.phase();
        let result = f(&mut self.controller);
        self.settle_operation(operation, result.is_ok(), before);
        result
    }

    /// Trace a finished call along with whatever it ran or changed
    fn settle_operation(&mut self, operation: Operation, accepted: bool, before: Phase) {
        self.record(TraceKind::Operation {
            operation,
            accepted,
        });
        self.collect_callbacks();
        self.record_phase_change(before);
    }

    /// Move virtual time forward by `dt`, delivering everything due on the way
    pub fn advance(&mut self, dt: Duration) {
        let target = self.clock.now() + dt;
        while let Some((due, source)) = self.next_due() {
            if due > target {
                break;
            }
            self.clock.advance_to(due);
            self.dispatch(source);
        }
        self.clock.advance_to(target);
    }

    /// Advance until no animation or timer is pending, or `limit` elapses.
    /// Returns whether the stage settled.
    pub fn run_until_settled(&mut self, limit: Duration) -> bool {
        let deadline = self.clock.now() + limit;
        while let Some((due, _)) = self.next_due() {
            if due > deadline {
                self.clock.advance_to(deadline);
                return false;
            }
            let now = self.clock.now();
            self.advance(due.saturating_sub(now));
        }
        true
    }

    pub fn is_settled(&self) -> bool {
        self.next_due().is_none()
    }

    fn next_due(&self) -> Option<(Duration, Source)> {
        let animation = self.controller.surface().next_completion();
        let timer = self.controller.scheduler().next_due();
        match (animation, timer) {
            (Some(a), Some(t)) if t < a => Some((t.0, Source::Timer)),
            (Some(a), _) => Some((a.0, Source::Animation)),
            (None, Some(t)) => Some((t.0, Source::Timer)),
            (None, None) => None,
        }
    }

    fn dispatch(&mut self, source: Source) {
        let event = match source {
            Source::Animation => self
                .controller
                .surface_mut()
                .complete_next()
                .map(|purpose| ButtonEvent::AnimationFinished { purpose }),
            Source::Timer => self
                .controller
                .scheduler_mut()
                .pop_next()
                .map(|(id, tag)| ButtonEvent::TimerFired { id, tag }),
        };
        let Some(event) = event else {
            return;
        };

        debug!("Dispatching {:?} at {:?}", event, self.clock.now());
        let before = self.controller.phase();
        self.record(TraceKind::Dispatched { event });
        self.controller.handle_event(event);
        self.collect_callbacks();
        self.record_phase_change(before);
    }

    fn record_phase_change(&mut self, before: Phase) {
        let after = self.controller.phase();
        if after != before {
            self.record(TraceKind::PhaseChanged {
                from: before,
                to: after,
            });
        }
    }

    fn collect_callbacks(&mut self) {
        self.trace.append(&mut self.callbacks.borrow_mut());
    }

    fn record(&mut self, kind: TraceKind) {
        self.trace.push(TraceEvent {
            at_ms: millis(self.clock.now()),
            kind,
        });
    }

    pub fn trace(&self) -> &[TraceEvent] {
        &self.trace
    }

    pub fn take_trace(&mut self) -> Vec<TraceEvent> {
        std::mem::take(&mut self.trace)
    }

    pub fn snapshot(&self) -> StageSnapshot {
        let surface = self.controller.surface();
        let spinner = surface.spinner();
        StageSnapshot {
            at_ms: millis(self.clock.now()),
            phase: self.controller.phase(),
            title: surface.title().unwrap_or_default().to_string(),
            width: surface.presented_width(),
            height: surface.size().height,
            corner_radius: surface.presented_corner_radius(),
            scale: surface.presented_scale(),
            spinner: SpinnerSnapshot {
                running: self.controller.spinner_state().running,
                visible: !spinner.is_hidden(),
                angle: spinner.angle(),
                color: spinner.color(),
            },
        }
    }
}

fn millis(at: Duration) -> f64 {
    at.as_micros() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> Stage {
        Stage::new(Size::new(200.0, 44.0), 4.0, "Submit", TimingProfile::default())
    }

    #[test]
    fn test_events_fire_in_due_order() {
        let mut stage = stage();
        stage.begin_loading(None).unwrap();
        stage.advance(Duration::from_millis(100));

        // Corner rounding finishes first, then the zero-delay spinner timer
        let kinds: Vec<_> = stage
            .trace()
            .iter()
            .map(|e| e.kind.clone())
            .filter(|kind| !matches!(kind, TraceKind::Callback { .. }))
            .collect();
        assert!(matches!(
            kinds[2],
            TraceKind::Dispatched {
                event: ButtonEvent::AnimationFinished { .. }
            }
        ));
        assert!(matches!(
            kinds[3],
            TraceKind::Dispatched {
                event: ButtonEvent::TimerFired { .. }
            }
        ));
        assert_eq!(
            kinds[4],
            TraceKind::PhaseChanged {
                from: Phase::Shrinking,
                to: Phase::Spinning
            }
        );
        assert_eq!(stage.phase(), Phase::Spinning);
    }

    #[test]
    fn test_run_until_settled_stops_at_limit() {
        let mut stage = stage();
        stage.begin_loading(None).unwrap();
        stage.advance(Duration::from_millis(200));
        stage.begin_success(None).unwrap();

        assert!(!stage.run_until_settled(Duration::from_millis(100)));
        assert_eq!(stage.now(), Duration::from_millis(300));

        assert!(stage.run_until_settled(Duration::from_secs(5)));
        assert_eq!(stage.phase(), Phase::Idle);
        assert!(stage.is_settled());
    }

    #[test]
    fn test_callbacks_are_traced() {
        let mut stage = stage();
        stage.begin_loading(None).unwrap();
        stage.advance(Duration::from_millis(200));
        stage.begin_success(None).unwrap();
        stage.advance(Duration::from_millis(300));

        let callbacks: Vec<_> = stage
            .trace()
            .iter()
            .filter(|e| matches!(e.kind, TraceKind::Callback { .. }))
            .map(|e| (e.at_ms, e.kind.clone()))
            .collect();
        assert_eq!(
            callbacks,
            vec![
                (
                    100.0,
                    TraceKind::Callback {
                        operation: Operation::BeginLoading
                    }
                ),
                (
                    500.0,
                    TraceKind::Callback {
                        operation: Operation::BeginSuccess
                    }
                ),
            ]
        );

        // A rejected operation never runs its callback
        stage.cancel_loading(None).unwrap_err();
        stage.run_until_settled(Duration::from_secs(5));
        assert!(!stage
            .trace()
            .iter()
            .any(|e| e.kind == TraceKind::Callback { operation: Operation::CancelLoading }));
    }

    #[test]
    fn test_reset_is_traced_as_accepted() {
        let mut stage = stage();
        stage.begin_loading(None).unwrap();
        stage.advance(Duration::from_millis(150));
        stage.take_trace();

        stage.reset_to_original();

        let kinds: Vec<_> = stage.take_trace().into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TraceKind::Operation {
                    operation: Operation::ResetToOriginal,
                    accepted: true
                },
                TraceKind::PhaseChanged {
                    from: Phase::Spinning,
                    to: Phase::Idle
                },
            ]
        );

        // Resetting an idle control is still a traced call, with no phase change
        stage.reset_to_original();
        assert_eq!(
            stage.take_trace().into_iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec![TraceKind::Operation {
                operation: Operation::ResetToOriginal,
                accepted: true
            }]
        );
    }

    #[test]
    fn test_from_config_applies_button_section() {
        let mut config = AppConfig::default();
        config.button.title = "Pay".to_string();
        config.button.spinner_color = Color::rgb(0x10, 0x20, 0x30);

        let stage = Stage::from_config(&config);
        let snapshot = stage.snapshot();
        assert_eq!(snapshot.title, "Pay");
        assert_eq!(snapshot.width, 200.0);
        assert_eq!(snapshot.spinner.color, Color::rgb(0x10, 0x20, 0x30));
        assert!(!snapshot.spinner.visible);
        assert_eq!(stage.surface().title(), Some("Pay"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_value(stage().snapshot()).unwrap();
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["spinner"]["color"], "#ffffff");
    }
}
