use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::phase::{ButtonEvent, Completion, Operation, Phase};
use crate::color::Color;
use crate::scheduler::{Scheduler, TimerId, TimerTag};
use crate::spinner::{SpinnerComponent, SpinnerState};
use crate::surface::{AnimationPurpose, ButtonSurface, LayerAnimation};
use crate::timing::TimingProfile;
use crate::{Error, Result};

/// Geometry and label captured for the current cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonVisualState {
    pub original_width: f64,
    pub original_height: f64,
    pub original_corner_radius: f64,
    /// Title at the start of the last loading cycle, `None` before the first one
    pub cached_title: Option<String>,
    pub phase: Phase,
}

/// Drives a button surface through shrink, spin, expand and revert.
///
/// Operations return immediately after scheduling work on the surface. The
/// host reports completed animations and fired timers back through
/// [`handle_event`](Self::handle_event), which runs the next step.
pub struct ButtonAnimationController<S: ButtonSurface, T: Scheduler> {
    surface: S,
    scheduler: T,
    timing: TimingProfile,
    spinner: SpinnerComponent,
    state: ButtonVisualState,
    normal_corner_radius: f64,
    pending_timers: Vec<(TimerId, TimerTag)>,
    on_phase_settled: Option<Completion>,
    on_settled: Option<Completion>,
    on_finished: Option<Completion>,
}

impl<S: ButtonSurface, T: Scheduler> ButtonAnimationController<S, T> {
    /// Take over a surface, capturing its current geometry as the original
    pub fn new(mut surface: S, scheduler: T, timing: TimingProfile) -> Self {
        let size = surface.size();
        let corner_radius = surface.corner_radius();
        surface.set_clips_to_bounds(true);

        let spinner = SpinnerComponent::new(Color::WHITE, timing.spin());
        spinner.attach(surface.spinner_layer());

        Self {
            surface,
            scheduler,
            timing,
            spinner,
            state: ButtonVisualState {
                original_width: size.width,
                original_height: size.height,
                original_corner_radius: corner_radius,
                cached_title: None,
                phase: Phase::Idle,
            },
            normal_corner_radius: corner_radius,
            pending_timers: Vec::new(),
            on_phase_settled: None,
            on_settled: None,
            on_finished: None,
        }
    }

    /// Hide the title and collapse the button into a spinning circle.
    ///
    /// `on_phase_settled` runs once the corners are round and the shrink has
    /// been scheduled, before the spinner shows.
    pub fn begin_loading(&mut self, on_phase_settled: Option<Completion>) -> Result<()> {
        self.require(Operation::BeginLoading, &[Phase::Idle])?;

        let size = self.surface.size();
        self.state.cached_title = Some(self.surface.title().unwrap_or_default().to_string());
        self.surface.set_title(Some(""));
        self.state.original_width = size.width;
        self.state.original_height = size.height;
        self.state.original_corner_radius = self.surface.corner_radius();
        self.on_phase_settled = on_phase_settled;

        self.set_phase(Phase::Shrinking);
        self.surface.add_animation(LayerAnimation::new(
            AnimationPurpose::RoundCorners,
            self.state.original_corner_radius,
            size.height / 2.0,
            self.timing.corner_radius(),
        ));
        Ok(())
    }

    /// Restore the title and morph the spinner back into the button.
    ///
    /// `on_settled` runs once the corners are restored and the width revert
    /// has been scheduled.
    pub fn cancel_loading(&mut self, on_settled: Option<Completion>) -> Result<()> {
        self.require(Operation::CancelLoading, &[Phase::Spinning])?;

        self.surface.set_title(self.state.cached_title.as_deref());
        self.spinner.stop(self.surface.spinner_layer());
        self.on_settled = on_settled;

        self.set_phase(Phase::Reverting);
        self.surface.add_animation(LayerAnimation::new(
            AnimationPurpose::RestoreCorners,
            self.state.original_height / 2.0,
            self.state.original_corner_radius,
            self.timing.corner_radius(),
        ));
        Ok(())
    }

    /// Stop the spinner and flood the surface with the button.
    ///
    /// `on_finished` runs when the scale-up completes, then the button resets
    /// itself after the success hold.
    pub fn begin_success(&mut self, on_finished: Option<Completion>) -> Result<()> {
        self.require(
            Operation::BeginSuccess,
            &[Phase::Shrinking, Phase::Spinning],
        )?;

        self.on_finished = on_finished;
        self.spinner.stop(self.surface.spinner_layer());
        self.cancel_timers(TimerTag::StartSpinner);

        self.set_phase(Phase::Expanding);
        self.surface.add_animation(LayerAnimation::new(
            AnimationPurpose::Expand,
            TimingProfile::EXPAND_SCALE_FROM,
            TimingProfile::EXPAND_SCALE_TO,
            self.timing.expand(),
        ));
        Ok(())
    }

    /// Start loading and succeed straight away.
    ///
    /// The expansion does not wait for the shrink: both run at once.
    pub fn run_full_cycle(&mut self, on_finished: Option<Completion>) -> Result<()> {
        self.require(Operation::RunFullCycle, &[Phase::Idle])?;
        self.begin_loading(None)?;
        self.begin_success(on_finished)
    }

    /// Hard reset from any phase.
    ///
    /// Animations are dropped without completion events and pending callbacks
    /// never run. Committed geometry is left as is, so the presented geometry
    /// falls back to it.
    pub fn reset_to_original(&mut self) {
        self.surface.remove_all_animations();
        for (id, tag) in self.pending_timers.drain(..) {
            debug!("Cancelling {} timer", tag);
            self.scheduler.cancel(id);
        }

        let dropped = [
            self.on_phase_settled.take(),
            self.on_settled.take(),
            self.on_finished.take(),
        ]
        .into_iter()
        .flatten()
        .count();
        if dropped > 0 {
            debug!("Reset dropped {} pending callback(s)", dropped);
        }

        if let Some(title) = self.state.cached_title.as_deref() {
            self.surface.set_title(Some(title));
        }
        self.spinner.stop(self.surface.spinner_layer());
        self.set_phase(Phase::Idle);
    }

    /// Route a completion or timer notification from the host
    pub fn handle_event(&mut self, event: ButtonEvent) {
        match event {
            ButtonEvent::AnimationFinished { purpose } => self.on_animation_finished(purpose),
            ButtonEvent::TimerFired { id, tag } => self.on_timer_fired(id, tag),
        }
    }

    fn on_animation_finished(&mut self, purpose: AnimationPurpose) {
        match (purpose, self.state.phase) {
            // Expanding here means run_full_cycle overtook the loading morph:
            // the shrink still plays, the spinner stays off.
            (AnimationPurpose::RoundCorners, Phase::Shrinking | Phase::Expanding) => {
                self.surface.add_animation(LayerAnimation::new(
                    AnimationPurpose::Shrink,
                    self.state.original_width,
                    self.state.original_height,
                    self.timing.shrink(),
                ));
                if self.state.phase == Phase::Shrinking {
                    self.arm_timer(self.timing.spinner_start_delay(), TimerTag::StartSpinner);
                }
                if let Some(callback) = self.on_phase_settled.take() {
                    callback();
                }
            }
            (AnimationPurpose::RestoreCorners, Phase::Reverting) => {
                self.surface.add_animation(LayerAnimation::new(
                    AnimationPurpose::RevertShrink,
                    self.state.original_height,
                    self.state.original_width,
                    self.timing.shrink(),
                ));
                if let Some(callback) = self.on_settled.take() {
                    callback();
                }
            }
            (AnimationPurpose::RevertShrink, Phase::Reverting) => {
                // Committed geometry shows again once the fills are gone
                self.surface.remove_all_animations();
                self.set_phase(Phase::Idle);
            }
            (AnimationPurpose::Expand, Phase::Expanding) => {
                if let Some(callback) = self.on_finished.take() {
                    callback();
                }
                self.cancel_timers(TimerTag::RevertToOriginal);
                self.arm_timer(self.timing.success_hold(), TimerTag::RevertToOriginal);
            }
            (purpose, phase) => {
                debug!("Ignoring {:?} completion while {}", purpose, phase);
            }
        }
    }

    fn on_timer_fired(&mut self, id: TimerId, tag: TimerTag) {
        let Some(index) = self.pending_timers.iter().position(|(pending, _)| *pending == id) else {
            debug!("Ignoring stale {} timer {:?}", tag, id);
            return;
        };
        self.pending_timers.remove(index);

        match tag {
            TimerTag::StartSpinner => {
                if self.state.phase == Phase::Shrinking {
                    self.set_phase(Phase::Spinning);
                    self.spinner.start(self.surface.spinner_layer());
                } else {
                    debug!("Spinner start skipped while {}", self.state.phase);
                }
            }
            TimerTag::RevertToOriginal => self.reset_to_original(),
        }
    }

    fn arm_timer(&mut self, delay: std::time::Duration, tag: TimerTag) {
        let id = self.scheduler.schedule(delay, tag);
        self.pending_timers.push((id, tag));
    }

    fn cancel_timers(&mut self, tag: TimerTag) {
        let scheduler = &mut self.scheduler;
        self.pending_timers.retain(|(id, pending)| {
            if *pending == tag {
                scheduler.cancel(*id);
                false
            } else {
                true
            }
        });
    }

    fn require(&self, operation: Operation, allowed: &[Phase]) -> Result<()> {
        let phase = self.state.phase;
        if allowed.contains(&phase) {
            Ok(())
        } else {
            warn!("Ignoring {} while {}", operation, phase);
            Err(Error::UnexpectedPhase { operation, phase })
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.state.phase != phase {
            info!("Button phase {} -> {}", self.state.phase, phase);
            self.state.phase = phase;
        }
    }

    /// Recolor the spinner, applied immediately
    pub fn set_spinner_color(&mut self, color: Color) {
        self.spinner.set_color(self.surface.spinner_layer(), color);
    }

    pub fn spinner_color(&self) -> Color {
        self.spinner.color()
    }

    /// Write the committed corner radius. It also becomes the radius a
    /// cancel or hard reset returns to, even mid-cycle.
    pub fn set_normal_corner_radius(&mut self, radius: f64) {
        self.normal_corner_radius = radius;
        self.surface.set_corner_radius(radius);
        self.state.original_corner_radius = radius;
    }

    pub fn normal_corner_radius(&self) -> f64 {
        self.normal_corner_radius
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn visual_state(&self) -> &ButtonVisualState {
        &self.state
    }

    pub fn spinner_state(&self) -> SpinnerState {
        self.spinner.state()
    }

    pub fn timing(&self) -> &TimingProfile {
        &self.timing
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }
}
