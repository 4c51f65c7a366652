//! Deterministic virtual-time host
//!
//! Implements the surface, spinner layer and scheduler traits against a
//! shared [`VirtualClock`], and a [`Stage`] that advances the clock and
//! delivers completions and timers to a controller in due order. Used by the
//! terminal demo, the headless simulator and the tests.

mod clock;
mod scheduler;
mod stage;
mod surface;

pub use clock::VirtualClock;
pub use scheduler::VirtualScheduler;
pub use stage::{SimController, SpinnerSnapshot, Stage, StageSnapshot, TraceEvent, TraceKind};
pub use surface::{SimSpinner, SimSurface};
