//! The submit button's morph cycle
//!
//! ```text
//! Idle ─begin_loading─▶ Shrinking ─timer─▶ Spinning ─cancel_loading─▶ Reverting ─▶ Idle
//!                           │                 │
//!                           └──begin_success──┴──▶ Expanding ─hold─▶ Idle
//! ```
//!
//! `reset_to_original` returns to `Idle` from anywhere.

mod controller;
mod phase;

pub use controller::{ButtonAnimationController, ButtonVisualState};
pub use phase::{ButtonEvent, Completion, Operation, Phase};
