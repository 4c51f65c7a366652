//! Timing for button transitions
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing curves (named and cubic bezier)
//! - `interpolate` - Progress, interpolation and duration helpers
//!
//! ## L3 Molecular Layer
//! - `profile` - The constant curve/duration table every transition reads

// L4 Atomic Layer
pub mod easing;
pub mod interpolate;

// L3 Molecular Layer
pub mod profile;

pub use easing::Curve;
pub use interpolate::{is_complete, lerp, progress, seconds};
pub use profile::{TimingEntry, TimingProfile, Transition};
