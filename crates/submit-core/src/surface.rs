//! Host rendering surface the button animates against
//!
//! The host toolkit owns the actual layer tree. The controller only needs
//! committed geometry and label access, keyed property animations and a
//! handle to the spinner's own sublayer.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::timing::{Curve, TimingEntry};

/// Bounding box size in points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Property slot an animation is keyed on.
/// Adding an animation to an occupied slot replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKey {
    CornerRadius,
    Width,
    Scale,
}

impl fmt::Display for AnimationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnimationKey::CornerRadius => "cornerRadius",
            AnimationKey::Width => "bounds.size.width",
            AnimationKey::Scale => "transform.scale",
        };
        f.write_str(name)
    }
}

/// Why an animation was scheduled. Completion events carry it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationPurpose {
    /// Corner radius to height/2 at loading start
    RoundCorners,
    /// Width from original to height
    Shrink,
    /// Corner radius back to the original on cancel
    RestoreCorners,
    /// Width from height back to original on cancel
    RevertShrink,
    /// Scale-up on success
    Expand,
}

impl AnimationPurpose {
    /// Property slot animations of this purpose occupy
    pub fn key(self) -> AnimationKey {
        match self {
            AnimationPurpose::RoundCorners | AnimationPurpose::RestoreCorners => {
                AnimationKey::CornerRadius
            }
            AnimationPurpose::Shrink | AnimationPurpose::RevertShrink => AnimationKey::Width,
            AnimationPurpose::Expand => AnimationKey::Scale,
        }
    }
}

/// A presentation-only property animation.
///
/// Never writes the committed value. With `fill_forward` the end value stays
/// presented after completion until the animation is removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerAnimation {
    pub purpose: AnimationPurpose,
    pub from: f64,
    pub to: f64,
    pub curve: Curve,
    pub duration: Duration,
    pub fill_forward: bool,
}

impl LayerAnimation {
    /// Fill-forward animation timed by a timing table entry
    pub fn new(purpose: AnimationPurpose, from: f64, to: f64, timing: TimingEntry) -> Self {
        Self {
            purpose,
            from,
            to,
            curve: timing.curve,
            duration: timing.duration,
            fill_forward: true,
        }
    }

    pub fn key(&self) -> AnimationKey {
        self.purpose.key()
    }

    /// Value presented `progress` (0.0 to 1.0) of the way through
    pub fn value_at(&self, progress: f64) -> f64 {
        crate::timing::lerp(self.from, self.to, self.curve.evaluate(progress))
    }
}

/// Repeating rotation applied to the spinner sublayer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Duration of one full turn
    pub period: Duration,
    pub curve: Curve,
}

impl Rotation {
    /// Angle in radians after `elapsed`, wrapped to one turn
    pub fn angle_at(&self, elapsed: Duration) -> f64 {
        if self.period.is_zero() {
            return 0.0;
        }
        let turns = elapsed.as_secs_f64() / self.period.as_secs_f64();
        self.curve.evaluate(turns.fract()) * std::f64::consts::TAU
    }
}

/// The spinner's own sublayer
pub trait SpinnerLayer {
    fn set_stroke_color(&mut self, color: Color);

    fn set_hidden(&mut self, hidden: bool);

    /// Start an indefinitely repeating rotation
    fn add_rotation(&mut self, rotation: Rotation);

    /// Remove the rotation, keeping the last drawn angle
    fn remove_rotation(&mut self);
}

/// The control's primary layer as seen by the animation controller
pub trait ButtonSurface {
    type Spinner: SpinnerLayer;

    /// Committed bounding box size
    fn size(&self) -> Size;

    /// Committed corner radius
    fn corner_radius(&self) -> f64;

    fn set_corner_radius(&mut self, radius: f64);

    fn title(&self) -> Option<&str>;

    fn set_title(&mut self, title: Option<&str>);

    fn set_clips_to_bounds(&mut self, clips: bool);

    /// Schedule an animation on its property slot, replacing any animation
    /// already there. Completion arrives as a host event carrying the purpose.
    fn add_animation(&mut self, animation: LayerAnimation);

    /// Drop every animation on the primary layer without completion events
    fn remove_all_animations(&mut self);

    fn spinner_layer(&mut self) -> &mut Self::Spinner;
}
