//! Indeterminate spinner drawn over the collapsed button

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::Color;
use crate::surface::{Rotation, SpinnerLayer};
use crate::timing::TimingEntry;

/// Color and run state of the spinner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinnerState {
    pub color: Color,
    pub running: bool,
}

/// Arc drawn by the spinner layer, derived from the button height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinnerGeometry {
    /// Side of the square frame the arc sits in
    pub frame_side: f64,
    pub radius: f64,
    /// Fraction of the full circle that is stroked
    pub stroke_end: f64,
    pub line_width: f64,
    /// Angle of the stroke start before rotation, in radians (12 o'clock)
    pub start_angle: f64,
}

impl SpinnerGeometry {
    pub fn for_height(height: f64) -> Self {
        Self {
            frame_side: height,
            radius: height / 4.0,
            stroke_end: 0.4,
            line_width: 1.0,
            start_angle: -std::f64::consts::FRAC_PI_2,
        }
    }
}

/// Owns the spinner's state and drives its sublayer.
///
/// Never touches the host control's geometry or title.
#[derive(Debug, Clone)]
pub struct SpinnerComponent {
    state: SpinnerState,
    rotation: Rotation,
}

impl SpinnerComponent {
    pub fn new(color: Color, spin: TimingEntry) -> Self {
        Self {
            state: SpinnerState {
                color,
                running: false,
            },
            rotation: Rotation {
                period: spin.duration,
                curve: spin.curve,
            },
        }
    }

    /// Push the current color to a freshly created layer and hide it
    pub fn attach<L: SpinnerLayer + ?Sized>(&self, layer: &mut L) {
        layer.set_stroke_color(self.state.color);
        layer.set_hidden(true);
    }

    /// Show the indicator and start rotating. No-op while already running.
    pub fn start<L: SpinnerLayer + ?Sized>(&mut self, layer: &mut L) {
        if self.state.running {
            return;
        }
        debug!("Spinner started");
        layer.set_hidden(false);
        layer.add_rotation(self.rotation);
        self.state.running = true;
    }

    /// Remove the rotation and hide the indicator. No-op while stopped.
    pub fn stop<L: SpinnerLayer + ?Sized>(&mut self, layer: &mut L) {
        if !self.state.running {
            return;
        }
        debug!("Spinner stopped");
        layer.remove_rotation();
        layer.set_hidden(true);
        self.state.running = false;
    }

    /// Applies immediately, running or not
    pub fn set_color<L: SpinnerLayer + ?Sized>(&mut self, layer: &mut L, color: Color) {
        self.state.color = color;
        layer.set_stroke_color(color);
    }

    pub fn color(&self) -> Color {
        self.state.color
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn state(&self) -> SpinnerState {
        self.state
    }
}
