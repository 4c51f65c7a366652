//! L3 Molecular Layer: the timing table shared by every button transition

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::easing::Curve;
use super::interpolate::seconds;
use crate::config::TimingConfig;

/// Named transitions with an entry in the timing table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Width collapse to a square, and its reverse
    Shrink,
    /// Scale-up that floods the surrounding surface
    Expand,
    /// Corner radius morph to and from a circle
    CornerRadius,
    /// One revolution of the spinner
    Spin,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transition::Shrink => "shrink",
            Transition::Expand => "expand",
            Transition::CornerRadius => "corner-radius",
            Transition::Spin => "spin",
        };
        f.write_str(name)
    }
}

/// Curve and duration for one transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingEntry {
    pub curve: Curve,
    pub duration: Duration,
}

impl TimingEntry {
    pub const fn new(curve: Curve, duration: Duration) -> Self {
        Self { curve, duration }
    }
}

/// Immutable set of curves and durations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingProfile {
    shrink: TimingEntry,
    expand: TimingEntry,
    corner_radius: TimingEntry,
    spin: TimingEntry,
}

impl TimingProfile {
    /// Fixed offset subtracted from the shrink duration before the spinner starts.
    /// Larger than the default shrink, so the spinner starts without waiting.
    pub const SPINNER_START_OFFSET: Duration = Duration::from_millis(250);
    /// Pause between the success callback and the automatic reset
    pub const SUCCESS_HOLD: Duration = Duration::from_secs(1);
    pub const EXPAND_SCALE_FROM: f64 = 1.0;
    pub const EXPAND_SCALE_TO: f64 = 26.0;

    pub const SHRINK_CURVE: Curve = Curve::Linear;
    pub const EXPAND_CURVE: Curve = Curve::CubicBezier { x1: 0.95, y1: 0.02, x2: 1.0, y2: 0.05 };
    pub const CORNER_RADIUS_CURVE: Curve = Curve::Ease;
    /// Overshooting curve kept for hosts that want a springier morph.
    /// No built-in transition uses it.
    pub const SPRING_GO_CURVE: Curve = Curve::CubicBezier { x1: 0.45, y1: -0.36, x2: 0.44, y2: 0.92 };

    pub fn new(
        shrink: TimingEntry,
        expand: TimingEntry,
        corner_radius: TimingEntry,
        spin: TimingEntry,
    ) -> Self {
        Self {
            shrink,
            expand,
            corner_radius,
            spin,
        }
    }

    /// Build a profile from the `[timing]` config section
    pub fn from_config(config: &TimingConfig) -> Self {
        Self::new(
            TimingEntry::new(config.shrink_curve, Duration::from_millis(config.shrink_ms)),
            TimingEntry::new(config.expand_curve, Duration::from_millis(config.expand_ms)),
            TimingEntry::new(
                config.corner_radius_curve,
                Duration::from_millis(config.corner_radius_ms),
            ),
            TimingEntry::new(Curve::Linear, Duration::from_millis(config.spin_ms)),
        )
    }

    /// Look up the entry for a transition
    pub fn entry(&self, transition: Transition) -> TimingEntry {
        match transition {
            Transition::Shrink => self.shrink,
            Transition::Expand => self.expand,
            Transition::CornerRadius => self.corner_radius,
            Transition::Spin => self.spin,
        }
    }

    pub fn shrink(&self) -> TimingEntry {
        self.shrink
    }

    pub fn expand(&self) -> TimingEntry {
        self.expand
    }

    pub fn corner_radius(&self) -> TimingEntry {
        self.corner_radius
    }

    pub fn spin(&self) -> TimingEntry {
        self.spin
    }

    /// Delay between the start of the shrink and the spinner start:
    /// shrink duration minus the fixed offset, saturated at zero
    pub fn spinner_start_delay(&self) -> Duration {
        seconds(self.shrink.duration.as_secs_f64() - Self::SPINNER_START_OFFSET.as_secs_f64())
    }

    pub fn success_hold(&self) -> Duration {
        Self::SUCCESS_HOLD
    }
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::new(
            TimingEntry::new(Self::SHRINK_CURVE, Duration::from_millis(100)),
            TimingEntry::new(Self::EXPAND_CURVE, Duration::from_millis(300)),
            TimingEntry::new(Self::CORNER_RADIUS_CURVE, Duration::from_millis(100)),
            TimingEntry::new(Curve::Linear, Duration::from_millis(400)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let profile = TimingProfile::default();
        assert_eq!(profile.entry(Transition::Shrink).curve, Curve::Linear);
        assert_eq!(profile.shrink().duration, Duration::from_millis(100));
        assert_eq!(profile.expand().duration, Duration::from_millis(300));
        assert_eq!(profile.corner_radius().curve, Curve::Ease);
        assert_eq!(profile.corner_radius().duration, Duration::from_millis(100));
        assert_eq!(profile.spin().duration, Duration::from_millis(400));
    }

    #[test]
    fn test_spinner_start_delay_saturates() {
        // 0.1s - 0.25s is negative: the spinner starts immediately
        assert_eq!(TimingProfile::default().spinner_start_delay(), Duration::ZERO);

        let config = TimingConfig {
            shrink_ms: 400,
            ..Default::default()
        };
        let slow = TimingProfile::from_config(&config);
        assert_eq!(slow.spinner_start_delay(), Duration::from_millis(150));
    }

    #[test]
    fn test_default_config_matches_default_profile() {
        assert_eq!(
            TimingProfile::from_config(&TimingConfig::default()),
            TimingProfile::default()
        );
    }
}
