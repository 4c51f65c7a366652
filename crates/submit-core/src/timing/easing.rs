//! L4 Atomic Layer: Pure easing curves for button transitions
//!
//! Maps linear progress in [0, 1] to eased progress. Named curves follow the
//! CSS / Core Animation definitions, custom curves are cubic beziers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Easing curve controlling the interpolation rate of a transition
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Curve {
    /// No easing
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1.0)`, the platform default curve
    #[default]
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`
    EaseInOut,
    /// Custom curve through control points (x1, y1) and (x2, y2).
    /// x values are in [0, 1], y values may overshoot.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Curve {
    /// Create a custom cubic bezier curve, rejecting x control points outside [0, 1]
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(Error::InvalidCurve(format!(
                "bezier x values must be in [0, 1], got x1={x1}, x2={x2}"
            )));
        }
        Ok(Self::CubicBezier { x1, y1, x2, y2 })
    }

    /// Apply the curve to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped to [0, 1]
    ///
    /// # Returns
    /// Eased progress (may leave [0, 1] for overshooting beziers)
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Curve::Linear => t,
            Curve::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Curve::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Curve::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Curve::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Curve::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_component(y1, y2, t)
}

/// Find the curve parameter whose x equals `target_x`.
///
/// Newton-Raphson first, falling back to bisection when the slope flattens
/// out (steep ease-in curves have dx/dt ~ 0 near the ends).
fn solve_bezier_x(x1: f64, x2: f64, target_x: f64) -> f64 {
    const EPSILON: f64 = 1e-7;

    let mut t = target_x;
    for _ in 0..8 {
        let error = bezier_component(x1, x2, t) - target_x;
        if error.abs() < EPSILON {
            return t;
        }
        let slope = bezier_derivative(x1, x2, t);
        if slope.abs() < 1e-6 {
            break;
        }
        t = (t - error / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    t = target_x;
    for _ in 0..64 {
        let x = bezier_component(x1, x2, t);
        if (x - target_x).abs() < EPSILON {
            break;
        }
        if x < target_x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    t
}

/// One axis of the bezier: 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_component(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

/// dx/dt = 3(1-t)²·p1 + 6(1-t)t·(p2-p1) + 3t²·(1-p2)
#[inline]
fn bezier_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::Linear => f.write_str("linear"),
            Curve::Ease => f.write_str("ease"),
            Curve::EaseIn => f.write_str("ease-in"),
            Curve::EaseOut => f.write_str("ease-out"),
            Curve::EaseInOut => f.write_str("ease-in-out"),
            Curve::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
        }
    }
}

impl FromStr for Curve {
    type Err = Error;

    /// Accepts a keyword ("linear", "ease", "ease-in", "ease-out", "ease-in-out")
    /// or "cubic-bezier(x1, y1, x2, y2)"
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "linear" => return Ok(Curve::Linear),
            "ease" | "default" => return Ok(Curve::Ease),
            "ease-in" => return Ok(Curve::EaseIn),
            "ease-out" => return Ok(Curve::EaseOut),
            "ease-in-out" => return Ok(Curve::EaseInOut),
            _ => {}
        }

        let args = normalized
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| Error::InvalidCurve(s.to_string()))?;

        let points = args
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::InvalidCurve(format!("{s}: {e}")))?;

        match points.as_slice() {
            [x1, y1, x2, y2] => Curve::cubic_bezier(*x1, *y1, *x2, *y2),
            _ => Err(Error::InvalidCurve(format!(
                "{s}: expected 4 control values, got {}",
                points.len()
            ))),
        }
    }
}

impl Serialize for Curve {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Curve {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
