//! L4 Atomic Layer: Time calculation utilities for layer animations
//!
//! Pure functions over elapsed time. All times are virtual: callers pass
//! elapsed durations rather than reading a wall clock.

use std::time::Duration;

/// Calculate animation progress (0.0 to 1.0) from elapsed time and duration
///
/// # Returns
/// Progress value clamped to [0.0, 1.0], 1.0 for a zero duration
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if an animation of `duration` has run its course after `elapsed`
#[inline]
pub fn is_complete(elapsed: Duration, duration: Duration) -> bool {
    elapsed >= duration
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Duration from fractional seconds, saturating negative values to zero
#[inline]
pub fn seconds(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(200.0, 44.0, 0.5) - 122.0).abs() < 0.001);
        assert!((lerp(1.0, 26.0, 1.0) - 26.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert!((progress(Duration::ZERO, Duration::ZERO) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_clamps() {
        let d = Duration::from_millis(100);
        assert!((progress(Duration::from_millis(50), d) - 0.5).abs() < 0.001);
        assert!((progress(Duration::from_millis(250), d) - 1.0).abs() < 0.001);
        assert!(is_complete(Duration::from_millis(100), d));
        assert!(!is_complete(Duration::from_millis(99), d));
    }

    #[test]
    fn test_seconds_saturates() {
        assert_eq!(seconds(0.1 - 0.25), Duration::ZERO);
        assert_eq!(seconds(1.0), Duration::from_secs(1));
        assert_eq!(seconds(f64::NAN), Duration::ZERO);
    }
}
