//! Delayed-callback capability injected into the controller
//!
//! Hosts deliver a fired timer back as `ButtonEvent::TimerFired` carrying the
//! tag it was scheduled with. Nothing here reads a wall clock, so tests can
//! drive timers from virtual time.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(pub u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerTag {
    /// Enter `Spinning` after the shrink has started
    StartSpinner,
    /// Return to the idle button after the success hold
    RevertToOriginal,
}

impl fmt::Display for TimerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerTag::StartSpinner => f.write_str("start-spinner"),
            TimerTag::RevertToOriginal => f.write_str("revert-to-original"),
        }
    }
}

/// One-shot timer scheduling
pub trait Scheduler {
    /// Fire `tag` after `delay`. A zero delay fires after the event being
    /// handled now, never re-entrantly.
    fn schedule(&mut self, delay: Duration, tag: TimerTag) -> TimerId;

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;
}
