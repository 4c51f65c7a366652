use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scheduler::{TimerId, TimerTag};
use crate::surface::AnimationPurpose;

/// Stage of the button's morph cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Shrinking,
    Spinning,
    Reverting,
    Expanding,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Shrinking => "shrinking",
            Phase::Spinning => "spinning",
            Phase::Reverting => "reverting",
            Phase::Expanding => "expanding",
        };
        f.write_str(name)
    }
}

/// Public controller operations, named in misuse errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    BeginLoading,
    CancelLoading,
    BeginSuccess,
    RunFullCycle,
    ResetToOriginal,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::BeginLoading => "begin_loading",
            Operation::CancelLoading => "cancel_loading",
            Operation::BeginSuccess => "begin_success",
            Operation::RunFullCycle => "run_full_cycle",
            Operation::ResetToOriginal => "reset_to_original",
        };
        f.write_str(name)
    }
}

/// Asynchronous notifications the host delivers to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ButtonEvent {
    /// A layer animation ran to completion (removed animations never report)
    AnimationFinished { purpose: AnimationPurpose },
    /// A scheduled timer elapsed
    TimerFired { id: TimerId, tag: TimerTag },
}

/// Caller-supplied callback, invoked at most once on the UI thread
pub type Completion = Box<dyn FnOnce() + 'static>;
