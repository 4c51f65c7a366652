use std::time::Duration;

use tracing::debug;

use super::clock::VirtualClock;
use crate::scheduler::{Scheduler, TimerId, TimerTag};

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    id: TimerId,
    tag: TimerTag,
    due: Duration,
    seq: u64,
}

/// Timers against virtual time. Nothing fires until the stage advances.
#[derive(Debug, Clone)]
pub struct VirtualScheduler {
    clock: VirtualClock,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

impl VirtualScheduler {
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            clock,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Due time and sequence of the earliest pending timer
    pub(crate) fn next_due(&self) -> Option<(Duration, u64)> {
        self.pending
            .iter()
            .map(|timer| (timer.due, timer.seq))
            .min()
    }

    /// Remove and return the earliest pending timer
    pub(crate) fn pop_next(&mut self) -> Option<(TimerId, TimerTag)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, timer)| (timer.due, timer.seq))
            .map(|(index, _)| index)?;
        let timer = self.pending.remove(index);
        Some((timer.id, timer.tag))
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&mut self, delay: Duration, tag: TimerTag) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let due = self.clock.now() + delay;
        debug!("Timer {} scheduled for {:?}", tag, due);
        self.pending.push(PendingTimer {
            id,
            tag,
            due,
            seq: self.clock.next_seq(),
        });
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.id != id);
        self.pending.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earliest_first_then_schedule_order() {
        let clock = VirtualClock::new();
        let mut scheduler = VirtualScheduler::new(clock.clone());

        let late = scheduler.schedule(Duration::from_secs(1), TimerTag::RevertToOriginal);
        let first = scheduler.schedule(Duration::ZERO, TimerTag::StartSpinner);
        let second = scheduler.schedule(Duration::ZERO, TimerTag::RevertToOriginal);

        assert_eq!(scheduler.pop_next().map(|(id, _)| id), Some(first));
        assert_eq!(scheduler.pop_next().map(|(id, _)| id), Some(second));
        assert_eq!(scheduler.next_due().map(|(due, _)| due), Some(Duration::from_secs(1)));
        assert_eq!(scheduler.pop_next().map(|(id, _)| id), Some(late));
        assert!(scheduler.pop_next().is_none());
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = VirtualScheduler::new(VirtualClock::new());
        let id = scheduler.schedule(Duration::from_millis(5), TimerTag::StartSpinner);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.pending_count(), 0);
    }
}
