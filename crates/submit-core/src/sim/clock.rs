use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Default)]
struct ClockState {
    now: Cell<Duration>,
    seq: Cell<u64>,
}

/// Shared virtual time for the simulated host.
///
/// Cloning shares the same time. The sequence counter orders animations and
/// timers that fall due at the same instant by when they were scheduled.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    state: Rc<ClockState>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.state.now.get()
    }

    /// Move time forward. Time never runs backwards.
    pub(crate) fn advance_to(&self, at: Duration) {
        if at > self.state.now.get() {
            self.state.now.set(at);
        }
    }

    pub(crate) fn next_seq(&self) -> u64 {
        let seq = self.state.seq.get();
        self.state.seq.set(seq + 1);
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_time() {
        let clock = VirtualClock::new();
        let other = clock.clone();
        clock.advance_to(Duration::from_millis(30));
        assert_eq!(other.now(), Duration::from_millis(30));

        other.advance_to(Duration::from_millis(10));
        assert_eq!(clock.now(), Duration::from_millis(30));
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let clock = VirtualClock::new();
        let a = clock.next_seq();
        let b = clock.clone().next_seq();
        assert!(b > a);
    }
}
