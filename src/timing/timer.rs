//! Elapsed-time primitives for the scheduler.
//!
//! The crate has no clock of its own; the host reports elapsed milliseconds
//! through [`Scheduler::advance`](crate::timing::Scheduler::advance) and these
//! types count them down. Everything is plain state, so tests drive time
//! explicitly.

/// One-shot countdown. Fires once when the armed duration elapses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    remaining: Option<u32>,
}

impl Timer {
    /// Arm (or re-arm) for `duration_ms` from now.
    pub fn arm(&mut self, duration_ms: u32) {
        self.remaining = Some(duration_ms);
    }

    /// Arm only when not already counting down.
    pub fn arm_if_idle(&mut self, duration_ms: u32) {
        if self.remaining.is_none() {
            self.remaining = Some(duration_ms);
        }
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    pub fn pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance by `elapsed_ms`. Returns true when the timer fires; a fired
    /// timer disarms itself.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        self.advance_surplus(elapsed_ms).is_some()
    }

    /// Like [`Timer::advance`], but on fire reports how much of `elapsed_ms`
    /// was left over past the deadline, so callers can hand the remainder to
    /// a follow-up timer instead of double-counting the whole slice.
    pub fn advance_surplus(&mut self, elapsed_ms: u32) -> Option<u32> {
        match self.remaining {
            Some(left) if left <= elapsed_ms => {
                self.remaining = None;
                Some(elapsed_ms - left)
            }
            Some(left) => {
                self.remaining = Some(left - elapsed_ms);
                None
            }
            None => None,
        }
    }
}

/// Repeating interval. Fires every `period_ms` while running, and catches up
/// when a single `advance` spans several periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_ms: u32,
    elapsed: u32,
    running: bool,
}

impl Interval {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            elapsed: 0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = 0;
    }

    /// Stop and start: the next fire is a full period away.
    pub fn restart(&mut self) {
        self.elapsed = 0;
        self.running = true;
    }

    pub fn set_period(&mut self, period_ms: u32) {
        self.period_ms = period_ms.max(1);
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// Advance by `elapsed_ms`, returning how many times the interval fired.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.running {
            return 0;
        }
        self.elapsed += elapsed_ms;
        let fires = self.elapsed / self.period_ms;
        self.elapsed %= self.period_ms;
        fires
    }
}
