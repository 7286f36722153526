//! One-shot reset timer
//!
//! The delayed return to the launch-ready state is modelled as a cancellable
//! deadline against the executive's monotonic sim time. The deadline is
//! checked at tick time, so cancelling before the poll that would fire it
//! guarantees the reset never happens.

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A one-shot, cancellable timer.
#[derive(Debug, Default, Copy, Clone)]
pub struct ResetTimer {
    deadline_s: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ResetTimer {
    pub fn new() -> Self {
        Self { deadline_s: None }
    }

    /// Arm the timer to fire `delay_s` seconds from `now_s`.
    ///
    /// Re-arming an already pending timer moves its deadline.
    pub fn arm(&mut self, now_s: f64, delay_s: f64) {
        self.deadline_s = Some(now_s + delay_s);
    }

    /// Cancel any pending deadline.
    pub fn cancel(&mut self) {
        self.deadline_s = None;
    }

    /// True if a deadline is pending.
    pub fn is_pending(&self) -> bool {
        self.deadline_s.is_some()
    }

    /// Poll the timer, returning true exactly once when the deadline has
    /// been reached. Firing disarms the timer.
    pub fn poll(&mut self, now_s: f64) -> bool {
        match self.deadline_s {
            Some(deadline_s) if now_s >= deadline_s => {
                self.deadline_s = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fires_once_at_deadline() {
        let mut timer = ResetTimer::new();
        timer.arm(1.0, 5.0);

        assert!(timer.is_pending());
        assert!(!timer.poll(5.99));
        assert!(timer.poll(6.0));

        // One-shot: never fires again
        assert!(!timer.is_pending());
        assert!(!timer.poll(100.0));
    }

    #[test]
    fn test_cancel() {
        let mut timer = ResetTimer::new();
        timer.arm(0.0, 5.0);
        timer.cancel();

        assert!(!timer.is_pending());
        assert!(!timer.poll(10.0));
    }

    #[test]
    fn test_rearm_moves_deadline() {
        let mut timer = ResetTimer::new();
        timer.arm(0.0, 5.0);
        timer.arm(10.0, 5.0);

        assert!(!timer.poll(5.0));
        assert!(timer.poll(15.0));
    }
}
