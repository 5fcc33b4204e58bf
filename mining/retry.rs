//! Bounded retry with a fixed backoff.
//!
//! Used to wait for an accepted block to become visible in the block store.
//! Waiting goes through [`Sleeper`] so the mining loop never depends on how
//! the pause is implemented.

use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CONFIRM_INTERVAL: Duration = Duration::from_millis(100);

pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The condition held after `checks` checks.
    Confirmed { checks: u64 },
    /// The attempt bound was reached first.
    TimedOut { checks: u64 },
}

impl ConfirmOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ConfirmOutcome::Confirmed { .. })
    }
}

#[derive(Clone)]
pub struct RetryPolicy {
    interval: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self::with_sleeper(interval, Arc::new(ThreadSleeper))
    }

    pub fn with_sleeper(interval: Duration, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { interval, sleeper }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Polls `condition` until it holds, pausing between checks.
    ///
    /// The attempt counter starts at one and a check is made only while it is
    /// below `max_attempts`, so a bound of `n` allows `n - 1` checks and a
    /// bound of one or less allows none.
    pub fn confirm<F>(&self, max_attempts: u64, mut condition: F) -> ConfirmOutcome
    where
        F: FnMut() -> bool,
    {
        let mut checks = 0;
        let mut attempt = 1;
        while attempt < max_attempts {
            checks += 1;
            if condition() {
                return ConfirmOutcome::Confirmed { checks };
            }
            self.sleeper.sleep(self.interval);
            attempt += 1;
        }
        ConfirmOutcome::TimedOut { checks }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_CONFIRM_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingSleeper(Mutex<Vec<Duration>>);

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.0.lock().push(duration);
        }
    }

    fn policy() -> (RetryPolicy, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::default());
        (RetryPolicy::with_sleeper(Duration::from_millis(100), sleeper.clone()), sleeper)
    }

    #[test]
    fn confirms_immediately_without_sleeping() {
        let (policy, sleeper) = policy();
        assert_eq!(policy.confirm(10, || true), ConfirmOutcome::Confirmed { checks: 1 });
        assert!(sleeper.0.lock().is_empty());
    }

    #[test]
    fn sleeps_fixed_interval_between_checks() {
        let (policy, sleeper) = policy();
        let mut remaining = 3;
        let outcome = policy.confirm(10, || {
            remaining -= 1;
            remaining == 0
        });
        assert_eq!(outcome, ConfirmOutcome::Confirmed { checks: 3 });
        assert_eq!(*sleeper.0.lock(), vec![Duration::from_millis(100); 2]);
    }

    #[test]
    fn gives_up_at_bound() {
        let (policy, sleeper) = policy();
        assert_eq!(policy.confirm(5, || false), ConfirmOutcome::TimedOut { checks: 4 });
        assert_eq!(sleeper.0.lock().len(), 4);
    }

    #[test]
    fn bound_of_one_checks_nothing() {
        let (policy, _) = policy();
        let mut called = false;
        assert_eq!(
            policy.confirm(1, || {
                called = true;
                true
            }),
            ConfirmOutcome::TimedOut { checks: 0 }
        );
        assert!(!called);
        assert_eq!(policy.confirm(0, || true), ConfirmOutcome::TimedOut { checks: 0 });
    }
}
