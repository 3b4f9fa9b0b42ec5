use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current UNIX timestamp in seconds.
///
/// This represents the number of seconds since 1970-01-01 UTC. A system
/// clock set before the epoch reads as `0`.
pub fn current_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Source of "now" for deposit maturity.
///
/// Deposits compute `redeem_timestamp` from it and withdrawals compare
/// against it, so every caller of the vault must share one clock.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time in UNIX seconds.
    fn now(&self) -> u64;
}

/// Wall clock backed by [`current_time`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        current_time()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same underlying instant, so a test can hold one handle
/// while the vault holds another.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    pub fn set(&self, timestamp: u64) {
        self.now.store(timestamp, Ordering::SeqCst);
    }

    /// Moves the clock forward by `seconds`, saturating at `u64::MAX`.
    pub fn advance(&self, seconds: u64) -> u64 {
        let mut current = self.now.load(Ordering::SeqCst);
        loop {
            let next = current.saturating_add(seconds);
            match self
                .now
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return next,
                Err(observed) => current = observed,
            }
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_time_non_zero() {
        let timestamp = current_time();
        assert!(timestamp > 0, "Timestamp should be greater than zero");
    }

    #[test]
    fn test_current_time_monotonic() {
        let t1 = current_time();
        let t2 = current_time();
        assert!(t2 >= t1, "Second timestamp should be greater than or equal to the first");
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();

        handle.advance(604_800);
        assert_eq!(clock.now(), 605_800);

        clock.set(42);
        assert_eq!(handle.now(), 42);
    }

    #[test]
    fn test_manual_clock_advance_saturates() {
        let clock = ManualClock::new(u64::MAX - 1);
        assert_eq!(clock.advance(10), u64::MAX);
    }
}
