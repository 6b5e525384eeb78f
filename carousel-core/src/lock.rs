//! Animation lock serializing carousel transitions.

use crate::timer::Timer;

/// Short-lived mutual exclusion guard held for the settle duration of each
/// transition.
///
/// The lock releases itself: [`AnimationLock::try_enter`] arms a release
/// deadline, and the owner calls [`AnimationLock::poll`] as time advances.
#[derive(Debug, Clone)]
pub struct AnimationLock {
    settle_ms: u64,
    release: Timer,
}

impl AnimationLock {
    /// Create an unheld lock with the given settle duration.
    #[must_use]
    pub const fn new(settle_ms: u64) -> Self {
        Self {
            settle_ms,
            release: Timer::idle(),
        }
    }

    /// Take the lock if free. A caller that gets `false` must not change the
    /// active index.
    pub fn try_enter(&mut self, now_ms: u64) -> bool {
        if self.release.is_pending() {
            return false;
        }
        self.release.schedule(now_ms, self.settle_ms);
        true
    }

    /// Release the lock if its settle duration has elapsed.
    ///
    /// Returns whether the lock was released by this call.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        self.release.fire(now_ms)
    }

    /// Drop the lock and its pending release without firing.
    pub fn cancel(&mut self) -> bool {
        self.release.cancel()
    }

    /// Whether a transition is still settling.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.release.is_pending()
    }

    /// When the current hold ends.
    #[must_use]
    pub const fn release_deadline(&self) -> Option<u64> {
        self.release.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_rejects_while_held() {
        let mut lock = AnimationLock::new(600);
        assert!(lock.try_enter(0));
        assert!(lock.is_held());
        assert!(!lock.try_enter(100));
        assert_eq!(lock.release_deadline(), Some(600));
    }

    #[test]
    fn test_lock_releases_after_settle() {
        let mut lock = AnimationLock::new(600);
        assert!(lock.try_enter(1000));
        assert!(!lock.poll(1599));
        assert!(lock.poll(1600));
        assert!(!lock.is_held());
        assert!(lock.try_enter(1600));
    }

    #[test]
    fn test_rejected_enter_does_not_extend_hold() {
        let mut lock = AnimationLock::new(600);
        assert!(lock.try_enter(0));
        assert!(!lock.try_enter(500));
        assert!(lock.poll(600));
    }

    #[test]
    fn test_cancel_clears_pending_release() {
        let mut lock = AnimationLock::new(600);
        assert!(lock.try_enter(0));
        assert!(lock.cancel());
        assert!(!lock.poll(10_000));
        assert!(!lock.is_held());
    }
}
