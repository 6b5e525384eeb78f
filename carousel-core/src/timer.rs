//! # Timers
//!
//! Cancellable deadlines on the carousel clock.
//!
//! The engine never sleeps or reads a wall clock. A [`Timer`] only records a
//! deadline; the owner fires it when a later timestamp arrives. Cancelling a
//! timer clears the deadline, so nothing fires after teardown.

/// A cancellable one-shot timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<u64>,
}

impl Timer {
    /// Create an idle timer.
    #[must_use]
    pub const fn idle() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer to fire `delay_ms` after `now_ms`, replacing any pending
    /// deadline.
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(delay_ms));
    }

    /// Disarm the timer. Returns whether it was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Pending deadline, if armed.
    #[must_use]
    pub const fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Whether the timer is armed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the timer is armed and its deadline has passed.
    #[must_use]
    pub fn is_due(&self, now_ms: u64) -> bool {
        self.deadline.is_some_and(|deadline| deadline <= now_ms)
    }

    /// Fire the timer if due. A fired timer is disarmed.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        if self.is_due(now_ms) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

/// Repeating auto-advance timer with a resume cool-down.
///
/// `running` mirrors the carousel's auto-scrolling flag. While paused the
/// interval keeps ticking; the controller drops those ticks.
#[derive(Debug, Clone)]
pub struct AutoAdvanceTimer {
    interval_ms: u64,
    cooldown_ms: u64,
    enabled: bool,
    running: bool,
    tick: Timer,
    resume: Timer,
}

impl AutoAdvanceTimer {
    /// Create a stopped timer.
    #[must_use]
    pub const fn new(interval_ms: u64, cooldown_ms: u64) -> Self {
        Self {
            interval_ms,
            cooldown_ms,
            enabled: false,
            running: false,
            tick: Timer::idle(),
            resume: Timer::idle(),
        }
    }

    /// Enable auto-advance and arm the first tick one interval from now.
    pub fn start(&mut self, now_ms: u64) {
        self.enabled = true;
        self.running = true;
        self.resume.cancel();
        self.tick.schedule(now_ms, self.interval_ms);
    }

    /// Stop auto-scrolling immediately and drop any pending resume.
    ///
    /// Returns whether the running flag changed.
    pub fn pause(&mut self) -> bool {
        self.resume.cancel();
        std::mem::replace(&mut self.running, false)
    }

    /// Arm the resume cool-down, restarting it if already pending.
    pub fn schedule_resume(&mut self, now_ms: u64) {
        if self.enabled {
            self.resume.schedule(now_ms, self.cooldown_ms);
        }
    }

    /// Resume auto-scrolling and restart the interval from `now_ms`.
    ///
    /// Returns whether the running flag changed. Has no effect once disabled,
    /// and leaves the interval untouched when already running.
    pub fn resume(&mut self, now_ms: u64) -> bool {
        if !self.enabled {
            return false;
        }
        self.resume.cancel();
        if self.running {
            return false;
        }
        self.running = true;
        self.tick.schedule(now_ms, self.interval_ms);
        true
    }

    /// Restart the interval from `now_ms`.
    pub fn reset(&mut self, now_ms: u64) {
        if self.enabled {
            self.tick.schedule(now_ms, self.interval_ms);
        }
    }

    /// Fire the interval if due, re-arming it one interval after its
    /// deadline.
    pub fn fire_tick(&mut self, now_ms: u64) -> bool {
        let Some(deadline) = self.tick.deadline() else {
            return false;
        };
        if !self.tick.fire(now_ms) {
            return false;
        }
        self.tick.schedule(deadline, self.interval_ms);
        true
    }

    /// Fire the resume cool-down if due.
    pub fn fire_resume(&mut self, now_ms: u64) -> bool {
        self.resume.fire(now_ms)
    }

    /// Cancel every pending deadline and disable auto-advance.
    pub fn cancel(&mut self) {
        self.enabled = false;
        self.running = false;
        self.tick.cancel();
        self.resume.cancel();
    }

    /// Whether auto-scrolling is currently active.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Deadline of the next interval tick.
    #[must_use]
    pub const fn tick_deadline(&self) -> Option<u64> {
        self.tick.deadline()
    }

    /// Deadline of the pending resume, if any.
    #[must_use]
    pub const fn resume_deadline(&self) -> Option<u64> {
        self.resume.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_once() {
        let mut timer = Timer::idle();
        timer.schedule(100, 50);
        assert!(!timer.fire(149));
        assert!(timer.fire(150));
        assert!(!timer.fire(200));
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_timer_cancel() {
        let mut timer = Timer::idle();
        timer.schedule(0, 10);
        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert!(!timer.fire(1000));
    }

    #[test]
    fn test_timer_schedule_saturates() {
        let mut timer = Timer::idle();
        timer.schedule(u64::MAX - 1, 10);
        assert_eq!(timer.deadline(), Some(u64::MAX));
    }

    #[test]
    fn test_auto_timer_idle_until_started() {
        let mut auto = AutoAdvanceTimer::new(3000, 2000);
        assert!(!auto.is_running());
        assert_eq!(auto.tick_deadline(), None);
        auto.schedule_resume(0);
        assert_eq!(auto.resume_deadline(), None);
        assert!(!auto.resume(0));
    }

    #[test]
    fn test_auto_timer_repeats_from_deadline() {
        let mut auto = AutoAdvanceTimer::new(3000, 2000);
        auto.start(0);
        assert!(!auto.fire_tick(2999));
        assert!(auto.fire_tick(3100));
        assert_eq!(auto.tick_deadline(), Some(6000));
    }

    #[test]
    fn test_auto_timer_pause_and_resume() {
        let mut auto = AutoAdvanceTimer::new(3000, 2000);
        auto.start(0);
        assert!(auto.pause());
        assert!(!auto.pause());
        auto.schedule_resume(500);
        assert_eq!(auto.resume_deadline(), Some(2500));
        assert!(auto.fire_resume(2500));
        assert!(auto.resume(2500));
        assert!(auto.is_running());
        assert_eq!(auto.tick_deadline(), Some(5500));
    }

    #[test]
    fn test_auto_timer_resume_keeps_running_interval() {
        let mut auto = AutoAdvanceTimer::new(3000, 2000);
        auto.start(0);
        auto.schedule_resume(500);
        assert!(auto.fire_resume(2500));
        assert!(!auto.resume(2500));
        assert_eq!(auto.tick_deadline(), Some(3000));
        assert_eq!(auto.resume_deadline(), None);
    }

    #[test]
    fn test_auto_timer_pause_drops_pending_resume() {
        let mut auto = AutoAdvanceTimer::new(3000, 2000);
        auto.start(0);
        auto.schedule_resume(100);
        auto.pause();
        assert_eq!(auto.resume_deadline(), None);
    }

    #[test]
    fn test_auto_timer_cancel() {
        let mut auto = AutoAdvanceTimer::new(3000, 2000);
        auto.start(0);
        auto.schedule_resume(10);
        auto.cancel();
        assert!(!auto.is_running());
        assert_eq!(auto.tick_deadline(), None);
        assert_eq!(auto.resume_deadline(), None);
        assert!(!auto.resume(50));
    }
}
