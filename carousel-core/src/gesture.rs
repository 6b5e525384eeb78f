//! # Gesture Tracking
//!
//! Turns a pointer down/move/up sequence into at most one navigation step.
//!
//! ```text
//! down(x0) ── move(x) ... ── up
//!              │                │
//!              └ offset = x-x0  └ |offset| > threshold ?
//!                                   offset > 0 → Previous
//!                                   offset < 0 → Next
//!                                 otherwise snap back, no step
//! ```

use serde::{Deserialize, Serialize};

/// Navigation step committed by a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Step back one card (dragged right).
    Previous,
    /// Step forward one card (dragged left).
    Next,
}

impl Direction {
    /// Index delta of this step.
    #[must_use]
    pub const fn delta(self) -> i64 {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

/// Global move/up listeners, attached only while a drag is in progress.
///
/// Attach and detach are idempotent; each reports whether it changed state so
/// a renderer can mirror it onto real event targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragListeners {
    attached: bool,
}

impl DragListeners {
    /// Attach. Returns `false` if already attached.
    pub fn attach(&mut self) -> bool {
        !std::mem::replace(&mut self.attached, true)
    }

    /// Detach. Returns `false` if already detached.
    pub fn detach(&mut self) -> bool {
        std::mem::replace(&mut self.attached, false)
    }

    /// Whether the listeners are attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }
}

/// Drag/swipe tracker.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    threshold_px: f32,
    start_x: Option<f32>,
    offset: f32,
    listeners: DragListeners,
}

impl GestureTracker {
    /// Create an idle tracker with the given commit threshold.
    #[must_use]
    pub const fn new(threshold_px: f32) -> Self {
        Self {
            threshold_px,
            start_x: None,
            offset: 0.0,
            listeners: DragListeners { attached: false },
        }
    }

    /// Begin a drag at `x`.
    ///
    /// Refused while a transition is animating or a drag is already active.
    pub fn on_start(&mut self, x: f32, animating: bool) -> bool {
        if animating || self.start_x.is_some() || !x.is_finite() {
            return false;
        }
        self.start_x = Some(x);
        self.offset = 0.0;
        self.listeners.attach();
        true
    }

    /// Track the pointer at `x`.
    ///
    /// Returns the live offset while dragging; the caller should suppress
    /// default text selection and scrolling whenever this is `Some`.
    pub fn on_move(&mut self, x: f32) -> Option<f32> {
        let start = self.start_x?;
        if x.is_finite() {
            self.offset = x - start;
        }
        Some(self.offset)
    }

    /// Finish the drag and decide whether it commits a step.
    ///
    /// The drag state and listeners are cleared regardless of the outcome.
    pub fn on_end(&mut self) -> Option<Direction> {
        self.start_x.take()?;
        let offset = std::mem::replace(&mut self.offset, 0.0);
        self.listeners.detach();

        if offset.abs() <= self.threshold_px {
            None
        } else if offset > 0.0 {
            Some(Direction::Previous)
        } else {
            Some(Direction::Next)
        }
    }

    /// Abandon the drag without committing.
    pub fn cancel(&mut self) -> bool {
        self.offset = 0.0;
        self.listeners.detach();
        self.start_x.take().is_some()
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.start_x.is_some()
    }

    /// Current displacement from the drag origin.
    #[must_use]
    pub const fn offset(&self) -> f32 {
        self.offset
    }

    /// Whether global move/up listeners are attached.
    #[must_use]
    pub const fn listeners_attached(&self) -> bool {
        self.listeners.is_attached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(tracker: &mut GestureTracker, from: f32, to: f32) -> Option<Direction> {
        assert!(tracker.on_start(from, false));
        tracker.on_move(to);
        tracker.on_end()
    }

    #[test]
    fn test_drag_right_commits_previous() {
        let mut tracker = GestureTracker::new(50.0);
        assert_eq!(drag(&mut tracker, 100.0, 151.0), Some(Direction::Previous));
    }

    #[test]
    fn test_drag_left_commits_next() {
        let mut tracker = GestureTracker::new(50.0);
        assert_eq!(drag(&mut tracker, 100.0, 49.0), Some(Direction::Next));
    }

    #[test]
    fn test_drag_below_threshold_snaps_back() {
        let mut tracker = GestureTracker::new(50.0);
        assert_eq!(drag(&mut tracker, 100.0, 149.0), None);
        assert!(tracker.offset().abs() < f32::EPSILON);
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn test_exact_threshold_does_not_commit() {
        let mut tracker = GestureTracker::new(50.0);
        assert_eq!(drag(&mut tracker, 0.0, -50.0), None);
    }

    #[test]
    fn test_start_refused_while_animating() {
        let mut tracker = GestureTracker::new(50.0);
        assert!(!tracker.on_start(10.0, true));
        assert!(!tracker.is_dragging());
        assert_eq!(tracker.on_move(80.0), None);
        assert_eq!(tracker.on_end(), None);
    }

    #[test]
    fn test_listeners_scoped_to_drag() {
        let mut tracker = GestureTracker::new(50.0);
        assert!(!tracker.listeners_attached());
        tracker.on_start(0.0, false);
        assert!(tracker.listeners_attached());
        tracker.on_end();
        assert!(!tracker.listeners_attached());
    }

    #[test]
    fn test_move_reports_live_offset() {
        let mut tracker = GestureTracker::new(50.0);
        tracker.on_start(200.0, false);
        assert_eq!(tracker.on_move(180.0), Some(-20.0));
        assert_eq!(tracker.on_move(230.0), Some(30.0));
    }

    #[test]
    fn test_cancel_discards_offset() {
        let mut tracker = GestureTracker::new(50.0);
        tracker.on_start(0.0, false);
        tracker.on_move(300.0);
        assert!(tracker.cancel());
        assert!(!tracker.listeners_attached());
        assert_eq!(tracker.on_end(), None);
    }

    #[test]
    fn test_listener_attach_is_idempotent() {
        let mut listeners = DragListeners::default();
        assert!(listeners.attach());
        assert!(!listeners.attach());
        assert!(listeners.detach());
        assert!(!listeners.detach());
    }
}
