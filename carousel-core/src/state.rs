//! Carousel state and published snapshots.

use serde::{Deserialize, Serialize};

use crate::{LayoutEntry, ViewportClass};

/// Who asked for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationSource {
    /// The auto-advance interval.
    AutoAdvance,
    /// An indicator dot click.
    Indicator,
    /// A committed drag or swipe.
    Gesture,
    /// A direct `next`/`previous` call (arrow buttons, keyboard).
    Programmatic,
}

/// Why a transition request was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// A previous transition is still settling.
    Animating,
    /// A drag is in progress.
    Dragging,
    /// Auto-scrolling is paused by hover or a recent interaction.
    AutoScrollPaused,
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Transition {
    /// The active index changed.
    Accepted {
        /// Previous active index.
        from: usize,
        /// New active index.
        to: usize,
        /// Requesting source.
        source: NavigationSource,
    },
    /// The request was dropped without side effects on the index.
    Dropped {
        /// Requesting source.
        source: NavigationSource,
        /// Why it was dropped.
        reason: DropReason,
    },
    /// Nothing to do: target already active, no drag in progress, or the
    /// carousel has been disposed.
    Ignored,
}

impl Transition {
    /// Whether the active index changed.
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// The single mutable state of a carousel, owned by its controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselState {
    /// Index of the card at forward distance 0, always in `[0, N)`.
    pub active_index: usize,
    /// Whether a transition is settling.
    pub is_animating: bool,
    /// Whether auto-advance is currently allowed to fire.
    pub is_auto_scrolling: bool,
    /// Whether a drag is in progress.
    pub is_dragging: bool,
    /// Live horizontal drag displacement in pixels; 0 when not dragging.
    pub drag_offset: f32,
}

impl CarouselState {
    /// State of a freshly mounted carousel.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            active_index: 0,
            is_animating: false,
            is_auto_scrolling: false,
            is_dragging: false,
            drag_offset: 0.0,
        }
    }
}

impl Default for CarouselState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselSnapshot {
    /// Carousel clock at the time of the snapshot.
    pub timestamp_ms: u64,
    /// Current state, inlined into the snapshot object.
    #[serde(flatten)]
    pub state: CarouselState,
    /// Index of the card in the focus slot.
    pub focused_index: usize,
    /// Viewport class the layout was computed for.
    pub viewport: ViewportClass,
    /// Layout of every card, in card order.
    pub layout: Vec<LayoutEntry>,
}

impl CarouselSnapshot {
    /// Active index at the time of the snapshot.
    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.state.active_index
    }

    /// Cards occupying visible slots.
    pub fn visible(&self) -> impl Iterator<Item = &LayoutEntry> {
        self.layout.iter().filter(|entry| entry.visible)
    }

    /// Serialize the snapshot to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> crate::CarouselResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
