//! Input events a renderer feeds into the carousel.

use serde::{Deserialize, Serialize};

use crate::ViewportClass;

/// Phase of a pointer or touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Pointer pressed (mouse down, finger down).
    Start,
    /// Pointer moved while pressed.
    Move,
    /// Pointer released.
    End,
    /// Gesture cancelled by the platform (e.g., palm rejection).
    Cancel,
}

/// A single pointer or touch sample.
///
/// Only the horizontal coordinate matters to the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    /// Phase of this sample.
    pub phase: PointerPhase,
    /// X position in container pixels.
    pub x: f32,
    /// Timestamp in milliseconds on the carousel clock.
    pub timestamp_ms: u64,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(phase: PointerPhase, x: f32, timestamp_ms: u64) -> Self {
        Self {
            phase,
            x,
            timestamp_ms,
        }
    }
}

/// All inputs the carousel can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum CarouselEvent {
    /// Raw pointer or touch sample.
    Pointer(PointerEvent),

    /// Pointer entered the carousel area.
    Hover {
        /// Whether the pointer is now over the carousel.
        inside: bool,
        /// Timestamp in milliseconds.
        timestamp_ms: u64,
    },

    /// An indicator dot was clicked.
    IndicatorClick {
        /// Target card index.
        index: usize,
        /// Timestamp in milliseconds.
        timestamp_ms: u64,
    },

    /// The external resize listener reclassified the viewport.
    Viewport {
        /// New viewport class.
        class: ViewportClass,
        /// Timestamp in milliseconds.
        timestamp_ms: u64,
    },

    /// Clock advanced with no other input.
    Tick {
        /// Timestamp in milliseconds.
        timestamp_ms: u64,
    },
}

impl CarouselEvent {
    /// Timestamp carried by this event.
    #[must_use]
    pub const fn timestamp_ms(&self) -> u64 {
        match self {
            Self::Pointer(pointer) => pointer.timestamp_ms,
            Self::Hover { timestamp_ms, .. }
            | Self::IndicatorClick { timestamp_ms, .. }
            | Self::Viewport { timestamp_ms, .. }
            | Self::Tick { timestamp_ms } => *timestamp_ms,
        }
    }
}
