//! # Geometry Mapper
//!
//! Maps the active index onto on-screen slots.
//!
//! Every card gets a layout entry, visible or not, so a renderer can keep a
//! stable element per card and only animate transforms:
//!
//! ```text
//! desktop, N = 6, active = 2
//!
//!   card:      0     1     2     3     4     5
//!   position:  4     5     0     1     2     3
//!   offset %: +70 (+105)  -70   -35    0   +35
//!                                     ^ focus (scale 1.05)
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_DESKTOP_WINDOW, DEFAULT_MOBILE_WINDOW};

/// Slot spacing on desktop, in percent of container width.
pub const DESKTOP_SLOT_SPACING_PCT: f32 = 35.0;
/// Slot spacing on mobile, in percent of container width.
pub const MOBILE_SLOT_SPACING_PCT: f32 = 100.0;
/// Scale applied to the focus card.
pub const ACTIVE_SCALE: f32 = 1.05;
/// Scale applied to every other card.
pub const RESTING_SCALE: f32 = 1.0;
/// Z-index of the focus card; above every other slot.
pub const ACTIVE_Z_INDEX: i32 = 20;
/// Z-index of a visible card adjacent to the focus; decreases with distance.
pub const BASE_Z_INDEX: i32 = 10;

/// Width class of the viewport the carousel is rendered in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    /// Narrow viewport, one card at a time.
    Mobile,
    /// Wide viewport, several cards side by side.
    #[default]
    Desktop,
}

impl ViewportClass {
    /// Classify a viewport width against a breakpoint.
    ///
    /// Widths strictly below the breakpoint are mobile.
    #[must_use]
    pub fn from_width(width_px: f32, breakpoint_px: f32) -> Self {
        if width_px < breakpoint_px {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }

    /// Distance between adjacent slot centers, in percent of container width.
    #[must_use]
    pub const fn slot_spacing_pct(self) -> f32 {
        match self {
            Self::Mobile => MOBILE_SLOT_SPACING_PCT,
            Self::Desktop => DESKTOP_SLOT_SPACING_PCT,
        }
    }
}

impl std::str::FromStr for ViewportClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mobile" => Ok(Self::Mobile),
            "desktop" => Ok(Self::Desktop),
            other => Err(format!("unknown viewport class: {other}")),
        }
    }
}

/// Layout of one card for one render. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    /// Index of the card in the deck.
    pub card_index: usize,
    /// Forward circular distance from the active index, in `[0, N)`.
    pub position: usize,
    /// Signed circular distance from the focus slot, in `(-N/2, N/2]`.
    pub relative: i64,
    /// Horizontal offset of the slot center, in percent of container width.
    pub slot_offset_pct: f32,
    /// Scale factor.
    pub scale: f32,
    /// Stacking order.
    pub z_index: i32,
    /// Opacity (0.0 hidden, 1.0 opaque).
    pub opacity: f32,
    /// Whether the card occupies one of the visible slots.
    pub visible: bool,
    /// Whether the card is in the focus slot.
    pub is_active: bool,
}

/// Wrap a signed index into `[0, total)`.
///
/// # Panics
///
/// Panics if `total` is zero.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn wrap_index(index: i64, total: usize) -> usize {
    assert!(total > 0, "cannot wrap into an empty deck");
    index.rem_euclid(total as i64) as usize
}

/// Forward circular distance from `active_index` to `card_index`.
#[must_use]
pub const fn circular_position(card_index: usize, active_index: usize, total: usize) -> usize {
    (card_index + total - active_index % total) % total
}

/// Signed circular distance from `focus` to `position`, in `(-N/2, N/2]`.
#[allow(clippy::cast_possible_wrap)]
const fn signed_distance(position: usize, focus: usize, total: usize) -> i64 {
    let forward = ((position + total - focus) % total) as i64;
    let total = total as i64;
    if forward > total / 2 {
        forward - total
    } else {
        forward
    }
}

/// Pure mapper from `(active index, count, viewport)` to per-card layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryMapper {
    mobile_window: usize,
    desktop_window: usize,
}

impl GeometryMapper {
    /// Create a mapper with explicit window sizes per viewport class.
    #[must_use]
    pub const fn new(mobile_window: usize, desktop_window: usize) -> Self {
        Self {
            mobile_window,
            desktop_window,
        }
    }

    /// Configured window size for a viewport class, before clamping to `N`.
    #[must_use]
    pub const fn window_size(&self, viewport: ViewportClass) -> usize {
        match viewport {
            ViewportClass::Mobile => self.mobile_window,
            ViewportClass::Desktop => self.desktop_window,
        }
    }

    /// Number of visible cards for a deck of `total` cards.
    #[must_use]
    pub fn visible_count(&self, total: usize, viewport: ViewportClass) -> usize {
        self.window_size(viewport).min(total)
    }

    /// Position of the focus slot within the visible window.
    ///
    /// The middle slot when the window is full; when fewer cards than slots
    /// exist, the middle of the cards that are shown.
    #[must_use]
    pub fn focus_position(&self, total: usize, viewport: ViewportClass) -> usize {
        self.visible_count(total, viewport).saturating_sub(1) / 2
    }

    /// Compute the layout of every card.
    ///
    /// Returns one entry per card, in card order. Returns an empty layout for
    /// an empty deck.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn map(&self, active_index: usize, total: usize, viewport: ViewportClass) -> Vec<LayoutEntry> {
        if total == 0 {
            return Vec::new();
        }
        debug_assert!(active_index < total, "active index {active_index} out of range {total}");

        let window = self.visible_count(total, viewport);
        let focus = self.focus_position(total, viewport);
        // Cards past the window queue one slot off-screen, the rest two.
        let reach = (self.window_size(viewport) / 2 + 2) as i64;
        let spacing = viewport.slot_spacing_pct();

        (0..total)
            .map(|card_index| {
                let position = circular_position(card_index, active_index, total);
                let relative = signed_distance(position, focus, total);
                let visible = position < window;
                let is_active = position == focus;

                let (scale, z_index, opacity) = if is_active {
                    (ACTIVE_SCALE, ACTIVE_Z_INDEX, 1.0)
                } else if visible {
                    let z = (BASE_Z_INDEX - relative.unsigned_abs() as i32).max(1);
                    (RESTING_SCALE, z, 1.0)
                } else {
                    (RESTING_SCALE, 0, 0.0)
                };

                LayoutEntry {
                    card_index,
                    position,
                    relative,
                    slot_offset_pct: relative.clamp(-reach, reach) as f32 * spacing,
                    scale,
                    z_index,
                    opacity,
                    visible,
                    is_active,
                }
            })
            .collect()
    }
}

impl Default for GeometryMapper {
    fn default() -> Self {
        Self::new(DEFAULT_MOBILE_WINDOW, DEFAULT_DESKTOP_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(layout: &[LayoutEntry]) -> Vec<f32> {
        layout.iter().map(|e| e.slot_offset_pct).collect()
    }

    #[test]
    fn test_desktop_full_window_table() {
        let mapper = GeometryMapper::default();
        let layout = mapper.map(0, 5, ViewportClass::Desktop);
        assert_eq!(offsets(&layout), vec![-70.0, -35.0, 0.0, 35.0, 70.0]);
        assert!(layout.iter().all(|e| e.visible));
        assert!(layout[2].is_active);
        assert!((layout[2].scale - ACTIVE_SCALE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_desktop_six_cards_active_two() {
        let mapper = GeometryMapper::default();
        let layout = mapper.map(2, 6, ViewportClass::Desktop);
        let positions: Vec<usize> = layout.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![4, 5, 0, 1, 2, 3]);

        assert!((layout[2].slot_offset_pct - -70.0).abs() < f32::EPSILON);
        assert!((layout[2].scale - 1.0).abs() < f32::EPSILON);

        assert!(layout[4].is_active);
        assert!((layout[4].slot_offset_pct).abs() < f32::EPSILON);
        assert!((layout[4].scale - ACTIVE_SCALE).abs() < f32::EPSILON);

        assert!(!layout[1].visible);
        assert!(layout[1].opacity.abs() < f32::EPSILON);
        assert_eq!(layout[1].z_index, 0);
    }

    #[test]
    fn test_mobile_queue_offsets() {
        let mapper = GeometryMapper::default();
        let layout = mapper.map(0, 6, ViewportClass::Mobile);
        assert_eq!(offsets(&layout), vec![0.0, 100.0, 200.0, 200.0, -200.0, -100.0]);
        assert_eq!(layout.iter().filter(|e| e.visible).count(), 1);
        assert!(layout[0].is_active);
    }

    #[test]
    fn test_mobile_two_cards() {
        let mapper = GeometryMapper::default();
        let layout = mapper.map(1, 2, ViewportClass::Mobile);
        assert!(layout[1].is_active);
        assert!((layout[0].slot_offset_pct - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_z_index_decreases_with_distance() {
        let mapper = GeometryMapper::default();
        let layout = mapper.map(0, 7, ViewportClass::Desktop);
        let focus = layout.iter().find(|e| e.is_active).expect("focus card");
        assert_eq!(focus.z_index, ACTIVE_Z_INDEX);
        let near = layout.iter().find(|e| e.relative == 1).expect("near card");
        let far = layout.iter().find(|e| e.relative == 2).expect("far card");
        assert!(focus.z_index > near.z_index);
        assert!(near.z_index > far.z_index);
        assert!(far.z_index > 0);
    }

    #[test]
    fn test_small_deck_centers_focus() {
        let mapper = GeometryMapper::default();
        let layout = mapper.map(0, 3, ViewportClass::Desktop);
        assert!(layout.iter().all(|e| e.visible));
        assert_eq!(offsets(&layout), vec![-35.0, 0.0, 35.0]);
        assert!(layout[1].is_active);
    }

    #[test]
    fn test_single_card() {
        let mapper = GeometryMapper::default();
        for viewport in [ViewportClass::Mobile, ViewportClass::Desktop] {
            let layout = mapper.map(0, 1, viewport);
            assert_eq!(layout.len(), 1);
            assert!(layout[0].is_active);
            assert!(layout[0].visible);
            assert!(layout[0].slot_offset_pct.abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_empty_deck() {
        assert!(GeometryMapper::default()
            .map(0, 0, ViewportClass::Desktop)
            .is_empty());
    }

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(-1, 6), 5);
        assert_eq!(wrap_index(6, 6), 0);
        assert_eq!(wrap_index(13, 6), 1);
    }

    #[test]
    fn test_viewport_from_width() {
        assert_eq!(ViewportClass::from_width(767.0, 768.0), ViewportClass::Mobile);
        assert_eq!(ViewportClass::from_width(768.0, 768.0), ViewportClass::Desktop);
        assert_eq!("Mobile".parse::<ViewportClass>(), Ok(ViewportClass::Mobile));
        assert!("tablet".parse::<ViewportClass>().is_err());
    }
}
