//! Carousel configuration, fixed at construction time.

use serde::{Deserialize, Serialize};

use crate::{CarouselError, CarouselResult};

/// Default interval between auto-advance ticks.
pub const DEFAULT_AUTO_ADVANCE_INTERVAL_MS: u64 = 3000;
/// Default time a transition holds the animation lock.
pub const DEFAULT_SETTLE_DURATION_MS: u64 = 600;
/// Default horizontal displacement a drag must exceed to commit.
pub const DEFAULT_DRAG_THRESHOLD_PX: f32 = 50.0;
/// Default delay before auto-scrolling resumes after a manual interaction.
pub const DEFAULT_RESUME_COOLDOWN_MS: u64 = 2000;
/// Default number of visible slots on narrow viewports.
pub const DEFAULT_MOBILE_WINDOW: usize = 1;
/// Default number of visible slots on wide viewports.
pub const DEFAULT_DESKTOP_WINDOW: usize = 5;
/// Default width (px) below which a viewport counts as mobile.
pub const DEFAULT_MOBILE_BREAKPOINT_PX: f32 = 768.0;

/// Timing, gesture and window settings for a carousel.
///
/// Deserializes from camelCase JSON; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarouselConfig {
    /// Interval between auto-advance requests.
    pub auto_advance_interval_ms: u64,
    /// How long an accepted transition blocks further transitions.
    pub settle_duration_ms: u64,
    /// Displacement (px) a drag must exceed to commit a step.
    pub drag_threshold_px: f32,
    /// Delay before auto-scrolling resumes after drag end, pointer leave or
    /// an indicator click.
    pub resume_cooldown_ms: u64,
    /// Visible slots on mobile viewports. Must be odd.
    pub mobile_window: usize,
    /// Visible slots on desktop viewports. Must be odd.
    pub desktop_window: usize,
    /// Width (px) below which [`crate::ViewportClass::from_width`] reports mobile.
    pub mobile_breakpoint_px: f32,
    /// Whether `start` arms auto-advance immediately.
    pub auto_start: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_advance_interval_ms: DEFAULT_AUTO_ADVANCE_INTERVAL_MS,
            settle_duration_ms: DEFAULT_SETTLE_DURATION_MS,
            drag_threshold_px: DEFAULT_DRAG_THRESHOLD_PX,
            resume_cooldown_ms: DEFAULT_RESUME_COOLDOWN_MS,
            mobile_window: DEFAULT_MOBILE_WINDOW,
            desktop_window: DEFAULT_DESKTOP_WINDOW,
            mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT_PX,
            auto_start: true,
        }
    }
}

impl CarouselConfig {
    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> CarouselResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> CarouselResult<()> {
        if self.auto_advance_interval_ms == 0 {
            return Err(CarouselError::InvalidConfig(
                "autoAdvanceIntervalMs must be greater than zero".into(),
            ));
        }
        if !self.drag_threshold_px.is_finite() || self.drag_threshold_px <= 0.0 {
            return Err(CarouselError::InvalidConfig(format!(
                "dragThresholdPx must be a positive number, got {}",
                self.drag_threshold_px
            )));
        }
        if !self.mobile_breakpoint_px.is_finite() || self.mobile_breakpoint_px < 0.0 {
            return Err(CarouselError::InvalidConfig(format!(
                "mobileBreakpointPx must be a non-negative number, got {}",
                self.mobile_breakpoint_px
            )));
        }
        for (name, window) in [
            ("mobileWindow", self.mobile_window),
            ("desktopWindow", self.desktop_window),
        ] {
            if window == 0 || window % 2 == 0 {
                return Err(CarouselError::InvalidConfig(format!(
                    "{name} must be an odd number of slots, got {window}"
                )));
            }
        }
        Ok(())
    }
}
