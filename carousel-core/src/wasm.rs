//! WebAssembly bindings for carousel-core.
//!
//! Exposes a [`CarouselController`] over [`Card`]s to a JavaScript renderer.
//! Timestamps come from `performance.now()` and are truncated to whole
//! milliseconds.

use wasm_bindgen::prelude::*;

use crate::{Card, CarouselConfig, CarouselController, CarouselEvent, ViewportClass};

/// Initialize the carousel WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_ms(now: f64) -> u64 {
    if now.is_finite() && now > 0.0 {
        now as u64
    } else {
        0
    }
}

/// Carousel instance for WASM.
#[wasm_bindgen]
pub struct WasmCarousel {
    controller: CarouselController<Card>,
}

#[wasm_bindgen]
impl WasmCarousel {
    /// Create a carousel from a JSON array of cards and optional JSON config.
    ///
    /// # Errors
    ///
    /// Returns an error string if parsing fails, the deck is empty or the
    /// configuration is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(cards_json: &str, config_json: Option<String>) -> Result<WasmCarousel, String> {
        let cards = Card::deck_from_json(cards_json).map_err(|e| e.to_string())?;
        let config = match config_json {
            Some(json) => CarouselConfig::from_json(&json).map_err(|e| e.to_string())?,
            None => CarouselConfig::default(),
        };
        let controller = CarouselController::new(cards, config).map_err(|e| e.to_string())?;
        Ok(Self { controller })
    }

    /// Arm auto-advance.
    pub fn start(&mut self, now: f64) {
        self.controller.start(to_ms(now));
    }

    /// Cancel all timers and drag listeners. The instance is inert afterwards.
    pub fn dispose(&mut self) {
        self.controller.dispose();
    }

    /// Fire due timers. Returns whether the active index changed.
    pub fn tick(&mut self, now: f64) -> bool {
        self.controller
            .tick(to_ms(now))
            .iter()
            .any(crate::Transition::is_accepted)
    }

    /// Step forward. Returns whether the step was accepted.
    pub fn next(&mut self, now: f64) -> bool {
        self.controller.next(to_ms(now)).is_accepted()
    }

    /// Step back. Returns whether the step was accepted.
    pub fn previous(&mut self, now: f64) -> bool {
        self.controller.previous(to_ms(now)).is_accepted()
    }

    /// Indicator click. Returns whether the jump was accepted.
    #[wasm_bindgen(js_name = goTo)]
    pub fn go_to(&mut self, index: usize, now: f64) -> bool {
        self.controller.go_to(index, to_ms(now)).is_accepted()
    }

    /// Pointer pressed. Returns whether a drag began; attach global
    /// move/up listeners when it did.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, now: f64) -> bool {
        self.controller.pointer_down(x, to_ms(now))
    }

    /// Pointer moved. Returns the live drag offset, or `undefined` when no
    /// drag is active. Call `preventDefault()` whenever it is defined.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, now: f64) -> Option<f32> {
        self.controller.pointer_move(x, to_ms(now))
    }

    /// Pointer released. Returns whether the drag committed a step. Detach
    /// global listeners afterwards.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, now: f64) -> bool {
        self.controller.pointer_up(to_ms(now)).is_accepted()
    }

    /// Pointer gesture cancelled.
    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self, now: f64) {
        self.controller.pointer_cancel(to_ms(now));
    }

    /// Pointer entered the carousel.
    #[wasm_bindgen(js_name = pointerEnter)]
    pub fn pointer_enter(&mut self, now: f64) {
        self.controller.pointer_enter(to_ms(now));
    }

    /// Pointer left the carousel.
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, now: f64) {
        self.controller.pointer_leave(to_ms(now));
    }

    /// Set the viewport class (`"mobile"` or `"desktop"`).
    ///
    /// # Errors
    ///
    /// Returns an error string for an unknown class.
    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, class: &str, now: f64) -> Result<(), String> {
        let viewport: ViewportClass = class.parse()?;
        self.controller.set_viewport(viewport, to_ms(now));
        Ok(())
    }

    /// Classify a viewport width against the configured breakpoint.
    #[wasm_bindgen(js_name = setViewportWidth)]
    pub fn set_viewport_width(&mut self, width: f32, now: f64) {
        self.controller.set_viewport_width(width, to_ms(now));
    }

    /// Dispatch a JSON-encoded input event.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event cannot be parsed.
    #[wasm_bindgen(js_name = handleEventJson)]
    pub fn handle_event_json(&mut self, json: &str) -> Result<bool, String> {
        let event: CarouselEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Ok(self.controller.handle_event(&event).is_accepted())
    }

    /// Current snapshot as JSON.
    #[wasm_bindgen(js_name = snapshotJson)]
    #[must_use]
    pub fn snapshot_json(&self) -> String {
        self.controller.snapshot().to_json().unwrap_or_default()
    }

    /// Current active index.
    #[wasm_bindgen(js_name = activeIndex)]
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.controller.state().active_index
    }

    /// Earliest pending timer deadline in milliseconds.
    #[wasm_bindgen(js_name = nextDeadline)]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn next_deadline(&self) -> Option<f64> {
        self.controller.next_deadline().map(|ms| ms as f64)
    }

    /// Whether global drag listeners should be attached.
    #[wasm_bindgen(js_name = listenersAttached)]
    #[must_use]
    pub fn listeners_attached(&self) -> bool {
        self.controller.listeners_attached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARDS: &str = r#"[
        {"name": "Ada", "role": "CTO", "text": "Fast"},
        {"name": "Lin", "role": "PM", "text": "Clear"},
        {"name": "Sam", "role": "CEO", "text": "Calm"}
    ]"#;

    #[test]
    fn wasm_carousel_new_parses_cards() {
        let carousel = WasmCarousel::new(CARDS, None).expect("valid carousel");
        assert_eq!(carousel.active_index(), 0);
        assert!(carousel.snapshot_json().contains("\"activeIndex\":0"));
    }

    #[test]
    fn wasm_carousel_rejects_empty_deck() {
        assert!(WasmCarousel::new("[]", None).is_err());
    }

    #[test]
    fn wasm_carousel_drag_round() {
        let mut carousel = WasmCarousel::new(CARDS, None).expect("valid carousel");
        assert!(carousel.pointer_down(300.0, 0.0));
        assert!(carousel.listeners_attached());
        assert_eq!(carousel.pointer_move(380.0, 16.0), Some(80.0));
        assert!(carousel.pointer_up(32.0));
        assert_eq!(carousel.active_index(), 2);
        assert!(!carousel.listeners_attached());
    }

    #[test]
    fn wasm_time_conversion_clamps() {
        assert_eq!(to_ms(-5.0), 0);
        assert_eq!(to_ms(f64::NAN), 0);
        assert_eq!(to_ms(1234.9), 1234);
    }
}
