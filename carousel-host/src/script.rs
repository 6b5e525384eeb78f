//! Scripted input sequences for the simulator.
//!
//! A script is a JSON array of steps, each delivering one [`HostInput`] at a
//! host-clock offset:
//!
//! ```json
//! [
//!   {"atMs": 500, "input": {"type": "hover", "inside": true}},
//!   {"atMs": 900, "input": {"type": "click", "index": 3}}
//! ]
//! ```

use std::path::Path;

use carousel_core::Card;
use serde::{Deserialize, Serialize};

use crate::config::read_json;
use crate::{HostInput, HostResult};

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptStep {
    /// Host-clock offset in milliseconds.
    pub at_ms: u64,
    /// Input to deliver.
    pub input: HostInput,
}

impl ScriptStep {
    /// Create a step.
    #[must_use]
    pub fn new(at_ms: u64, input: HostInput) -> Self {
        Self { at_ms, input }
    }
}

/// An ordered input script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    steps: Vec<ScriptStep>,
}

impl Script {
    /// Build a script, ordering steps by time. Steps at the same instant keep
    /// their given order.
    #[must_use]
    pub fn new(mut steps: Vec<ScriptStep>) -> Self {
        steps.sort_by_key(|step| step.at_ms);
        Self { steps }
    }

    /// Load a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> HostResult<Self> {
        let steps: Vec<ScriptStep> = read_json(path)?;
        Ok(Self::new(steps))
    }

    /// Steps in delivery order.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Offset of the last step.
    #[must_use]
    pub fn end_ms(&self) -> u64 {
        self.steps.last().map_or(0, |step| step.at_ms)
    }

    /// A short session that touches every input path: an auto-advance, a
    /// hover pause, an indicator click, a click lost to the settle window, a
    /// swipe, a sub-threshold drag and a viewport change.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(vec![
            ScriptStep::new(3_500, HostInput::Hover { inside: true }),
            ScriptStep::new(4_000, HostInput::Click { index: 4 }),
            ScriptStep::new(4_200, HostInput::Click { index: 1 }),
            ScriptStep::new(5_000, HostInput::Hover { inside: false }),
            ScriptStep::new(7_500, HostInput::PointerDown { x: 400.0 }),
            ScriptStep::new(7_550, HostInput::PointerMove { x: 360.0 }),
            ScriptStep::new(7_600, HostInput::PointerMove { x: 310.0 }),
            ScriptStep::new(7_650, HostInput::PointerUp),
            ScriptStep::new(9_000, HostInput::PointerDown { x: 200.0 }),
            ScriptStep::new(9_050, HostInput::PointerMove { x: 230.0 }),
            ScriptStep::new(9_100, HostInput::PointerUp),
            ScriptStep::new(
                10_000,
                HostInput::Viewport {
                    class: carousel_core::ViewportClass::Mobile,
                },
            ),
            ScriptStep::new(13_000, HostInput::Previous),
        ])
    }
}

/// Load a deck of cards from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_deck(path: &Path) -> HostResult<Vec<Card>> {
    read_json(path)
}

/// A small built-in deck.
#[must_use]
pub fn demo_deck() -> Vec<Card> {
    [
        ("Amara Osei", "Head of Platform, Lumen", "Shipped in half the time we planned."),
        ("Jonas Brandt", "CTO, Fieldnote", "The migration was boring, which is the best compliment."),
        ("Priya Raman", "Founder, Tessel", "Support answered before we finished typing."),
        ("Mateo Silva", "Engineering Lead, Orbit", "Our on-call pages dropped to almost nothing."),
        ("Hana Kato", "Product Director, Wren", "Clear docs, sensible defaults, no surprises."),
        ("Elise Moreau", "VP Engineering, Quill", "We replaced three tools with one."),
    ]
    .into_iter()
    .map(|(name, role, text)| Card::new(name, role, text))
    .collect()
}
