//! Cards - the opaque payloads a carousel cycles through.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::CarouselResult;

/// Unique identifier for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(Uuid);

impl CardId {
    /// Create a new unique card ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A testimonial card.
///
/// The engine never looks inside a card; it only addresses cards by their
/// position in the deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Stable identifier. Generated when absent from the input JSON.
    #[serde(default)]
    pub id: CardId,
    /// Name of the person quoted.
    pub name: String,
    /// Their role or company.
    #[serde(default)]
    pub role: String,
    /// The testimonial text.
    pub text: String,
}

impl Card {
    /// Create a new card with a fresh ID.
    #[must_use]
    pub fn new(name: impl Into<String>, role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: CardId::new(),
            name: name.into(),
            role: role.into(),
            text: text.into(),
        }
    }

    /// Parse an ordered deck of cards from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of cards.
    pub fn deck_from_json(json: &str) -> CarouselResult<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}
