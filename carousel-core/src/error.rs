//! Error types for carousel construction and serialization.

use thiserror::Error;

/// Result type for carousel operations.
pub type CarouselResult<T> = Result<T, CarouselError>;

/// Errors that can occur when building or configuring a carousel.
///
/// Lock contention and requests made after disposal are not errors; they are
/// reported through [`crate::Transition`].
#[derive(Debug, Error)]
pub enum CarouselError {
    /// The carousel was given no cards to display.
    #[error("Carousel requires at least one card")]
    EmptyDeck,

    /// A configuration value is out of range.
    #[error("Invalid carousel configuration: {0}")]
    InvalidConfig(String),

    /// Card or configuration (de)serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
