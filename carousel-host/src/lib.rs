//! # Carousel Host
//!
//! Tokio runtime host for [`carousel_core`]. Owns one controller per task,
//! drives its timers with real time, and publishes snapshots to renderers.
//! This library is used by both the `carousel-sim` binary and integration
//! tests.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::time::Duration;

use carousel_core::CarouselError;
use thiserror::Error;

pub mod config;
pub mod runtime;
pub mod script;

pub use config::HostConfig;
pub use runtime::{CarouselHost, HostInput, TransitionRecord};
pub use script::{demo_deck, load_deck, Script, ScriptStep};

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors from hosting a carousel.
#[derive(Debug, Error)]
pub enum HostError {
    /// The carousel could not be built.
    #[error(transparent)]
    Core(#[from] CarouselError),

    /// The host task has stopped.
    #[error("Carousel host has shut down")]
    Closed,

    /// A wait elapsed before its condition held.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The host task panicked or was aborted.
    #[error("Host task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A configuration, deck or script file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A file did not contain valid JSON for its type.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        /// Path that failed.
        path: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}
