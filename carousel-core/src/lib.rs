//! # Carousel Core
//!
//! Positioning, selection and gesture state machine for a testimonial
//! carousel. Renderer-agnostic; compiles to WASM for browser front-ends.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                carousel-core                │
//! ├─────────────────────────────────────────────┤
//! │  Input            │  Arbitration            │
//! │  - GestureTracker │  - CarouselController   │
//! │  - Indicator      │  - AnimationLock        │
//! │  - AutoAdvance    │                         │
//! ├─────────────────────────────────────────────┤
//! │  Output: GeometryMapper → per-card layout   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The engine owns no clock. Callers pass a monotonic millisecond timestamp
//! with every call and [`CarouselController::tick`] at
//! [`CarouselController::next_deadline`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod card;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod lock;
pub mod state;
pub mod timer;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use card::{Card, CardId};
pub use config::CarouselConfig;
pub use controller::{CarouselController, ChangeListener};
pub use error::{CarouselError, CarouselResult};
pub use event::{CarouselEvent, PointerEvent, PointerPhase};
pub use geometry::{circular_position, wrap_index, GeometryMapper, LayoutEntry, ViewportClass};
pub use gesture::{Direction, DragListeners, GestureTracker};
pub use lock::AnimationLock;
pub use state::{CarouselSnapshot, CarouselState, DropReason, NavigationSource, Transition};
pub use timer::{AutoAdvanceTimer, Timer};

/// Carousel core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
