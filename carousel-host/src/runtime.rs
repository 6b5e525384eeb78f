//! # Carousel Runtime
//!
//! Runs one [`CarouselController`] inside a tokio task and drives its
//! scheduled callbacks with real timers.
//!
//! ```text
//! HostInput ──mpsc──► task ──► controller ──watch──► latest snapshot
//!                      ▲   │                 └─broadcast─► transition log
//!     sleep_until(next_deadline)
//! ```
//!
//! The task owns the controller outright; no state is shared between
//! carousels. Dropping or shutting down the host disposes the controller,
//! which cancels every pending timer.

use std::future;
use std::time::Duration;

use carousel_core::{
    CarouselController, CarouselEvent, CarouselSnapshot, PointerEvent, PointerPhase, Transition,
    ViewportClass,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::{HostConfig, HostError, HostResult};

/// Capacity of the transition log channel.
const TRANSITION_LOG_CAPACITY: usize = 64;

/// An input for a hosted carousel. Timestamps are assigned by the host clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostInput {
    /// Pointer pressed.
    PointerDown {
        /// X position in container pixels.
        x: f32,
    },
    /// Pointer moved.
    PointerMove {
        /// X position in container pixels.
        x: f32,
    },
    /// Pointer released.
    PointerUp,
    /// Pointer gesture cancelled.
    PointerCancel,
    /// Pointer entered or left the carousel.
    Hover {
        /// Whether the pointer is over the carousel.
        inside: bool,
    },
    /// Indicator click.
    Click {
        /// Target card index.
        index: usize,
    },
    /// Step forward.
    Next,
    /// Step back.
    Previous,
    /// Viewport reclassified.
    Viewport {
        /// New viewport class.
        class: ViewportClass,
    },
}

/// A transition observed by the host, stamped with host time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRecord {
    /// Host clock in milliseconds.
    pub at_ms: u64,
    /// The outcome.
    pub transition: Transition,
    /// Focus card after the transition.
    pub focused_index: usize,
}

struct HostCommand {
    input: HostInput,
    reply: oneshot::Sender<Transition>,
}

/// Handle to a running hosted carousel.
pub struct CarouselHost {
    commands: mpsc::Sender<HostCommand>,
    snapshots: watch::Receiver<CarouselSnapshot>,
    transitions: broadcast::Sender<TransitionRecord>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl CarouselHost {
    /// Mount a carousel over `cards` and start driving it.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck is empty or the configuration is invalid.
    pub fn spawn<C>(cards: Vec<C>, config: &HostConfig) -> HostResult<Self>
    where
        C: Send + 'static,
    {
        let mut controller =
            CarouselController::new(cards, config.carousel.clone())?.with_viewport(config.viewport);

        let (snapshot_tx, snapshots) = watch::channel(controller.snapshot());
        controller.on_change(move |snapshot| {
            snapshot_tx.send_replace(snapshot.clone());
        });

        let (transitions, _) = broadcast::channel(TRANSITION_LOG_CAPACITY);
        let (commands, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(run(controller, command_rx, shutdown_rx, transitions.clone()));

        Ok(Self {
            commands,
            snapshots,
            transitions,
            shutdown_tx: Some(shutdown_tx),
            handle,
        })
    }

    /// Deliver an input and wait for its outcome.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Closed`] if the host task has stopped.
    pub async fn send(&self, input: HostInput) -> HostResult<Transition> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(HostCommand { input, reply })
            .await
            .map_err(|_| HostError::Closed)?;
        outcome.await.map_err(|_| HostError::Closed)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CarouselSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Watch published snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.snapshots.clone()
    }

    /// Subscribe to the transition log.
    #[must_use]
    pub fn transitions(&self) -> broadcast::Receiver<TransitionRecord> {
        self.transitions.subscribe()
    }

    /// Wait until a snapshot satisfies `predicate`, up to `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Timeout`] if the limit elapses first, or
    /// [`HostError::Closed`] if the host stops.
    pub async fn wait_for<F>(&self, limit: Duration, mut predicate: F) -> HostResult<CarouselSnapshot>
    where
        F: FnMut(&CarouselSnapshot) -> bool,
    {
        let mut rx = self.subscribe();
        let waited = tokio::time::timeout(limit, rx.wait_for(&mut predicate)).await;
        match waited {
            Ok(Ok(snapshot)) => Ok(snapshot.clone()),
            Ok(Err(_)) => Err(HostError::Closed),
            Err(_) => Err(HostError::Timeout(limit)),
        }
    }

    /// Gracefully stop the task and dispose the carousel.
    ///
    /// # Errors
    ///
    /// Returns an error if the task panicked.
    pub async fn shutdown(mut self) -> HostResult<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.handle.await?;
        Ok(())
    }

    /// Abort the task without waiting.
    pub fn abort(self) {
        self.handle.abort();
    }
}

impl std::fmt::Debug for CarouselHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarouselHost")
            .field("active_index", &self.snapshots.borrow().state.active_index)
            .field("finished", &self.handle.is_finished())
            .finish_non_exhaustive()
    }
}

fn elapsed_ms(origin: Instant) -> u64 {
    u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX)
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

fn apply<C>(controller: &mut CarouselController<C>, input: HostInput, now_ms: u64) -> Transition {
    let pointer = |phase, x| CarouselEvent::Pointer(PointerEvent::new(phase, x, now_ms));
    let event = match input {
        HostInput::Next => return controller.next(now_ms),
        HostInput::Previous => return controller.previous(now_ms),
        HostInput::PointerDown { x } => pointer(PointerPhase::Start, x),
        HostInput::PointerMove { x } => pointer(PointerPhase::Move, x),
        HostInput::PointerUp => pointer(PointerPhase::End, 0.0),
        HostInput::PointerCancel => pointer(PointerPhase::Cancel, 0.0),
        HostInput::Hover { inside } => CarouselEvent::Hover {
            inside,
            timestamp_ms: now_ms,
        },
        HostInput::Click { index } => CarouselEvent::IndicatorClick {
            index,
            timestamp_ms: now_ms,
        },
        HostInput::Viewport { class } => CarouselEvent::Viewport {
            class,
            timestamp_ms: now_ms,
        },
    };
    controller.handle_event(&event)
}

fn record<C>(
    log: &broadcast::Sender<TransitionRecord>,
    controller: &CarouselController<C>,
    transition: Transition,
) {
    if transition == Transition::Ignored {
        return;
    }
    // No subscribers is fine.
    let _ = log.send(TransitionRecord {
        at_ms: controller.now_ms(),
        transition,
        focused_index: controller.focused_index(),
    });
}

async fn run<C>(
    mut controller: CarouselController<C>,
    mut commands: mpsc::Receiver<HostCommand>,
    mut shutdown_rx: oneshot::Receiver<()>,
    log: broadcast::Sender<TransitionRecord>,
) {
    let origin = Instant::now();
    controller.start(0);

    loop {
        let deadline = controller
            .next_deadline()
            .map(|ms| origin + Duration::from_millis(ms));

        tokio::select! {
            _ = &mut shutdown_rx => {
                tracing::info!("Carousel host received shutdown signal");
                break;
            }

            command = commands.recv() => {
                let Some(HostCommand { input, reply }) = command else {
                    tracing::debug!("Carousel host command channel closed");
                    break;
                };
                tracing::trace!(?input, "Host input");
                let transition = apply(&mut controller, input, elapsed_ms(origin));
                // Ticks that fell due on the way in happened first.
                for fired in controller.take_fired() {
                    record(&log, &controller, fired);
                }
                record(&log, &controller, transition);
                // The caller may have stopped waiting.
                let _ = reply.send(transition);
            }

            () = sleep_until_deadline(deadline) => {
                for transition in controller.tick(elapsed_ms(origin)) {
                    record(&log, &controller, transition);
                }
            }
        }
    }

    controller.dispose();
}
