//! # Carousel Controller
//!
//! Single owner of [`CarouselState`]. Auto-advance ticks, indicator clicks and
//! gesture commits all funnel through one arbitration point guarded by the
//! [`AnimationLock`]:
//!
//! ```text
//! AutoAdvanceTimer ──┐
//! indicator click ───┼──► request ──► AnimationLock ──► GeometryMapper ──► listeners
//! GestureTracker ────┘        │ held
//!                             └──► dropped (no queue, no retry)
//! ```
//!
//! Time is supplied by the caller. Every entry point first fires the timers
//! that fell due before `now_ms`, in deadline order, so callbacks always act
//! on current state.

use std::fmt;

use crate::timer::AutoAdvanceTimer;
use crate::{
    AnimationLock, Card, CarouselConfig, CarouselError, CarouselEvent, CarouselResult,
    CarouselSnapshot, CarouselState, DropReason, GeometryMapper, GestureTracker, LayoutEntry,
    NavigationSource, PointerPhase, Transition, ViewportClass,
};

/// Callback invoked with a fresh snapshot after every published change.
pub type ChangeListener = Box<dyn FnMut(&CarouselSnapshot) + Send>;

/// Scheduled callbacks owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    SettleRelease,
    ResumeCooldown,
    AutoAdvance,
}

/// Where a navigation request wants to go.
#[derive(Debug, Clone, Copy)]
enum Target {
    Step(i64),
    Index(usize),
}

/// Testimonial carousel state machine.
pub struct CarouselController<C = Card> {
    cards: Vec<C>,
    config: CarouselConfig,
    mapper: GeometryMapper,
    viewport: ViewportClass,
    state: CarouselState,
    lock: AnimationLock,
    auto: AutoAdvanceTimer,
    gesture: GestureTracker,
    hovered: bool,
    disposed: bool,
    now_ms: u64,
    fired: Vec<Transition>,
    listeners: Vec<ChangeListener>,
}

impl<C> CarouselController<C> {
    /// Mount a carousel over an ordered deck of cards.
    ///
    /// The carousel starts at index 0 on a desktop viewport with auto-advance
    /// stopped; call [`CarouselController::start`] to arm it.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck is empty or the configuration is invalid.
    pub fn new(cards: Vec<C>, config: CarouselConfig) -> CarouselResult<Self> {
        if cards.is_empty() {
            return Err(CarouselError::EmptyDeck);
        }
        config.validate()?;

        Ok(Self {
            mapper: GeometryMapper::new(config.mobile_window, config.desktop_window),
            lock: AnimationLock::new(config.settle_duration_ms),
            auto: AutoAdvanceTimer::new(config.auto_advance_interval_ms, config.resume_cooldown_ms),
            gesture: GestureTracker::new(config.drag_threshold_px),
            cards,
            config,
            viewport: ViewportClass::default(),
            state: CarouselState::new(),
            hovered: false,
            disposed: false,
            now_ms: 0,
            fired: Vec::new(),
            listeners: Vec::new(),
        })
    }

    /// Set the initial viewport class.
    #[must_use]
    pub fn with_viewport(mut self, viewport: ViewportClass) -> Self {
        self.viewport = viewport;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// All cards, in deck order.
    #[must_use]
    pub fn cards(&self) -> &[C] {
        &self.cards
    }

    /// Number of cards in the deck. Never zero.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Index of the card in the focus slot.
    #[must_use]
    pub fn focused_index(&self) -> usize {
        let focus = self.mapper.focus_position(self.card_count(), self.viewport);
        (self.state.active_index + focus) % self.card_count()
    }

    /// Configuration the carousel was built with.
    #[must_use]
    pub const fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CarouselState {
        &self.state
    }

    /// Current viewport class.
    #[must_use]
    pub const fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    /// Latest timestamp the controller has seen.
    #[must_use]
    pub const fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Whether [`CarouselController::dispose`] has been called.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether global drag listeners should currently be attached.
    #[must_use]
    pub const fn listeners_attached(&self) -> bool {
        self.gesture.listeners_attached()
    }

    /// Layout of every card for the current state.
    #[must_use]
    pub fn layout(&self) -> Vec<LayoutEntry> {
        self.mapper
            .map(self.state.active_index, self.card_count(), self.viewport)
    }

    /// Snapshot of the current state and layout.
    #[must_use]
    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            timestamp_ms: self.now_ms,
            state: self.state,
            focused_index: self.focused_index(),
            viewport: self.viewport,
            layout: self.layout(),
        }
    }

    /// Earliest pending timer deadline, if any.
    ///
    /// A host should call [`CarouselController::tick`] at or after this time.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.next_timer().map(|(deadline, _)| deadline)
    }

    /// Register a listener for published snapshots.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&CarouselSnapshot) + Send + 'static,
    {
        if !self.disposed {
            self.listeners.push(Box::new(listener));
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Arm auto-advance (when enabled in the configuration) and publish the
    /// initial snapshot.
    pub fn start(&mut self, now_ms: u64) {
        if self.disposed {
            return;
        }
        self.advance_clock(now_ms);
        if self.config.auto_start {
            self.auto.start(self.now_ms);
            if self.hovered || self.state.is_dragging {
                self.auto.pause();
            }
        }
        self.state.is_auto_scrolling = self.auto.is_running();
        tracing::info!(
            cards = self.card_count(),
            viewport = ?self.viewport,
            auto_scrolling = self.state.is_auto_scrolling,
            "Carousel started"
        );
        self.publish();
    }

    /// Tear down: cancel every timer, detach drag listeners and drop all
    /// subscribers. Every later call is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.lock.cancel();
        self.auto.cancel();
        self.gesture.cancel();
        self.fired.clear();
        self.listeners.clear();
        self.state = CarouselState {
            active_index: self.state.active_index,
            ..CarouselState::new()
        };
        tracing::info!(active_index = self.state.active_index, "Carousel disposed");
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Fire every timer due at `now_ms`.
    ///
    /// Returns the outcome of each auto-advance tick that fired, including
    /// ticks that fell due inside earlier input calls and were not yet taken
    /// with [`CarouselController::take_fired`].
    pub fn tick(&mut self, now_ms: u64) -> Vec<Transition> {
        if self.disposed {
            return Vec::new();
        }
        self.advance_clock(now_ms);
        self.take_fired()
    }

    /// Drain the auto-advance outcomes fired while handling input.
    ///
    /// Every entry point fires due timers before acting, so an input call can
    /// apply an auto-advance of its own accord. Those outcomes are kept here,
    /// in firing order, until collected.
    pub fn take_fired(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.fired)
    }

    /// Step forward one card.
    pub fn next(&mut self, now_ms: u64) -> Transition {
        self.navigate(Target::Step(1), NavigationSource::Programmatic, now_ms)
    }

    /// Step back one card.
    pub fn previous(&mut self, now_ms: u64) -> Transition {
        self.navigate(Target::Step(-1), NavigationSource::Programmatic, now_ms)
    }

    /// Jump to a card, as from an indicator click.
    ///
    /// Out-of-range indices wrap. Also restarts the auto-advance cool-down.
    pub fn go_to(&mut self, index: usize, now_ms: u64) -> Transition {
        if self.disposed {
            return Transition::Ignored;
        }
        self.advance_clock(now_ms);
        self.pause_auto_scroll();
        self.auto.schedule_resume(self.now_ms);
        let transition = self.request(Target::Index(index), NavigationSource::Indicator);
        if !transition.is_accepted() {
            self.publish();
        }
        transition
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    /// Pointer pressed at `x`. Returns whether a drag began.
    pub fn pointer_down(&mut self, x: f32, now_ms: u64) -> bool {
        if self.disposed {
            return false;
        }
        self.advance_clock(now_ms);
        if !self.gesture.on_start(x, self.lock.is_held()) {
            tracing::trace!(x, animating = self.lock.is_held(), "Drag start refused");
            return false;
        }
        self.pause_auto_scroll();
        self.state.is_dragging = true;
        self.state.drag_offset = 0.0;
        tracing::trace!(x, "Drag started");
        self.publish();
        true
    }

    /// Pointer moved to `x`.
    ///
    /// Returns the live drag offset while dragging; the renderer should
    /// suppress default selection and scrolling whenever this is `Some`.
    pub fn pointer_move(&mut self, x: f32, now_ms: u64) -> Option<f32> {
        if self.disposed {
            return None;
        }
        self.advance_clock(now_ms);
        let offset = self.gesture.on_move(x)?;
        self.state.drag_offset = offset;
        self.publish();
        Some(offset)
    }

    /// Pointer released. Commits at most one step.
    pub fn pointer_up(&mut self, now_ms: u64) -> Transition {
        if self.disposed {
            return Transition::Ignored;
        }
        self.advance_clock(now_ms);
        let offset = self.gesture.offset();
        if !self.gesture.is_dragging() {
            return Transition::Ignored;
        }
        let direction = self.gesture.on_end();
        self.end_drag();

        let transition = match direction {
            Some(direction) => {
                tracing::debug!(offset, ?direction, "Gesture committed");
                self.request(Target::Step(direction.delta()), NavigationSource::Gesture)
            }
            None => {
                tracing::trace!(offset, "Gesture below threshold");
                Transition::Ignored
            }
        };
        if !transition.is_accepted() {
            self.publish();
        }
        transition
    }

    /// Pointer gesture cancelled by the platform. Never commits.
    pub fn pointer_cancel(&mut self, now_ms: u64) {
        if self.disposed {
            return;
        }
        self.advance_clock(now_ms);
        if self.gesture.cancel() {
            self.end_drag();
            self.publish();
        }
    }

    /// Pointer entered the carousel: pause auto-scrolling.
    pub fn pointer_enter(&mut self, now_ms: u64) {
        if self.disposed {
            return;
        }
        self.advance_clock(now_ms);
        self.hovered = true;
        if self.pause_auto_scroll() {
            self.publish();
        }
    }

    /// Pointer left the carousel: resume auto-scrolling after the cool-down.
    pub fn pointer_leave(&mut self, now_ms: u64) {
        if self.disposed {
            return;
        }
        self.advance_clock(now_ms);
        self.hovered = false;
        if !self.state.is_dragging && !self.auto.is_running() {
            self.auto.schedule_resume(self.now_ms);
        }
    }

    /// The external resize listener reclassified the viewport.
    pub fn set_viewport(&mut self, viewport: ViewportClass, now_ms: u64) {
        if self.disposed {
            return;
        }
        self.advance_clock(now_ms);
        if self.viewport != viewport {
            tracing::debug!(from = ?self.viewport, to = ?viewport, "Viewport changed");
            self.viewport = viewport;
            self.publish();
        }
    }

    /// Classify a raw viewport width against the configured breakpoint.
    pub fn set_viewport_width(&mut self, width_px: f32, now_ms: u64) {
        let viewport = ViewportClass::from_width(width_px, self.config.mobile_breakpoint_px);
        self.set_viewport(viewport, now_ms);
    }

    /// Dispatch a serialized input event.
    pub fn handle_event(&mut self, event: &CarouselEvent) -> Transition {
        let now_ms = event.timestamp_ms();
        match event {
            CarouselEvent::Pointer(pointer) => match pointer.phase {
                PointerPhase::Start => {
                    self.pointer_down(pointer.x, now_ms);
                    Transition::Ignored
                }
                PointerPhase::Move => {
                    self.pointer_move(pointer.x, now_ms);
                    Transition::Ignored
                }
                PointerPhase::End => self.pointer_up(now_ms),
                PointerPhase::Cancel => {
                    self.pointer_cancel(now_ms);
                    Transition::Ignored
                }
            },
            CarouselEvent::Hover { inside, .. } => {
                if *inside {
                    self.pointer_enter(now_ms);
                } else {
                    self.pointer_leave(now_ms);
                }
                Transition::Ignored
            }
            CarouselEvent::IndicatorClick { index, .. } => self.go_to(*index, now_ms),
            CarouselEvent::Viewport { class, .. } => {
                self.set_viewport(*class, now_ms);
                Transition::Ignored
            }
            CarouselEvent::Tick { .. } => self
                .tick(now_ms)
                .into_iter()
                .rev()
                .find(Transition::is_accepted)
                .unwrap_or(Transition::Ignored),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn navigate(&mut self, target: Target, source: NavigationSource, now_ms: u64) -> Transition {
        if self.disposed {
            return Transition::Ignored;
        }
        self.advance_clock(now_ms);
        let transition = self.request(target, source);
        if !transition.is_accepted() {
            tracing::trace!(?source, ?transition, "Navigation not applied");
        }
        transition
    }

    /// The single arbitration point for every index change.
    fn request(&mut self, target: Target, source: NavigationSource) -> Transition {
        if self.disposed {
            return Transition::Ignored;
        }
        if source == NavigationSource::AutoAdvance {
            let reason = if self.state.is_dragging {
                Some(DropReason::Dragging)
            } else if !self.state.is_auto_scrolling {
                Some(DropReason::AutoScrollPaused)
            } else {
                None
            };
            if let Some(reason) = reason {
                tracing::trace!(?reason, "Auto-advance dropped");
                return Transition::Dropped { source, reason };
            }
        }

        let total = self.card_count();
        let from = self.state.active_index;
        let to = match target {
            Target::Step(delta) => crate::wrap_index(i64::try_from(from).unwrap_or(0) + delta, total),
            Target::Index(index) => index % total,
        };
        if to == from {
            return Transition::Ignored;
        }
        if !self.lock.try_enter(self.now_ms) {
            tracing::trace!(?source, from, to, "Transition dropped while animating");
            return Transition::Dropped {
                source,
                reason: DropReason::Animating,
            };
        }

        debug_assert!(to < total, "wrapped index {to} out of range {total}");
        self.state = CarouselState {
            active_index: to,
            is_animating: true,
            ..self.state
        };
        self.auto.reset(self.now_ms);
        tracing::debug!(?source, from, to, "Transition accepted");
        self.publish();
        Transition::Accepted { from, to, source }
    }

    /// Fire due timers in deadline order, then move the clock to `now_ms`.
    ///
    /// Auto-advance outcomes are queued on `fired`.
    fn advance_clock(&mut self, now_ms: u64) {
        if now_ms < self.now_ms {
            tracing::trace!(now_ms, last = self.now_ms, "Clock went backwards; clamping");
        }
        let now_ms = now_ms.max(self.now_ms);

        while let Some((deadline, kind)) = self.next_timer().filter(|(d, _)| *d <= now_ms) {
            self.now_ms = self.now_ms.max(deadline);
            tracing::trace!(?kind, deadline, "Timer fired");
            match kind {
                TimerKind::SettleRelease => {
                    if self.lock.poll(self.now_ms) {
                        self.state.is_animating = false;
                        self.publish();
                    }
                }
                TimerKind::ResumeCooldown => {
                    if self.auto.fire_resume(self.now_ms) {
                        self.resume_auto_scroll();
                    }
                }
                TimerKind::AutoAdvance => {
                    if self.auto.fire_tick(self.now_ms) {
                        let transition = self.request(Target::Step(1), NavigationSource::AutoAdvance);
                        self.fired.push(transition);
                    }
                }
            }
        }

        self.now_ms = now_ms;
    }

    /// Earliest armed timer. Ties go to the settle release, then the resume,
    /// so a tick landing on the same instant sees the lock free.
    fn next_timer(&self) -> Option<(u64, TimerKind)> {
        [
            (self.lock.release_deadline(), TimerKind::SettleRelease),
            (self.auto.resume_deadline(), TimerKind::ResumeCooldown),
            (self.auto.tick_deadline(), TimerKind::AutoAdvance),
        ]
        .into_iter()
        .filter_map(|(deadline, kind)| deadline.map(|d| (d, kind)))
        .min_by_key(|(deadline, _)| *deadline)
    }

    fn resume_auto_scroll(&mut self) {
        if self.hovered || self.state.is_dragging {
            tracing::trace!(hovered = self.hovered, "Resume skipped; still interacting");
            return;
        }
        if self.auto.resume(self.now_ms) {
            self.state.is_auto_scrolling = true;
            tracing::debug!("Auto-scroll resumed");
            self.publish();
        }
    }

    /// Returns whether the auto-scrolling flag changed.
    fn pause_auto_scroll(&mut self) -> bool {
        self.auto.pause();
        std::mem::replace(&mut self.state.is_auto_scrolling, false)
    }

    fn end_drag(&mut self) {
        self.state.is_dragging = false;
        self.state.drag_offset = 0.0;
        self.auto.schedule_resume(self.now_ms);
    }

    fn publish(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

impl<C> fmt::Debug for CarouselController<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselController")
            .field("cards", &self.cards.len())
            .field("viewport", &self.viewport)
            .field("state", &self.state)
            .field("lock", &self.lock)
            .field("auto", &self.auto)
            .field("gesture", &self.gesture)
            .field("hovered", &self.hovered)
            .field("disposed", &self.disposed)
            .field("now_ms", &self.now_ms)
            .field("fired", &self.fired.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
