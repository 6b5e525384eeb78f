//! Property tests for the geometry mapper and controller arbitration.

use std::sync::{Arc, Mutex};

use carousel_core::{
    Card, CarouselConfig, CarouselController, GeometryMapper, Transition, ViewportClass,
};
use proptest::prelude::*;

fn arb_viewport() -> impl Strategy<Value = ViewportClass> {
    prop_oneof![Just(ViewportClass::Mobile), Just(ViewportClass::Desktop)]
}

fn arb_deck_and_index() -> impl Strategy<Value = (usize, usize)> {
    (1usize..40).prop_flat_map(|total| (Just(total), 0..total))
}

#[derive(Debug, Clone)]
enum Action {
    Next,
    Previous,
    Click(usize),
    Drag(f32),
    Hover(bool),
    Wait(u64),
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Next),
        Just(Action::Previous),
        (0usize..20).prop_map(Action::Click),
        (-200.0f32..200.0).prop_map(Action::Drag),
        any::<bool>().prop_map(Action::Hover),
        (0u64..5000).prop_map(Action::Wait),
    ]
}

fn deck(total: usize) -> Vec<Card> {
    (0..total)
        .map(|i| Card::new(format!("Client {i}"), "", "text"))
        .collect()
}

proptest! {
    #[test]
    fn prop_positions_are_a_permutation(
        (total, active) in arb_deck_and_index(),
        viewport in arb_viewport()
    ) {
        let layout = GeometryMapper::default().map(active, total, viewport);
        prop_assert_eq!(layout.len(), total);

        let mut positions: Vec<usize> = layout.iter().map(|e| e.position).collect();
        prop_assert_eq!(layout[active].position, 0);
        positions.sort_unstable();
        prop_assert_eq!(positions, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn prop_visible_count_is_min_of_window_and_deck(
        (total, active) in arb_deck_and_index(),
        viewport in arb_viewport()
    ) {
        let mapper = GeometryMapper::default();
        let layout = mapper.map(active, total, viewport);
        let visible = layout.iter().filter(|e| e.visible).count();
        prop_assert_eq!(visible, total.min(mapper.window_size(viewport)));
    }

    #[test]
    fn prop_exactly_one_active_entry(
        (total, active) in arb_deck_and_index(),
        viewport in arb_viewport()
    ) {
        let layout = GeometryMapper::default().map(active, total, viewport);
        let active_entries: Vec<_> = layout.iter().filter(|e| e.is_active).collect();
        prop_assert_eq!(active_entries.len(), 1);
        prop_assert!(active_entries[0].visible);
        prop_assert!(active_entries
            .iter()
            .all(|e| layout.iter().all(|other| other.z_index <= e.z_index)));
    }

    #[test]
    fn prop_hidden_entries_are_inert(
        (total, active) in arb_deck_and_index(),
        viewport in arb_viewport()
    ) {
        let layout = GeometryMapper::default().map(active, total, viewport);
        for entry in layout.iter().filter(|e| !e.visible) {
            prop_assert_eq!(entry.opacity, 0.0);
            prop_assert_eq!(entry.z_index, 0);
        }
    }

    #[test]
    fn prop_mapping_is_idempotent(
        (total, active) in arb_deck_and_index(),
        viewport in arb_viewport()
    ) {
        let mapper = GeometryMapper::default();
        let first = mapper.map(active, total, viewport);
        let second = mapper.map(active, total, viewport);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_active_index_stays_in_range_and_moves_one_step_per_window(
        total in 1usize..12,
        actions in prop::collection::vec(arb_action(), 0..40)
    ) {
        let mut carousel = CarouselController::new(deck(total), CarouselConfig::default())
            .expect("valid carousel");
        carousel.start(0);
        let mut now = 0u64;

        for action in actions {
            now += 1;
            let before = carousel.state().active_index;
            let was_animating = carousel.state().is_animating
                && carousel.next_deadline().is_some_and(|d| d > now);
            let transition = match action {
                Action::Next => carousel.next(now),
                Action::Previous => carousel.previous(now),
                Action::Click(index) => carousel.go_to(index, now),
                Action::Drag(offset) => {
                    if carousel.pointer_down(0.0, now) {
                        carousel.pointer_move(offset, now);
                        carousel.pointer_up(now)
                    } else {
                        Transition::Ignored
                    }
                }
                Action::Hover(inside) => {
                    if inside {
                        carousel.pointer_enter(now);
                    } else {
                        carousel.pointer_leave(now);
                    }
                    Transition::Ignored
                }
                Action::Wait(ms) => {
                    now += ms;
                    carousel.tick(now);
                    Transition::Ignored
                }
            };

            let state = carousel.state();
            prop_assert!(state.active_index < total);
            if was_animating {
                prop_assert!(!transition.is_accepted());
            }
            if transition.is_accepted() {
                prop_assert!(state.is_animating);
                let step = (state.active_index + total - before) % total;
                let is_click = matches!(action, Action::Click(_));
                prop_assert!(is_click || step == 1 || step == total - 1);
            }
        }
    }

    #[test]
    fn prop_index_changes_are_one_settle_window_apart(
        total in 2usize..10,
        interval in 50u64..1200,
        actions in prop::collection::vec((arb_action(), 0u64..400), 0..60)
    ) {
        let config = CarouselConfig {
            auto_advance_interval_ms: interval,
            ..CarouselConfig::default()
        };
        let settle = config.settle_duration_ms;
        let mut carousel = CarouselController::new(deck(total), config).expect("valid carousel");

        let changes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&changes);
        let mut last_index = 0;
        carousel.on_change(move |snapshot| {
            if snapshot.active_index() != last_index {
                last_index = snapshot.active_index();
                sink.lock().expect("lock").push(snapshot.timestamp_ms);
            }
        });
        carousel.start(0);

        let mut now = 0u64;
        let mut accepted = 0usize;
        for (action, gap) in actions {
            now += gap;
            let outcome = match action {
                Action::Next => carousel.next(now),
                Action::Previous => carousel.previous(now),
                Action::Click(index) => carousel.go_to(index, now),
                Action::Drag(offset) => {
                    if carousel.pointer_down(0.0, now) {
                        carousel.pointer_move(offset, now);
                        carousel.pointer_up(now)
                    } else {
                        Transition::Ignored
                    }
                }
                Action::Hover(inside) => {
                    if inside {
                        carousel.pointer_enter(now);
                    } else {
                        carousel.pointer_leave(now);
                    }
                    Transition::Ignored
                }
                Action::Wait(ms) => {
                    now += ms;
                    accepted += carousel
                        .tick(now)
                        .iter()
                        .filter(|t| t.is_accepted())
                        .count();
                    Transition::Ignored
                }
            };
            accepted += usize::from(outcome.is_accepted());
            accepted += carousel
                .take_fired()
                .iter()
                .filter(|t| t.is_accepted())
                .count();
        }

        let changes = changes.lock().expect("lock");
        prop_assert_eq!(changes.len(), accepted);
        for pair in changes.windows(2) {
            prop_assert!(pair[1] - pair[0] >= settle, "changes at {:?}", pair);
        }
    }
}
