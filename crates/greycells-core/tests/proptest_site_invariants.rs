//! Property-based invariant tests for the carousel, counters and nav links.
//!
//! 1. Carousel index stays in range under any next/prev sequence.
//! 2. `prev` undoes `next`.
//! 3. `len` consecutive `next` calls return to the starting card.
//! 4. Counter display never decreases and never exceeds the target.
//! 5. Counter always finishes, showing exactly the target.
//! 6. Contiguous, non-overlapping sections activate at most one link.
//! 7. Scroll effects match the strict thresholds.

use greycells_core::carousel::Carousel;
use greycells_core::config::{CounterConfig, NavConfig};
use greycells_core::counter::CounterAnimation;
use greycells_core::nav::{ScrollEffects, SectionBounds, active_links};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn steps_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 0..64)
}

fn contiguous_sections() -> impl Strategy<Value = Vec<SectionBounds>> {
    (0.0f64..500.0, prop::collection::vec(1.0f64..800.0, 1..8)).prop_map(|(start, heights)| {
        let mut top = start;
        heights
            .into_iter()
            .enumerate()
            .map(|(i, height)| {
                let section = SectionBounds::new(format!("s{i}"), top, height);
                top += height;
                section
            })
            .collect()
    })
}

// ── Carousel ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn carousel_index_in_range(len in 1usize..12, steps in steps_strategy()) {
        let mut carousel = Carousel::new(len).unwrap();
        for forward in steps {
            let index = if forward { carousel.next() } else { carousel.prev() };
            prop_assert!(index < len);
            prop_assert_eq!(index, carousel.current());
            prop_assert_eq!(carousel.active_flags().filter(|a| *a).count(), 1);
        }
    }

    #[test]
    fn carousel_prev_undoes_next(len in 1usize..12, start in 0usize..12) {
        let mut carousel = Carousel::new(len).unwrap();
        carousel.show(start % len);
        let before = carousel.current();
        carousel.next();
        prop_assert_eq!(carousel.prev(), before);
    }

    #[test]
    fn carousel_full_cycle(len in 1usize..12) {
        let mut carousel = Carousel::new(len).unwrap();
        let mut last = 0;
        for _ in 0..len {
            last = carousel.next();
        }
        prop_assert_eq!(last, 0);
    }
}

// ── Counter ───────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn counter_monotone_and_bounded(target in 0u64..1_000_000) {
        let mut animation = CounterAnimation::new(target, &CounterConfig::default());
        let mut last = 0;
        for _ in 0..1_000 {
            let frame = animation.tick();
            prop_assert!(frame.display >= last);
            prop_assert!(frame.display <= target);
            last = frame.display;
            if frame.finished {
                break;
            }
        }
        prop_assert!(animation.is_finished());
        prop_assert_eq!(last, target);
    }

    #[test]
    fn counter_finishes_near_nominal_frames(target in 1u64..100_000, period in 1u64..100) {
        let config = CounterConfig {
            frame_period_ms: period,
            duration_ms: period * 50,
            ..CounterConfig::default()
        };
        let mut animation = CounterAnimation::new(target, &config);
        let mut frames = 0;
        while !animation.tick().finished {
            frames += 1;
            prop_assert!(frames <= 60);
        }
    }
}

// ── Navigation ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn contiguous_sections_single_active_link(
        sections in contiguous_sections(),
        scroll_y in 0.0f64..6000.0,
    ) {
        let links = active_links(scroll_y, &sections, 100.0);
        prop_assert_eq!(links.len(), sections.len());
        prop_assert!(links.iter().filter(|l| l.active).count() <= 1);
    }

    #[test]
    fn scroll_effects_thresholds(scroll_y in -100.0f64..2000.0) {
        let effects = ScrollEffects::at(scroll_y, &NavConfig::default());
        prop_assert_eq!(effects.header_scrolled, scroll_y > 50.0);
        prop_assert_eq!(effects.back_to_top_visible, scroll_y > 500.0);
    }
}
