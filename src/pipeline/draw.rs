//! Redraw bookkeeping.
//!
//! `draw(index)` is synchronous and never coalesced. It bumps the redraw
//! generation (a signal, so effects can follow it), counts the call against
//! the element and refreshes the hit rects of the element's subtree. Turning
//! the arrays into terminal output is left to whoever watches the generation.

use std::cell::RefCell;
use std::collections::HashMap;
use spark_signals::{signal, Signal};

use crate::engine::arrays::core;
use crate::engine::{descendants, is_allocated};
use crate::state::mouse;

thread_local! {
    static GENERATION: Signal<u64> = signal(0);
    static DRAW_COUNTS: RefCell<HashMap<usize, u64>> = RefCell::new(HashMap::new());
}

/// Redraw an element and everything below it.
pub fn draw(index: usize) {
    if !is_allocated(index) {
        return;
    }

    DRAW_COUNTS.with(|counts| *counts.borrow_mut().entry(index).or_insert(0) += 1);

    let mut subtree = vec![index];
    subtree.extend(descendants(index));
    for i in subtree {
        let rect = core::get_rect(i);
        if rect.width > 0 && rect.height > 0 {
            mouse::fill_hit_rect(rect, i);
        }
    }

    let generation = GENERATION.with(|g| {
        let next = g.get() + 1;
        g.set(next);
        next
    });
    tracing::trace!(target: "spark_widgets::draw", index, generation, "draw");
}

/// Signal bumped on every draw.
pub fn generation_signal() -> Signal<u64> {
    GENERATION.with(|g| g.clone())
}

pub fn generation() -> u64 {
    GENERATION.with(|g| g.get())
}

/// How many times `draw` was called on this element.
pub fn draw_count(index: usize) -> u64 {
    DRAW_COUNTS.with(|counts| counts.borrow().get(&index).copied().unwrap_or(0))
}

/// Drop the counter of a released element.
pub fn forget(index: usize) {
    DRAW_COUNTS.with(|counts| counts.borrow_mut().remove(&index));
}

/// Reset draw state (for testing)
pub fn reset_draw_state() {
    GENERATION.with(|g| g.set(0));
    DRAW_COUNTS.with(|counts| counts.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, reset_registry};
    use crate::state::mouse::{hit_test, reset_mouse_state};
    use crate::types::Rect;

    fn setup() {
        reset_registry();
        reset_mouse_state();
        reset_draw_state();
    }

    #[test]
    fn test_draw_counts_and_generation() {
        setup();

        let a = allocate_index(None, None);
        draw(a);
        draw(a);

        assert_eq!(draw_count(a), 2);
        assert_eq!(generation(), 2);

        forget(a);
        assert_eq!(draw_count(a), 0);
    }

    #[test]
    fn test_draw_fills_hit_rects_children_last() {
        setup();

        let menu = allocate_index(None, None);
        let button = allocate_index(None, Some(menu));
        core::set_rect(menu, Rect::new(0, 0, 10, 3));
        core::set_rect(button, Rect::new(0, 1, 10, 1));

        draw(menu);
        assert_eq!(hit_test(0, 0), Some(menu));
        assert_eq!(hit_test(5, 1), Some(button));
        assert_eq!(draw_count(button), 0);
    }

    #[test]
    fn test_draw_released_is_noop() {
        setup();

        draw(3);
        assert_eq!(generation(), 0);
    }
}
