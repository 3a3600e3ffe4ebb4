//! Widget Toolkit - Core Arrays
//!
//! Identity and geometry:
//! - kind: Which widget type owns the element
//! - x, y, width, height: Output rectangle in terminal cells
//!
//! Geometry is assigned by widgets when they place their children; nothing
//! here computes layout.

use super::Column;
use crate::types::{ElementKind, Rect};

// =============================================================================
// Arrays
// =============================================================================

thread_local! {
    /// Element kind.
    static KIND: Column<ElementKind> = Column::new(ElementKind::None);

    /// Output X.
    static X: Column<u16> = Column::new(0);

    /// Output Y.
    static Y: Column<u16> = Column::new(0);

    /// Output width.
    static WIDTH: Column<u16> = Column::new(0);

    /// Output height.
    static HEIGHT: Column<u16> = Column::new(0);
}

// =============================================================================
// Capacity Management
// =============================================================================

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    KIND.with(|arr| arr.ensure(index));
    X.with(|arr| arr.ensure(index));
    Y.with(|arr| arr.ensure(index));
    WIDTH.with(|arr| arr.ensure(index));
    HEIGHT.with(|arr| arr.ensure(index));
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    KIND.with(|arr| arr.clear(index));
    X.with(|arr| arr.clear(index));
    Y.with(|arr| arr.clear(index));
    WIDTH.with(|arr| arr.clear(index));
    HEIGHT.with(|arr| arr.clear(index));
}

/// Reset all arrays.
pub fn reset() {
    KIND.with(|arr| arr.clear_all());
    X.with(|arr| arr.clear_all());
    Y.with(|arr| arr.clear_all());
    WIDTH.with(|arr| arr.clear_all());
    HEIGHT.with(|arr| arr.clear_all());
}

// =============================================================================
// Kind
// =============================================================================

pub fn get_kind(index: usize) -> ElementKind {
    KIND.with(|arr| arr.get(index))
}

pub fn set_kind(index: usize, kind: ElementKind) {
    KIND.with(|arr| arr.set(index, kind));
}

// =============================================================================
// Rect
// =============================================================================

/// Get the output rectangle at index.
pub fn get_rect(index: usize) -> Rect {
    Rect {
        x: X.with(|arr| arr.get(index)),
        y: Y.with(|arr| arr.get(index)),
        width: WIDTH.with(|arr| arr.get(index)),
        height: HEIGHT.with(|arr| arr.get(index)),
    }
}

/// Set the output rectangle at index.
pub fn set_rect(index: usize, rect: Rect) {
    X.with(|arr| arr.set(index, rect.x));
    Y.with(|arr| arr.set(index, rect.y));
    WIDTH.with(|arr| arr.set(index, rect.width));
    HEIGHT.with(|arr| arr.set(index, rect.height));
}

pub fn set_width(index: usize, width: u16) {
    WIDTH.with(|arr| arr.set(index, width));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        reset();
    }

    #[test]
    fn test_rect_round_trip() {
        setup();

        set_rect(2, Rect::new(1, 2, 30, 4));
        assert_eq!(get_rect(2), Rect::new(1, 2, 30, 4));

        set_width(2, 10);
        assert_eq!(get_rect(2).width, 10);

        clear_at_index(2);
        assert_eq!(get_rect(2), Rect::default());
    }

    #[test]
    fn test_kind() {
        setup();

        assert_eq!(get_kind(0), ElementKind::None);
        set_kind(0, ElementKind::Menu);
        assert_eq!(get_kind(0), ElementKind::Menu);
    }
}
