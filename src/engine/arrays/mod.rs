//! Widget Toolkit - Parallel Arrays
//!
//! Per-element state that the document layer (focus, events, draw) needs to
//! read without knowing which widget owns the element. Each array index
//! corresponds to one element.
//!
//! Widget-specific state (menu pages, editor cursor...) lives in the widget
//! structs instead; these arrays only hold what crosses module boundaries.
//!
//! # Array Categories
//!
//! - **core**: Element kind and output rectangle
//! - **interaction**: Focusable, disabled, focus delegation
//! - **text**: Content, attributes and padding of text-bearing elements

pub mod core;
pub mod text;
pub mod interaction;

use std::cell::RefCell;

use self::core as core_arrays;
use self::text as text_arrays;
use self::interaction as interaction_arrays;

// =============================================================================
// Column
// =============================================================================

/// A growable column of per-index values with a fixed default.
///
/// Reads past the end return the default, so a released (or never written)
/// index always looks pristine.
pub struct Column<T: Clone> {
    default: T,
    values: RefCell<Vec<T>>,
}

impl<T: Clone> Column<T> {
    pub fn new(default: T) -> Self {
        Self {
            default,
            values: RefCell::new(Vec::new()),
        }
    }

    /// Grow the column so `index` is addressable.
    pub fn ensure(&self, index: usize) {
        let mut values = self.values.borrow_mut();
        if values.len() <= index {
            values.resize(index + 1, self.default.clone());
        }
    }

    pub fn get(&self, index: usize) -> T {
        self.values
            .borrow()
            .get(index)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }

    pub fn set(&self, index: usize, value: T) {
        self.ensure(index);
        self.values.borrow_mut()[index] = value;
    }

    /// Restore the default at `index`.
    pub fn clear(&self, index: usize) {
        if let Some(slot) = self.values.borrow_mut().get_mut(index) {
            *slot = self.default.clone();
        }
    }

    pub fn clear_all(&self) {
        self.values.borrow_mut().clear();
    }
}

/// Ensure all arrays have capacity for the given index.
///
/// Called by registry when allocating.
pub fn ensure_all_capacity(index: usize) {
    core_arrays::ensure_capacity(index);
    text_arrays::ensure_capacity(index);
    interaction_arrays::ensure_capacity(index);
}

/// Clear all array values at an index.
///
/// Called by registry when releasing.
pub fn clear_all_at_index(index: usize) {
    core_arrays::clear_at_index(index);
    text_arrays::clear_at_index(index);
    interaction_arrays::clear_at_index(index);
}

/// Reset all parallel arrays to release memory.
///
/// Called automatically when the last element is released.
pub fn reset_all_arrays() {
    core_arrays::reset();
    text_arrays::reset();
    interaction_arrays::reset();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_defaults_past_end() {
        let column = Column::new(7u16);
        assert_eq!(column.get(3), 7);

        column.set(3, 9);
        assert_eq!(column.get(3), 9);
        assert_eq!(column.get(1), 7);

        column.clear(3);
        assert_eq!(column.get(3), 7);

        column.set(0, 1);
        column.clear_all();
        assert_eq!(column.get(0), 7);
    }
}
