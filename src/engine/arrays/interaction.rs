//! Widget Toolkit - Interaction Arrays
//!
//! User interaction state:
//! - focusable: Can receive focus
//! - disabled: Refuses focus and activation
//! - noChildFocus: Descendants never hold focus; this element takes it instead
//! - focusChild: Direct child on the path to the focused element

use super::Column;

// =============================================================================
// Arrays
// =============================================================================

thread_local! {
    /// Is element focusable.
    static FOCUSABLE: Column<bool> = Column::new(false);

    /// Is element disabled.
    static DISABLED: Column<bool> = Column::new(false);

    /// Does element keep focus away from its descendants.
    static NO_CHILD_FOCUS: Column<bool> = Column::new(false);

    /// Direct child that holds (or last held) focus.
    static FOCUS_CHILD: Column<Option<usize>> = Column::new(None);
}

// =============================================================================
// Capacity Management
// =============================================================================

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    FOCUSABLE.with(|arr| arr.ensure(index));
    DISABLED.with(|arr| arr.ensure(index));
    NO_CHILD_FOCUS.with(|arr| arr.ensure(index));
    FOCUS_CHILD.with(|arr| arr.ensure(index));
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    FOCUSABLE.with(|arr| arr.clear(index));
    DISABLED.with(|arr| arr.clear(index));
    NO_CHILD_FOCUS.with(|arr| arr.clear(index));
    FOCUS_CHILD.with(|arr| arr.clear(index));
}

/// Reset all arrays.
pub fn reset() {
    FOCUSABLE.with(|arr| arr.clear_all());
    DISABLED.with(|arr| arr.clear_all());
    NO_CHILD_FOCUS.with(|arr| arr.clear_all());
    FOCUS_CHILD.with(|arr| arr.clear_all());
}

// =============================================================================
// Focusable
// =============================================================================

/// Get focusable at index.
pub fn get_focusable(index: usize) -> bool {
    FOCUSABLE.with(|arr| arr.get(index))
}

/// Set focusable at index.
pub fn set_focusable(index: usize, focusable: bool) {
    FOCUSABLE.with(|arr| arr.set(index, focusable));
}

// =============================================================================
// Disabled
// =============================================================================

pub fn get_disabled(index: usize) -> bool {
    DISABLED.with(|arr| arr.get(index))
}

pub fn set_disabled(index: usize, disabled: bool) {
    DISABLED.with(|arr| arr.set(index, disabled));
}

// =============================================================================
// Focus Delegation
// =============================================================================

pub fn get_no_child_focus(index: usize) -> bool {
    NO_CHILD_FOCUS.with(|arr| arr.get(index))
}

pub fn set_no_child_focus(index: usize, value: bool) {
    NO_CHILD_FOCUS.with(|arr| arr.set(index, value));
}

pub fn get_focus_child(index: usize) -> Option<usize> {
    FOCUS_CHILD.with(|arr| arr.get(index))
}

pub fn set_focus_child(index: usize, child: Option<usize>) {
    FOCUS_CHILD.with(|arr| arr.set(index, child));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        reset();
    }

    #[test]
    fn test_focusable() {
        setup();

        assert!(!get_focusable(0));
        set_focusable(0, true);
        assert!(get_focusable(0));

        clear_at_index(0);
        assert!(!get_focusable(0));
    }

    #[test]
    fn test_disabled_and_delegation() {
        setup();

        set_disabled(1, true);
        set_no_child_focus(1, true);
        set_focus_child(1, Some(4));

        assert!(get_disabled(1));
        assert!(get_no_child_focus(1));
        assert_eq!(get_focus_child(1), Some(4));
        assert_eq!(get_focus_child(2), None);
    }
}
