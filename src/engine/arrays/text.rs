//! Widget Toolkit - Text Arrays
//!
//! Text-related properties of labels and buttons:
//! - textContent: The text string to display
//! - hasMarkup: Content carries `^` style markup
//! - textAttr: Colors and flags for the current state
//! - leftPadding / rightPadding: Strings drawn around the content

use super::Column;
use crate::types::AttrSet;

// =============================================================================
// Arrays
// =============================================================================

thread_local! {
    /// Text content string.
    static TEXT_CONTENT: Column<String> = Column::new(String::new());

    /// Content contains markup.
    static HAS_MARKUP: Column<bool> = Column::new(false);

    /// Text attribute set.
    static TEXT_ATTR: Column<AttrSet> = Column::new(AttrSet::new());

    /// Left padding string.
    static LEFT_PADDING: Column<String> = Column::new(String::new());

    /// Right padding string.
    static RIGHT_PADDING: Column<String> = Column::new(String::new());
}

// =============================================================================
// Capacity Management
// =============================================================================

/// Ensure arrays have capacity for the given index.
pub fn ensure_capacity(index: usize) {
    TEXT_CONTENT.with(|arr| arr.ensure(index));
    HAS_MARKUP.with(|arr| arr.ensure(index));
    TEXT_ATTR.with(|arr| arr.ensure(index));
    LEFT_PADDING.with(|arr| arr.ensure(index));
    RIGHT_PADDING.with(|arr| arr.ensure(index));
}

/// Clear values at index.
pub fn clear_at_index(index: usize) {
    TEXT_CONTENT.with(|arr| arr.clear(index));
    HAS_MARKUP.with(|arr| arr.clear(index));
    TEXT_ATTR.with(|arr| arr.clear(index));
    LEFT_PADDING.with(|arr| arr.clear(index));
    RIGHT_PADDING.with(|arr| arr.clear(index));
}

/// Reset all arrays.
pub fn reset() {
    TEXT_CONTENT.with(|arr| arr.clear_all());
    HAS_MARKUP.with(|arr| arr.clear_all());
    TEXT_ATTR.with(|arr| arr.clear_all());
    LEFT_PADDING.with(|arr| arr.clear_all());
    RIGHT_PADDING.with(|arr| arr.clear_all());
}

// =============================================================================
// Text Content
// =============================================================================

/// Get text content at index.
pub fn get_text_content(index: usize) -> String {
    TEXT_CONTENT.with(|arr| arr.get(index))
}

/// Set text content at index.
pub fn set_text_content(index: usize, content: String, has_markup: bool) {
    TEXT_CONTENT.with(|arr| arr.set(index, content));
    HAS_MARKUP.with(|arr| arr.set(index, has_markup));
}

pub fn get_has_markup(index: usize) -> bool {
    HAS_MARKUP.with(|arr| arr.get(index))
}

// =============================================================================
// Attributes and Padding
// =============================================================================

pub fn get_text_attr(index: usize) -> AttrSet {
    TEXT_ATTR.with(|arr| arr.get(index))
}

pub fn set_text_attr(index: usize, attr: AttrSet) {
    TEXT_ATTR.with(|arr| arr.set(index, attr));
}

/// Get (left, right) padding at index.
pub fn get_padding(index: usize) -> (String, String) {
    (
        LEFT_PADDING.with(|arr| arr.get(index)),
        RIGHT_PADDING.with(|arr| arr.get(index)),
    )
}

pub fn set_padding(index: usize, left: &str, right: &str) {
    LEFT_PADDING.with(|arr| arr.set(index, left.to_string()));
    RIGHT_PADDING.with(|arr| arr.set(index, right.to_string()));
}
