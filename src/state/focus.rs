//! Focus System - Focus transfer, child cycling and Tab order
//!
//! Manages focus state and navigation:
//! - `focused_index` signal (currently focused element)
//! - Focus transfer with blur/focus events along the ancestor chains
//! - `focus_child` bookkeeping on every ancestor of the focused element
//! - Child cycling inside a container (menus)
//! - Document-order cycling (Tab/Shift+Tab)
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::state::focus::{self, FocusReason};
//!
//! // Navigate with Tab
//! focus::focus_next();
//! focus::focus_previous();
//!
//! // Focus specific element, honouring no-child-focus containers
//! focus::give_focus_to(index, FocusReason::Direct)?;
//!
//! // Cycle inside a menu
//! let now_focused = focus::focus_next_child(menu_index, true);
//! ```

use spark_signals::{signal, Signal};

use super::events::{self, ElementEvent};
use crate::engine::arrays::interaction;
use crate::engine::{self, get_children, get_parent, is_allocated};
use crate::error::{Error, Result};

// =============================================================================
// TYPES
// =============================================================================

/// Why focus moved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FocusReason {
    /// Explicitly given (by code or a nav button).
    #[default]
    Direct,
    /// Cycling through siblings or the document.
    Cycle,
    /// A container passing focus on to a child.
    Delegate,
    /// Selected by a pointer.
    Select,
}

// =============================================================================
// FOCUSED INDEX SIGNAL
// =============================================================================

thread_local! {
    static FOCUSED_INDEX: Signal<i32> = signal(-1);
}

/// Get the currently focused element index (-1 if none)
pub fn get_focused_index() -> i32 {
    FOCUSED_INDEX.with(|s| s.get())
}

/// Currently focused element.
pub fn get_focused() -> Option<usize> {
    usize::try_from(get_focused_index()).ok()
}

/// Check if any element is focused
pub fn has_focus() -> bool {
    get_focused_index() >= 0
}

/// Check if specific element is focused
pub fn is_focused(index: usize) -> bool {
    get_focused() == Some(index)
}

/// True when the element or one of its descendants holds focus.
pub fn contains_focus(index: usize) -> bool {
    get_focused().is_some_and(|focused| engine::ancestors(focused).contains(&index))
}

fn set_focused(index: Option<usize>) {
    let raw = index.map_or(-1, |i| i as i32);
    FOCUSED_INDEX.with(|s| s.set(raw));
}

// =============================================================================
// FOCUS TRANSFER
// =============================================================================

/// Can this element take focus right now.
pub fn can_focus(index: usize) -> bool {
    is_allocated(index) && interaction::get_focusable(index) && !interaction::get_disabled(index)
}

/// Move focus to `index` immediately.
///
/// Returns false (and changes nothing) when the element is not focusable or
/// is disabled. Otherwise:
/// 1. every new ancestor records which child leads to the focused element
/// 2. `Focus(false)` goes to the old chain minus the new one, deepest first
/// 3. `Focus(true)` goes to the new chain minus the old one, deepest first
///
/// Handlers may move focus again; emission stops for ancestors that are no
/// longer on the focused path.
pub fn transfer_focus(index: usize, reason: FocusReason) -> bool {
    if !can_focus(index) {
        return false;
    }

    let new_chain = engine::ancestors(index);
    for pair in new_chain.windows(2) {
        interaction::set_focus_child(pair[1], Some(pair[0]));
    }

    let old = get_focused();
    if old == Some(index) {
        return true;
    }

    let old_chain: Vec<usize> = old
        .filter(|&o| is_allocated(o))
        .map(engine::ancestors)
        .unwrap_or_default();

    set_focused(Some(index));
    tracing::trace!(target: "spark_widgets::focus", ?old, new = index, ?reason, "focus transferred");

    for &target in old_chain.iter().filter(|i| !new_chain.contains(i)) {
        if !is_allocated(target) {
            continue;
        }
        events::emit(target, &ElementEvent::Focus { focused: false, reason });
    }

    for &target in new_chain.iter().filter(|i| !old_chain.contains(i)) {
        if !contains_focus(target) {
            break;
        }
        events::emit(target, &ElementEvent::Focus { focused: true, reason });
    }

    true
}

/// Give focus to an element, redirecting to the outermost ancestor that keeps
/// focus away from its children.
pub fn give_focus_to(index: usize, reason: FocusReason) -> Result<bool> {
    if !is_allocated(index) {
        return Err(Error::NotAllocated(index));
    }

    let target = engine::ancestors(index)
        .into_iter()
        .skip(1)
        .filter(|&a| interaction::get_no_child_focus(a))
        .last()
        .unwrap_or(index);

    Ok(transfer_focus(target, reason))
}

/// Clear focus (no element focused). Emits blur on the old chain.
pub fn blur() {
    let Some(old) = get_focused() else {
        return;
    };
    set_focused(None);
    if is_allocated(old) {
        for target in engine::ancestors(old) {
            events::emit(target, &ElementEvent::Focus { focused: false, reason: FocusReason::Direct });
        }
    }
}

/// Called when an element is released.
///
/// If it (or a descendant) held focus, focus moves silently to its nearest
/// live ancestor. The parent stops remembering it as its focus child.
pub fn forget(index: usize) {
    let parent = get_parent(index);
    if let Some(parent) = parent {
        if interaction::get_focus_child(parent) == Some(index) {
            interaction::set_focus_child(parent, None);
        }
    }

    if contains_focus(index) {
        let fallback = parent.filter(|&p| is_allocated(p));
        tracing::trace!(target: "spark_widgets::focus", released = index, ?fallback, "focus forgotten");
        set_focused(fallback);
    }
}

// =============================================================================
// CHILD CYCLING
// =============================================================================

/// Direct child of `parent` on the path to focus, else its remembered focus child.
fn current_child(parent: usize) -> Option<usize> {
    if let Some(focused) = get_focused() {
        let chain = engine::ancestors(focused);
        if let Some(pos) = chain.iter().position(|&i| i == parent) {
            if pos > 0 {
                return Some(chain[pos - 1]);
            }
        }
    }
    interaction::get_focus_child(parent).filter(|&c| get_parent(c) == Some(parent))
}

fn cycle_children(parent: usize, order: Vec<usize>, current: Option<usize>) -> Option<usize> {
    for child in order {
        if Some(child) == current {
            break;
        }
        if transfer_focus(child, FocusReason::Cycle) {
            return Some(child);
        }
    }
    current.or_else(|| interaction::get_focus_child(parent))
}

/// Focus the next child of `parent` that accepts focus, starting after the
/// child that holds focus. With `wrap`, continues from the first child.
///
/// Returns the child that holds focus afterwards (unchanged when nothing
/// after it accepts focus).
pub fn focus_next_child(parent: usize, wrap: bool) -> Option<usize> {
    let children = get_children(parent);
    let current = current_child(parent);
    let order: Vec<usize> = match current.and_then(|c| children.iter().position(|&i| i == c)) {
        Some(pos) => {
            let mut order: Vec<usize> = children[pos + 1..].to_vec();
            if wrap {
                order.extend_from_slice(&children[..=pos]);
            }
            order
        }
        None => children,
    };
    cycle_children(parent, order, current)
}

/// Mirror of [`focus_next_child`].
pub fn focus_previous_child(parent: usize, wrap: bool) -> Option<usize> {
    let children = get_children(parent);
    let current = current_child(parent);
    let order: Vec<usize> = match current.and_then(|c| children.iter().position(|&i| i == c)) {
        Some(pos) => {
            let mut order: Vec<usize> = children[..pos].iter().rev().copied().collect();
            if wrap {
                order.extend(children[pos..].iter().rev());
            }
            order
        }
        None => children.into_iter().rev().collect(),
    };
    cycle_children(parent, order, current)
}

// =============================================================================
// DOCUMENT ORDER
// =============================================================================

/// Elements Tab can land on, in tree order.
///
/// A stop is focusable and enabled, is not inside a no-child-focus container,
/// and is either such a container itself or has no focusable descendants.
pub fn get_tab_stops() -> Vec<usize> {
    let mut ordered = Vec::new();
    for root in engine::get_roots() {
        ordered.push(root);
        ordered.extend(engine::descendants(root));
    }

    ordered
        .into_iter()
        .filter(|&i| can_focus(i))
        .filter(|&i| {
            !engine::ancestors(i)
                .into_iter()
                .skip(1)
                .any(interaction::get_no_child_focus)
        })
        .filter(|&i| {
            interaction::get_no_child_focus(i)
                || !engine::descendants(i).into_iter().any(interaction::get_focusable)
        })
        .collect()
}

fn cycle_document(forward: bool) -> bool {
    let stops = get_tab_stops();
    if stops.is_empty() {
        return false;
    }

    let current_pos = get_focused().and_then(|focused| {
        let chain = engine::ancestors(focused);
        stops.iter().position(|s| chain.contains(s))
    });

    let len = stops.len();
    let next = match current_pos {
        None if forward => stops[0],
        None => stops[len - 1],
        Some(pos) if forward => stops[(pos + 1) % len],
        Some(pos) => stops[(pos + len - 1) % len],
    };

    if get_focused() == Some(next) {
        return false;
    }
    transfer_focus(next, FocusReason::Cycle)
}

/// Move focus to next tab stop
pub fn focus_next() -> bool {
    cycle_document(true)
}

/// Move focus to previous tab stop
pub fn focus_previous() -> bool {
    cycle_document(false)
}

// =============================================================================
// RESET (for testing)
// =============================================================================

/// Reset all focus state (for testing)
pub fn reset_focus_state() {
    set_focused(None);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_index, release_index, reset_registry};
    use crate::state::events::{reset_event_state, EventType, Propagation};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() {
        reset_registry();
        reset_event_state();
        reset_focus_state();
    }

    fn focusable(parent: Option<usize>) -> usize {
        let index = allocate_index(None, parent);
        interaction::set_focusable(index, true);
        index
    }

    /// Record (index, focused, reason) for every focus event on `index`.
    fn record(index: usize, log: &Rc<RefCell<Vec<(usize, bool, FocusReason)>>>) {
        let log = log.clone();
        events::on(index, EventType::Focus, move |event| {
            if let ElementEvent::Focus { focused, reason } = event {
                log.borrow_mut().push((index, *focused, *reason));
            }
            Propagation::Declined
        });
    }

    #[test]
    fn test_initial_state() {
        setup();
        assert_eq!(get_focused_index(), -1);
        assert!(!has_focus());
        assert_eq!(get_focused(), None);
    }

    #[test]
    fn test_transfer_refuses_unfocusable_and_disabled() {
        setup();

        let plain = allocate_index(None, None);
        let disabled = focusable(None);
        interaction::set_disabled(disabled, true);

        assert!(!transfer_focus(plain, FocusReason::Direct));
        assert!(!transfer_focus(disabled, FocusReason::Direct));
        assert!(!has_focus());
    }

    #[test]
    fn test_transfer_emits_blur_then_focus_on_chain_difference() {
        setup();

        let root = allocate_index(None, None);
        let menu = focusable(Some(root));
        let a = focusable(Some(menu));
        let b = focusable(Some(menu));

        let log = Rc::new(RefCell::new(Vec::new()));
        for i in [root, menu, a, b] {
            record(i, &log);
        }

        assert!(transfer_focus(a, FocusReason::Direct));
        assert_eq!(
            *log.borrow(),
            vec![
                (a, true, FocusReason::Direct),
                (menu, true, FocusReason::Direct),
                (root, true, FocusReason::Direct),
            ]
        );

        log.borrow_mut().clear();
        assert!(transfer_focus(b, FocusReason::Cycle));
        assert_eq!(
            *log.borrow(),
            vec![(a, false, FocusReason::Cycle), (b, true, FocusReason::Cycle)]
        );
        assert_eq!(interaction::get_focus_child(menu), Some(b));
        assert_eq!(interaction::get_focus_child(root), Some(menu));
    }

    #[test]
    fn test_give_focus_to_redirects_to_no_child_focus_ancestor() {
        setup();

        let field = focusable(None);
        interaction::set_no_child_focus(field, true);
        let inner = focusable(Some(field));

        assert_eq!(give_focus_to(inner, FocusReason::Select).unwrap(), true);
        assert!(is_focused(field));
    }

    #[test]
    fn test_give_focus_to_released_element_errors() {
        setup();

        let a = focusable(None);
        let _keep = focusable(None);
        release_index(a);
        assert!(matches!(
            give_focus_to(a, FocusReason::Direct),
            Err(Error::NotAllocated(i)) if i == a
        ));
    }

    #[test]
    fn test_focus_next_child_without_wrap_stays_on_last() {
        setup();

        let menu = focusable(None);
        let a = focusable(Some(menu));
        let b = focusable(Some(menu));
        let c = focusable(Some(menu));

        transfer_focus(a, FocusReason::Direct);
        assert_eq!(focus_next_child(menu, false), Some(b));
        assert_eq!(focus_next_child(menu, false), Some(c));
        assert_eq!(focus_next_child(menu, false), Some(c));
        assert!(is_focused(c));

        assert_eq!(focus_next_child(menu, true), Some(a));
        assert!(is_focused(a));
    }

    #[test]
    fn test_focus_previous_child_skips_disabled() {
        setup();

        let menu = focusable(None);
        let a = focusable(Some(menu));
        let b = focusable(Some(menu));
        let c = focusable(Some(menu));
        interaction::set_disabled(b, true);

        transfer_focus(c, FocusReason::Direct);
        assert_eq!(focus_previous_child(menu, false), Some(a));
        assert_eq!(focus_previous_child(menu, false), Some(a));
        assert_eq!(focus_previous_child(menu, true), Some(c));
    }

    #[test]
    fn test_focus_next_child_without_current_starts_at_first() {
        setup();

        let menu = focusable(None);
        let a = focusable(Some(menu));
        let _b = focusable(Some(menu));

        transfer_focus(menu, FocusReason::Direct);
        assert_eq!(focus_next_child(menu, true), Some(a));
        assert!(is_focused(a));
    }

    #[test]
    fn test_forget_moves_focus_to_parent_silently() {
        setup();

        let menu = focusable(None);
        let a = focusable(Some(menu));
        transfer_focus(a, FocusReason::Direct);

        let log = Rc::new(RefCell::new(Vec::new()));
        record(menu, &log);

        forget(a);
        assert!(is_focused(menu));
        assert_eq!(interaction::get_focus_child(menu), None);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_handler_moving_focus_stops_outer_emission() {
        setup();

        let root = allocate_index(None, None);
        let menu = focusable(Some(root));
        let item = focusable(Some(menu));
        let other = focusable(Some(root));

        // Menu delegates focus away to a sibling subtree on gain.
        events::on(menu, EventType::Focus, move |event| {
            if let ElementEvent::Focus { focused: true, .. } = event {
                transfer_focus(other, FocusReason::Delegate);
            }
            Propagation::Handled
        });

        let log = Rc::new(RefCell::new(Vec::new()));
        record(item, &log);

        transfer_focus(menu, FocusReason::Direct);
        assert!(is_focused(other));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_tab_stops_and_document_cycling() {
        setup();

        let root = allocate_index(None, None);
        let menu = focusable(Some(root));
        let a = focusable(Some(menu));
        let b = focusable(Some(menu));
        let field = focusable(Some(root));
        interaction::set_no_child_focus(field, true);
        let _editor = focusable(Some(field));

        assert_eq!(get_tab_stops(), vec![a, b, field]);

        assert!(focus_next());
        assert!(is_focused(a));
        assert!(focus_next());
        assert!(is_focused(b));
        assert!(focus_next());
        assert!(is_focused(field));
        assert!(focus_next());
        assert!(is_focused(a));

        assert!(focus_previous());
        assert!(is_focused(field));
    }

    #[test]
    fn test_blur() {
        setup();

        let a = focusable(None);
        transfer_focus(a, FocusReason::Direct);
        blur();
        assert!(!has_focus());
    }
}
