//! Element Registry - Index allocation and the document tree.
//!
//! Manages the lifecycle of element indices:
//! - ID ↔ Index bidirectional mapping
//! - Free index pool for O(1) reuse
//! - Parent link and ordered child list per index
//! - Destroy callbacks, run before any child is released

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use super::arrays;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map element ID to array index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map array index to element ID.
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Set of currently allocated indices.
    static ALLOCATED_INDICES: RefCell<BTreeSet<usize>> = RefCell::new(BTreeSet::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next index to allocate if pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Counter for generating unique IDs.
    static ID_COUNTER: RefCell<usize> = const { RefCell::new(0) };

    /// Parent of each attached index.
    static PARENTS: RefCell<HashMap<usize, usize>> = RefCell::new(HashMap::new());

    /// Ordered children of each index.
    static CHILDREN: RefCell<HashMap<usize, Vec<usize>>> = RefCell::new(HashMap::new());

    /// Destroy callbacks registered per index.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<Box<dyn FnOnce()>>>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Index Allocation
// =============================================================================

/// Allocate an index for a new element.
///
/// # Arguments
/// * `id` - Optional element ID. If not provided, one is generated.
/// * `parent` - Parent index; the new element is appended to its children.
///
/// # Returns
/// The allocated index. An ID that is already registered returns its index.
pub fn allocate_index(id: Option<&str>, parent: Option<usize>) -> usize {
    let element_id = match id {
        Some(id) => id.to_string(),
        None => ID_COUNTER.with(|counter| {
            let mut counter = counter.borrow_mut();
            let id = format!("e{}", *counter);
            *counter += 1;
            id
        }),
    };

    let existing = ID_TO_INDEX.with(|map| map.borrow().get(&element_id).copied());
    if let Some(index) = existing {
        return index;
    }

    let index = FREE_INDICES.with(|free| {
        let mut free = free.borrow_mut();
        if let Some(index) = free.pop() {
            index
        } else {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        }
    });

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().insert(element_id.clone(), index);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().insert(index, element_id);
    });
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().insert(index);
    });

    if let Some(parent) = parent.filter(|p| is_allocated(*p)) {
        PARENTS.with(|map| map.borrow_mut().insert(index, parent));
        CHILDREN.with(|map| map.borrow_mut().entry(parent).or_default().push(index));
    }

    arrays::ensure_all_capacity(index);

    tracing::trace!(target: "spark_widgets::registry", index, ?parent, "allocated element");
    index
}

/// Release an index back to the pool.
///
/// Destroy callbacks run first, while the element and its children are still
/// intact; then children are released recursively.
pub fn release_index(index: usize) {
    if !is_allocated(index) {
        return;
    }

    run_destroy_callbacks(index);

    // A destroy callback may already have torn the element down.
    if !is_allocated(index) {
        return;
    }

    for child in get_children(index) {
        release_index(child);
    }

    if let Some(parent) = PARENTS.with(|map| map.borrow_mut().remove(&index)) {
        CHILDREN.with(|map| {
            if let Some(siblings) = map.borrow_mut().get_mut(&parent) {
                siblings.retain(|&i| i != index);
            }
        });
    }
    CHILDREN.with(|map| map.borrow_mut().remove(&index));

    let id = INDEX_TO_ID.with(|map| map.borrow_mut().remove(&index));
    if let Some(id) = id {
        ID_TO_INDEX.with(|map| {
            map.borrow_mut().remove(&id);
        });
    }
    ALLOCATED_INDICES.with(|set| {
        set.borrow_mut().remove(&index);
    });

    arrays::clear_all_at_index(index);

    FREE_INDICES.with(|free| {
        free.borrow_mut().push(index);
    });

    tracing::trace!(target: "spark_widgets::registry", index, "released element");

    // When every element is gone, drop the arrays and restart numbering.
    let is_empty = ALLOCATED_INDICES.with(|set| set.borrow().is_empty());
    if is_empty {
        arrays::reset_all_arrays();
        FREE_INDICES.with(|free| free.borrow_mut().clear());
        NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    }
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the element at `index` is released.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) {
    DESTROY_CALLBACKS.with(|callbacks| {
        callbacks
            .borrow_mut()
            .entry(index)
            .or_default()
            .push(Box::new(callback));
    });
}

/// Run and clear destroy callbacks for an index.
fn run_destroy_callbacks(index: usize) {
    let callbacks = DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().remove(&index));
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }
}

// =============================================================================
// Tree Queries
// =============================================================================

/// Parent of an element, `None` at the root.
pub fn get_parent(index: usize) -> Option<usize> {
    PARENTS.with(|map| map.borrow().get(&index).copied())
}

/// Ordered children of an element.
pub fn get_children(index: usize) -> Vec<usize> {
    CHILDREN.with(|map| map.borrow().get(&index).cloned().unwrap_or_default())
}

/// Position of `child` among its parent's children.
pub fn child_position(parent: usize, child: usize) -> Option<usize> {
    CHILDREN.with(|map| {
        map.borrow()
            .get(&parent)
            .and_then(|children| children.iter().position(|&c| c == child))
    })
}

/// The element followed by its ancestors, root last.
pub fn ancestors(index: usize) -> Vec<usize> {
    let mut chain = vec![index];
    let mut current = index;
    while let Some(parent) = get_parent(current) {
        chain.push(parent);
        current = parent;
    }
    chain
}

/// Every element below `root` in depth-first tree order (root excluded).
pub fn descendants(root: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut stack: Vec<usize> = get_children(root).into_iter().rev().collect();
    while let Some(index) = stack.pop() {
        out.push(index);
        stack.extend(get_children(index).into_iter().rev());
    }
    out
}

/// Allocated elements that have no parent.
pub fn get_roots() -> Vec<usize> {
    get_allocated_indices()
        .into_iter()
        .filter(|&i| get_parent(i).is_none())
        .collect()
}

// =============================================================================
// Lookups
// =============================================================================

/// Get index for an element ID.
pub fn get_index(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Get ID for an index.
pub fn get_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// Get all currently allocated indices, ascending.
pub fn get_allocated_indices() -> Vec<usize> {
    ALLOCATED_INDICES.with(|set| set.borrow().iter().copied().collect())
}

/// Check if an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED_INDICES.with(|set| set.borrow().contains(&index))
}

/// Get the count of currently allocated elements.
pub fn get_allocated_count() -> usize {
    ALLOCATED_INDICES.with(|set| set.borrow().len())
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Reset all registry state (for testing).
pub fn reset_registry() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    ALLOCATED_INDICES.with(|set| set.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    ID_COUNTER.with(|counter| *counter.borrow_mut() = 0);
    PARENTS.with(|map| map.borrow_mut().clear());
    CHILDREN.with(|map| map.borrow_mut().clear());
    DESTROY_CALLBACKS.with(|callbacks| callbacks.borrow_mut().clear());
    arrays::reset_all_arrays();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_index() {
        reset_registry();

        let idx1 = allocate_index(None, None);
        let idx2 = allocate_index(None, Some(idx1));
        let idx3 = allocate_index(Some("menu"), Some(idx1));

        assert_eq!(idx1, 0);
        assert_eq!(idx2, 1);
        assert_eq!(idx3, 2);
        assert_eq!(get_allocated_count(), 3);
        assert_eq!(get_children(idx1), vec![1, 2]);
        assert_eq!(get_parent(idx3), Some(idx1));
        assert_eq!(get_roots(), vec![idx1]);
    }

    #[test]
    fn test_release_and_reuse() {
        reset_registry();

        let root = allocate_index(None, None);
        let a = allocate_index(None, Some(root));
        let b = allocate_index(None, Some(root));

        release_index(a);
        assert!(!is_allocated(a));
        assert!(is_allocated(b));
        assert_eq!(get_children(root), vec![b]);

        // Should reuse the freed index
        let c = allocate_index(None, Some(root));
        assert_eq!(c, a);
        assert_eq!(get_children(root), vec![b, c]);
    }

    #[test]
    fn test_release_is_recursive() {
        reset_registry();

        let root = allocate_index(None, None);
        let menu = allocate_index(None, Some(root));
        let button = allocate_index(None, Some(menu));

        release_index(menu);
        assert!(!is_allocated(menu));
        assert!(!is_allocated(button));
        assert!(get_children(root).is_empty());
    }

    #[test]
    fn test_id_mapping() {
        reset_registry();

        let idx = allocate_index(Some("field"), None);
        assert_eq!(get_index("field"), Some(idx));
        assert_eq!(get_id(idx), Some("field".to_string()));
        assert_eq!(allocate_index(Some("field"), None), idx);
    }

    #[test]
    fn test_tree_walks() {
        reset_registry();

        let root = allocate_index(None, None);
        let a = allocate_index(None, Some(root));
        let a1 = allocate_index(None, Some(a));
        let b = allocate_index(None, Some(root));

        assert_eq!(ancestors(a1), vec![a1, a, root]);
        assert_eq!(descendants(root), vec![a, a1, b]);
        assert_eq!(child_position(root, b), Some(1));
        assert_eq!(child_position(root, a1), None);
    }

    #[test]
    fn test_destroy_callback_runs_before_children_release() {
        use std::cell::Cell;
        use std::rc::Rc;

        reset_registry();

        let parent = allocate_index(None, None);
        let child = allocate_index(None, Some(parent));

        let child_alive_at_destroy = Rc::new(Cell::new(false));
        let probe = child_alive_at_destroy.clone();
        on_destroy(parent, move || {
            probe.set(is_allocated(child));
        });

        release_index(parent);
        assert!(child_alive_at_destroy.get());
        assert!(!is_allocated(child));
    }
}
