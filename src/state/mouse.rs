//! Mouse Module - Hit testing and click detection
//!
//! HitGrid for coordinate-to-element lookup, filled when elements draw.
//! A press and a release on the same element with the same button is a
//! click; it bubbles from that element as [`ElementEvent::Click`].
//!
//! # API
//!
//! - `dispatch(event)` - Dispatch mouse event
//! - `hit_test(x, y)` - Element under a cell

use std::cell::RefCell;
use spark_signals::{signal, Signal};

use super::events::{self, ElementEvent, Propagation};
use super::keyboard::Modifiers;
use crate::types::Rect;

// =============================================================================
// TYPES
// =============================================================================

/// Mouse action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Move,
    Drag,
    Scroll,
}

/// Mouse button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

/// Mouse event
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    /// Action type (down, up, move, drag, scroll)
    pub action: MouseAction,
    /// Button pressed
    pub button: MouseButton,
    /// X coordinate (0-indexed)
    pub x: u16,
    /// Y coordinate (0-indexed)
    pub y: u16,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Element index at this position (filled by dispatch)
    pub element_index: Option<usize>,
}

impl MouseEvent {
    /// Create a new mouse event
    pub fn new(action: MouseAction, button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            action,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
            element_index: None,
        }
    }

    /// Create a mouse down event
    pub fn down(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Down, button, x, y)
    }

    /// Create a mouse up event
    pub fn up(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Up, button, x, y)
    }

    /// Create a mouse move event
    pub fn move_to(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Move, MouseButton::None, x, y)
    }
}

// =============================================================================
// HIT GRID - O(1) Coordinate to Element Lookup
// =============================================================================

/// A grid for O(1) mouse hit detection.
///
/// Each cell contains the element index that last drew at that position,
/// or `None` if empty.
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<usize>,
}

impl HitGrid {
    /// Create a new hit grid with the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![usize::MAX; size],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize the grid, clearing all contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.resize(width as usize * height as usize, usize::MAX);
        self.clear();
    }

    /// Clear all cells.
    pub fn clear(&mut self) {
        self.cells.fill(usize::MAX);
    }

    /// Forget every cell owned by an element.
    pub fn clear_index(&mut self, index: usize) {
        for cell in self.cells.iter_mut().filter(|c| **c == index) {
            *cell = usize::MAX;
        }
    }

    /// Fill a rectangle with an element index, clipped to the grid.
    pub fn fill_rect(&mut self, rect: Rect, index: usize) {
        let x_end = rect.x.saturating_add(rect.width).min(self.width);
        let y_end = rect.y.saturating_add(rect.height).min(self.height);
        for cy in rect.y..y_end {
            for cx in rect.x..x_end {
                let idx = cy as usize * self.width as usize + cx as usize;
                self.cells[idx] = index;
            }
        }
    }

    /// Get the element index at a position.
    pub fn get(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.cells.get(idx).copied().filter(|&v| v != usize::MAX)
    }
}

// =============================================================================
// GLOBAL HIT GRID
// =============================================================================

thread_local! {
    static HIT_GRID: RefCell<HitGrid> = RefCell::new(HitGrid::new(80, 24));
}

/// Resize the global hit grid.
pub fn resize_hit_grid(width: u16, height: u16) {
    HIT_GRID.with(|g| g.borrow_mut().resize(width, height));
}

/// Fill a rectangle in the global hit grid.
pub fn fill_hit_rect(rect: Rect, index: usize) {
    HIT_GRID.with(|g| g.borrow_mut().fill_rect(rect, index));
}

/// Get the element at a position from the global hit grid.
pub fn hit_test(x: u16, y: u16) -> Option<usize> {
    HIT_GRID.with(|g| g.borrow().get(x, y))
}

// =============================================================================
// PRESS STATE
// =============================================================================

thread_local! {
    static PRESSED_ELEMENT: Signal<Option<usize>> = signal(None);
    static PRESSED_BUTTON: Signal<MouseButton> = signal(MouseButton::None);
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Dispatch a mouse event.
///
/// Returns `Handled`/`Interrupted` when an element consumed the resulting
/// click.
pub fn dispatch(mut event: MouseEvent) -> Propagation {
    event.element_index = hit_test(event.x, event.y);

    match event.action {
        MouseAction::Down => {
            PRESSED_ELEMENT.with(|s| s.set(event.element_index));
            PRESSED_BUTTON.with(|s| s.set(event.button));
            Propagation::Declined
        }
        MouseAction::Up => dispatch_up(&event),
        _ => Propagation::Declined,
    }
}

fn dispatch_up(event: &MouseEvent) -> Propagation {
    let pressed_idx = PRESSED_ELEMENT.with(|s| s.get());
    let pressed_btn = PRESSED_BUTTON.with(|s| s.get());
    PRESSED_ELEMENT.with(|s| s.set(None));
    PRESSED_BUTTON.with(|s| s.set(MouseButton::None));

    // Click: press and release on the same element with the same button
    if pressed_idx.is_none() || pressed_idx != event.element_index || pressed_btn != event.button {
        return Propagation::Declined;
    }

    match event.element_index {
        Some(index) => events::bubble(index, &ElementEvent::Click(event.clone())),
        None => Propagation::Declined,
    }
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Forget a released element: its hit cells and any pending press.
pub fn cleanup_index(index: usize) {
    HIT_GRID.with(|g| g.borrow_mut().clear_index(index));
    let pressed = PRESSED_ELEMENT.with(|s| s.get());
    if pressed == Some(index) {
        PRESSED_ELEMENT.with(|s| s.set(None));
        PRESSED_BUTTON.with(|s| s.set(MouseButton::None));
    }
}

/// Reset mouse state (for testing)
pub fn reset_mouse_state() {
    PRESSED_ELEMENT.with(|s| s.set(None));
    PRESSED_BUTTON.with(|s| s.set(MouseButton::None));

    HIT_GRID.with(|g| g.borrow_mut().resize(80, 24));
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::engine::{allocate_index, reset_registry};
    use crate::state::events::{reset_event_state, EventType};

    fn setup() {
        reset_registry();
        reset_event_state();
        reset_mouse_state();
    }

    // -------------------------------------------------------------------------
    // HitGrid Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_hit_grid_fill_and_clip() {
        let mut grid = HitGrid::new(10, 5);

        assert_eq!(grid.get(5, 2), None);

        grid.fill_rect(Rect::new(8, 3, 5, 5), 7);
        assert_eq!(grid.get(8, 3), Some(7));
        assert_eq!(grid.get(9, 4), Some(7));
        assert_eq!(grid.get(7, 3), None);
        assert_eq!(grid.get(10, 4), None);
    }

    #[test]
    fn test_hit_grid_clear_index() {
        let mut grid = HitGrid::new(4, 4);
        grid.fill_rect(Rect::new(0, 0, 2, 1), 1);
        grid.fill_rect(Rect::new(0, 1, 2, 1), 2);

        grid.clear_index(1);
        assert_eq!(grid.get(0, 0), None);
        assert_eq!(grid.get(0, 1), Some(2));
    }

    // -------------------------------------------------------------------------
    // Dispatch Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_click_bubbles_to_parent() {
        setup();

        let menu = allocate_index(None, None);
        let button = allocate_index(None, Some(menu));
        fill_hit_rect(Rect::new(0, 0, 10, 1), button);

        let clicked = Rc::new(Cell::new(0));
        let probe = clicked.clone();
        events::on(menu, EventType::Click, move |event| {
            if let ElementEvent::Click(mouse) = event {
                assert_eq!(mouse.element_index, Some(button));
            }
            probe.set(probe.get() + 1);
            Propagation::Handled
        });

        assert_eq!(dispatch(MouseEvent::down(MouseButton::Left, 3, 0)), Propagation::Declined);
        assert_eq!(dispatch(MouseEvent::up(MouseButton::Left, 4, 0)), Propagation::Handled);
        assert_eq!(clicked.get(), 1);
    }

    #[test]
    fn test_release_elsewhere_is_not_a_click() {
        setup();

        let a = allocate_index(None, None);
        let b = allocate_index(None, None);
        fill_hit_rect(Rect::new(0, 0, 5, 1), a);
        fill_hit_rect(Rect::new(0, 1, 5, 1), b);

        let clicked = Rc::new(Cell::new(false));
        for index in [a, b] {
            let probe = clicked.clone();
            events::on(index, EventType::Click, move |_| {
                probe.set(true);
                Propagation::Handled
            });
        }

        dispatch(MouseEvent::down(MouseButton::Left, 0, 0));
        assert_eq!(dispatch(MouseEvent::up(MouseButton::Left, 0, 1)), Propagation::Declined);
        assert!(!clicked.get());
    }

    #[test]
    fn test_declined_click_is_declined() {
        setup();

        let a = allocate_index(None, None);
        fill_hit_rect(Rect::new(0, 0, 5, 1), a);
        events::on(a, EventType::Click, |_| Propagation::Declined);

        dispatch(MouseEvent::down(MouseButton::Left, 1, 0));
        assert_eq!(dispatch(MouseEvent::up(MouseButton::Left, 1, 0)), Propagation::Declined);

        dispatch(MouseEvent::down(MouseButton::Left, 9, 9));
        assert_eq!(dispatch(MouseEvent::up(MouseButton::Left, 9, 9)), Propagation::Declined);
    }

    #[test]
    fn test_cleanup_index_drops_cells_and_press() {
        setup();

        let a = allocate_index(None, None);
        fill_hit_rect(Rect::new(0, 0, 5, 1), a);
        dispatch(MouseEvent::down(MouseButton::Left, 0, 0));

        cleanup_index(a);
        assert_eq!(hit_test(0, 0), None);
        assert_eq!(dispatch(MouseEvent::up(MouseButton::Left, 0, 0)), Propagation::Declined);
    }
}
