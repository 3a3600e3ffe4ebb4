//! Element handle and the `Element` trait.
//!
//! A [`Node`] is a `Copy` handle to an allocated index. It carries the base
//! element behaviour every widget needs: tree membership, geometry, focus,
//! listeners and redraw. Widgets hold a `Node` and implement [`Element`];
//! nothing inherits from anything.

use crate::engine::arrays::{core, interaction, text};
use crate::engine::{self, allocate_index, is_allocated, on_destroy, release_index};
use crate::error::Result;
use crate::pipeline::draw;
use crate::state::events::{self, ElementEvent, EventType, ListenerId, Propagation};
use crate::state::focus::{self, FocusReason};
use crate::state::{keyboard, mouse};
use crate::types::{ElementKind, Rect};

// =============================================================================
// Node
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Node {
    index: usize,
}

impl Node {
    /// Allocate a new element under `parent`.
    ///
    /// Releasing it later drops its listeners, hit cells and draw counter,
    /// and hands focus back to the parent if it was inside.
    pub fn create(parent: Option<Node>, kind: ElementKind, id: Option<&str>) -> Node {
        let index = allocate_index(id, parent.map(|p| p.index));
        core::set_kind(index, kind);
        on_destroy(index, move || {
            focus::forget(index);
            events::cleanup_index(index);
            mouse::cleanup_index(index);
            draw::forget(index);
        });
        Node { index }
    }

    /// Handle for an existing index.
    pub fn from_index(index: usize) -> Node {
        Node { index }
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn id(self) -> Option<String> {
        engine::get_id(self.index)
    }

    pub fn is_alive(self) -> bool {
        is_allocated(self.index)
    }

    pub fn kind(self) -> ElementKind {
        core::get_kind(self.index)
    }

    // -------------------------------------------------------------------------
    // Tree
    // -------------------------------------------------------------------------

    pub fn parent(self) -> Option<Node> {
        engine::get_parent(self.index).map(Node::from_index)
    }

    /// Live children, in order.
    pub fn children(self) -> Vec<Node> {
        engine::get_children(self.index).into_iter().map(Node::from_index).collect()
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    pub fn rect(self) -> Rect {
        core::get_rect(self.index)
    }

    pub fn set_rect(self, rect: Rect) {
        core::set_rect(self.index, rect);
    }

    // -------------------------------------------------------------------------
    // Text
    // -------------------------------------------------------------------------

    pub fn text_content(self) -> String {
        text::get_text_content(self.index)
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    pub fn set_focusable(self, focusable: bool) {
        interaction::set_focusable(self.index, focusable);
    }

    pub fn is_focusable(self) -> bool {
        interaction::get_focusable(self.index)
    }

    pub fn set_disabled(self, disabled: bool) {
        interaction::set_disabled(self.index, disabled);
    }

    pub fn is_disabled(self) -> bool {
        interaction::get_disabled(self.index)
    }

    pub fn set_no_child_focus(self, value: bool) {
        interaction::set_no_child_focus(self.index, value);
    }

    /// Child on the path to focus (or the one that last was).
    pub fn focus_child(self) -> Option<Node> {
        interaction::get_focus_child(self.index).map(Node::from_index)
    }

    pub fn set_focus_child(self, child: Option<Node>) {
        interaction::set_focus_child(self.index, child.map(|c| c.index));
    }

    pub fn has_focus(self) -> bool {
        focus::is_focused(self.index)
    }

    /// This element or a descendant holds focus.
    pub fn contains_focus(self) -> bool {
        focus::contains_focus(self.index)
    }

    /// Focus honouring no-child-focus ancestors.
    pub fn give_focus(self, reason: FocusReason) -> Result<bool> {
        focus::give_focus_to(self.index, reason)
    }

    /// Focus this exact element.
    pub fn transfer_focus(self, reason: FocusReason) -> bool {
        focus::transfer_focus(self.index, reason)
    }

    pub fn focus_next_child(self, wrap: bool) -> Option<Node> {
        focus::focus_next_child(self.index, wrap).map(Node::from_index)
    }

    pub fn focus_previous_child(self, wrap: bool) -> Option<Node> {
        focus::focus_previous_child(self.index, wrap).map(Node::from_index)
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    pub fn on<F>(self, event_type: EventType, handler: F) -> ListenerId
    where
        F: Fn(&ElementEvent) -> Propagation + 'static,
    {
        events::on(self.index, event_type, handler)
    }

    pub fn off(self, id: ListenerId) -> bool {
        events::off(id)
    }

    pub fn emit(self, event: &ElementEvent) -> Propagation {
        events::emit(self.index, event)
    }

    pub fn bubble(self, event: &ElementEvent) -> Propagation {
        events::bubble(self.index, event)
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    pub fn draw(self) {
        draw::draw(self.index);
    }

    pub fn draw_count(self) -> u64 {
        draw::draw_count(self.index)
    }

    /// Release this element and its whole subtree.
    pub fn destroy(self) {
        release_index(self.index);
    }
}

// =============================================================================
// Element trait
// =============================================================================

/// Implemented by every widget. Everything but `node` has a default that
/// forwards to the handle.
pub trait Element {
    fn node(&self) -> Node;

    fn index(&self) -> usize {
        self.node().index()
    }

    fn has_focus(&self) -> bool {
        self.node().has_focus()
    }

    fn give_focus(&self, reason: FocusReason) -> Result<bool> {
        self.node().give_focus(reason)
    }

    fn on<F>(&self, event_type: EventType, handler: F) -> ListenerId
    where
        Self: Sized,
        F: Fn(&ElementEvent) -> Propagation + 'static,
    {
        self.node().on(event_type, handler)
    }

    fn off(&self, id: ListenerId) -> bool {
        self.node().off(id)
    }

    fn emit(&self, event: &ElementEvent) -> Propagation {
        self.node().emit(event)
    }

    fn draw(&self) {
        self.node().draw();
    }

    /// Unsubscribe, then release.
    fn destroy(&self) {
        self.node().destroy();
    }
}

impl Element for Node {
    fn node(&self) -> Node {
        *self
    }
}

// =============================================================================
// Document
// =============================================================================

/// Root element. Sized to the terminal (or anything else).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Document {
    node: Node,
}

impl Document {
    pub fn new(width: u16, height: u16) -> Self {
        let node = Node::create(None, ElementKind::Document, None);
        node.set_rect(Rect::new(0, 0, width, height));
        mouse::resize_hit_grid(width, height);
        tracing::debug!(target: "spark_widgets::document", index = node.index(), width, height, "document created");
        Self { node }
    }

    /// Focus an element, honouring no-child-focus containers.
    pub fn give_focus_to(&self, element: &impl Element, reason: FocusReason) -> Result<bool> {
        element.give_focus(reason)
    }

    pub fn focused(&self) -> Option<Node> {
        focus::get_focused().map(Node::from_index)
    }
}

impl Element for Document {
    fn node(&self) -> Node {
        self.node
    }
}

/// Reset every thread-local registry (for testing).
pub fn reset_document() {
    engine::reset_registry();
    events::reset_event_state();
    focus::reset_focus_state();
    keyboard::reset_keyboard_state();
    mouse::reset_mouse_state();
    draw::reset_draw_state();
}
