//! Element Events - Per-element listeners with tri-state propagation.
//!
//! Every handler returns a [`Propagation`]:
//! - `Handled` - consumed, stop here
//! - `Declined` - not mine, keep going (next listener, then the parent)
//! - `Interrupted` - stop, and tell the emitter something downstream took it
//!
//! Listeners are stored per element index and called in registration order.
//! They are cloned out of the registry before running, so a handler may
//! subscribe, unsubscribe, move focus or release elements while it runs.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::keyboard::KeyboardEvent;
use super::mouse::MouseEvent;
use super::focus::FocusReason;
use crate::engine;

// =============================================================================
// TYPES
// =============================================================================

/// Result of handling an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Propagation {
    Handled,
    #[default]
    Declined,
    Interrupted,
}

impl Propagation {
    /// True for `Handled` and `Interrupted`.
    pub fn stops(self) -> bool {
        !matches!(self, Propagation::Declined)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    Key,
    Focus,
    Click,
    Submit,
}

/// Any `'static` value carried by a submit.
///
/// Clones share one allocation. Two values are equal when they share it, or
/// when both hold equal `String`s.
#[derive(Clone)]
pub struct SubmitValue(Rc<dyn Any>);

impl SubmitValue {
    pub fn new<T: 'static>(value: T) -> Self {
        Self(Rc::new(value))
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    pub fn cloned<T: Clone + 'static>(&self) -> Option<T> {
        self.get::<T>().cloned()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.0.is::<T>()
    }
}

/// The unit value, used by buttons that carry nothing.
impl Default for SubmitValue {
    fn default() -> Self {
        Self::new(())
    }
}

impl From<String> for SubmitValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SubmitValue {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl fmt::Debug for SubmitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get::<String>() {
            Some(s) => f.debug_tuple("SubmitValue").field(s).finish(),
            None if self.is::<()>() => f.write_str("SubmitValue(())"),
            None => f.write_str("SubmitValue(..)"),
        }
    }
}

impl PartialEq for SubmitValue {
    fn eq(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        matches!((self.get::<String>(), other.get::<String>()), (Some(a), Some(b)) if a == b)
    }
}

impl Eq for SubmitValue {}

/// A value submitted by a button or a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitEvent {
    pub value: SubmitValue,
    /// Element that produced the value.
    pub source: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ElementEvent {
    Key(KeyboardEvent),
    Focus { focused: bool, reason: FocusReason },
    Click(MouseEvent),
    Submit(SubmitEvent),
}

impl ElementEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            ElementEvent::Key(_) => EventType::Key,
            ElementEvent::Focus { .. } => EventType::Focus,
            ElementEvent::Click(_) => EventType::Click,
            ElementEvent::Submit(_) => EventType::Submit,
        }
    }
}

pub type Handler = Rc<dyn Fn(&ElementEvent) -> Propagation>;

/// Identifies a registered listener for [`off`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

// =============================================================================
// REGISTRY
// =============================================================================

struct Listener {
    id: ListenerId,
    event_type: EventType,
    handler: Handler,
}

struct EventRegistry {
    listeners: HashMap<usize, Vec<Listener>>,
    owners: HashMap<ListenerId, usize>,
    next_id: usize,
}

impl EventRegistry {
    fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            owners: HashMap::new(),
            next_id: 0,
        }
    }
}

thread_local! {
    static REGISTRY: RefCell<EventRegistry> = RefCell::new(EventRegistry::new());
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe `handler` to events of `event_type` on the element at `index`.
pub fn on<F>(index: usize, event_type: EventType, handler: F) -> ListenerId
where
    F: Fn(&ElementEvent) -> Propagation + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = ListenerId(reg.next_id);
        reg.next_id += 1;
        reg.listeners.entry(index).or_default().push(Listener {
            id,
            event_type,
            handler: Rc::new(handler),
        });
        reg.owners.insert(id, index);
        id
    });
    tracing::trace!(target: "spark_widgets::events", index, ?event_type, listener = id.0, "listener added");
    id
}

/// Remove a listener. Returns false if it was already gone.
pub fn off(id: ListenerId) -> bool {
    let removed = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let Some(index) = reg.owners.remove(&id) else {
            return false;
        };
        if let Some(list) = reg.listeners.get_mut(&index) {
            list.retain(|l| l.id != id);
            if list.is_empty() {
                reg.listeners.remove(&index);
            }
        }
        true
    });
    if removed {
        tracing::trace!(target: "spark_widgets::events", listener = id.0, "listener removed");
    }
    removed
}

/// Number of listeners attached to an element.
pub fn listener_count(index: usize) -> usize {
    REGISTRY.with(|reg| reg.borrow().listeners.get(&index).map_or(0, Vec::len))
}

/// Call the element's listeners for this event, in registration order.
///
/// Stops at the first listener that returns `Handled` or `Interrupted` and
/// returns that result. A listener removed by an earlier one in the same
/// emit is skipped.
pub fn emit(index: usize, event: &ElementEvent) -> Propagation {
    let event_type = event.event_type();
    let handlers: Vec<(ListenerId, Handler)> = REGISTRY.with(|reg| {
        reg.borrow()
            .listeners
            .get(&index)
            .map(|list| {
                list.iter()
                    .filter(|l| l.event_type == event_type)
                    .map(|l| (l.id, l.handler.clone()))
                    .collect()
            })
            .unwrap_or_default()
    });

    for (id, handler) in handlers {
        let still_registered = REGISTRY.with(|reg| reg.borrow().owners.contains_key(&id));
        if !still_registered {
            continue;
        }
        let result = handler(event);
        if result.stops() {
            return result;
        }
    }
    Propagation::Declined
}

/// Emit on the element, then on each ancestor, until a listener stops it.
pub fn bubble(index: usize, event: &ElementEvent) -> Propagation {
    for target in engine::ancestors(index) {
        if !engine::is_allocated(target) {
            break;
        }
        let result = emit(target, event);
        if result.stops() {
            return result;
        }
    }
    Propagation::Declined
}

/// Drop every listener of an element.
pub fn cleanup_index(index: usize) {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        if let Some(list) = reg.listeners.remove(&index) {
            for listener in list {
                reg.owners.remove(&listener.id);
            }
        }
    });
}

/// Reset all listeners (for testing).
pub fn reset_event_state() {
    REGISTRY.with(|reg| {
        *reg.borrow_mut() = EventRegistry::new();
    });
}

// =============================================================================
// TESTS
// =============================================================================
