//! Keyboard Module - Key events, binding tables and dispatch
//!
//! Key presses are routed to the focused element first and bubble through its
//! ancestors (see [`super::events`]). Only when no element stops the event do
//! the global handlers registered here get a look.
//!
//! # API
//!
//! - `dispatch(event)` - Route a key through focus, bubbling, then globals
//! - `on(handler)` - Subscribe to all keyboard events that bubbled out
//! - `on_key(key, fn)` - Subscribe to a specific key name
//! - `KeyBindings` - Immutable key-name → intent tables
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::state::keyboard::{self, KeyBindings, KeyboardEvent};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Debug)]
//! enum Intent { Up, Down }
//!
//! let bindings = KeyBindings::from_pairs([("UP", Intent::Up), ("DOWN", Intent::Down)])?;
//! assert_eq!(bindings.lookup(&KeyboardEvent::new("ArrowUp")), Some(Intent::Up));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use super::events::{self, ElementEvent, Propagation};
use super::focus;
use crate::error::{Error, Result};

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with alt
    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "ArrowUp")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
    /// Raw escape sequence (if available)
    pub raw: Option<String>,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
            raw: None,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
            raw: None,
        }
    }

    /// Check if this is a press event
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }

    /// Printable character carried by this event, if it types one.
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.ctrl || self.modifiers.alt || self.modifiers.meta {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }

    /// Canonical name used by binding tables: `"Enter"`, `"Ctrl+ArrowLeft"`,
    /// `"Shift+Tab"`. Shift is implied by the character for printable keys.
    pub fn binding_name(&self) -> String {
        let single_char = self.key.chars().count() == 1;
        let mut name = String::new();
        if self.modifiers.ctrl {
            name.push_str("Ctrl+");
        }
        if self.modifiers.alt {
            name.push_str("Alt+");
        }
        if self.modifiers.shift && !single_char {
            name.push_str("Shift+");
        }
        if self.modifiers.meta {
            name.push_str("Meta+");
        }
        if single_char && (self.modifiers.ctrl || self.modifiers.alt) {
            name.push_str(&self.key.to_lowercase());
        } else {
            name.push_str(&self.key);
        }
        name
    }
}

/// Handler for keyboard events. Return true to consume the event.
pub type KeyHandler = Box<dyn Fn(&KeyboardEvent) -> bool>;

/// Handler for specific key. Return true to consume the event.
pub type KeySpecificHandler = Box<dyn Fn() -> bool>;

// =============================================================================
// KEY NAMES
// =============================================================================

/// Canonical spelling of a named (non-character) key.
fn canonical_key(token: &str) -> Option<&'static str> {
    let key = match token.to_ascii_uppercase().as_str() {
        "ENTER" | "RETURN" | "KP_ENTER" => "Enter",
        "TAB" => "Tab",
        "BACKSPACE" => "Backspace",
        "DELETE" | "DEL" => "Delete",
        "ESCAPE" | "ESC" => "Escape",
        "UP" | "ARROWUP" => "ArrowUp",
        "DOWN" | "ARROWDOWN" => "ArrowDown",
        "LEFT" | "ARROWLEFT" => "ArrowLeft",
        "RIGHT" | "ARROWRIGHT" => "ArrowRight",
        "HOME" => "Home",
        "END" => "End",
        "PAGE_UP" | "PAGEUP" => "PageUp",
        "PAGE_DOWN" | "PAGEDOWN" => "PageDown",
        "INSERT" => "Insert",
        "SPACE" => " ",
        "F1" => "F1",
        "F2" => "F2",
        "F3" => "F3",
        "F4" => "F4",
        "F5" => "F5",
        "F6" => "F6",
        "F7" => "F7",
        "F8" => "F8",
        "F9" => "F9",
        "F10" => "F10",
        "F11" => "F11",
        "F12" => "F12",
        _ => return None,
    };
    Some(key)
}

/// Normalize a key name to the form produced by [`KeyboardEvent::binding_name`].
///
/// Accepts canonical names (`"Ctrl+ArrowLeft"`), `+`-joined lowercase forms
/// (`"ctrl+left"`) and underscore style (`"CTRL_LEFT"`, `"KP_ENTER"`).
pub fn parse_key_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_option("key_bindings", "empty key name"));
    }

    let tokens: Vec<&str> = if trimmed.contains('+') && trimmed.len() > 1 {
        trimmed.split('+').collect()
    } else {
        trimmed.split('_').collect()
    };

    let mut modifiers = Modifiers::default();
    let mut rest = tokens.as_slice();
    while let [first, tail @ ..] = rest {
        if tail.is_empty() {
            break;
        }
        match first.to_ascii_uppercase().as_str() {
            "CTRL" | "CONTROL" => modifiers.ctrl = true,
            "ALT" => modifiers.alt = true,
            "SHIFT" => modifiers.shift = true,
            "META" => modifiers.meta = true,
            _ => break,
        }
        rest = tail;
    }

    let key_token = rest.join("_");
    let key = match canonical_key(&key_token) {
        Some(key) => key.to_string(),
        None if key_token.chars().count() == 1 => key_token,
        None => {
            return Err(Error::invalid_option(
                "key_bindings",
                format!("unknown key name '{name}'"),
            ));
        }
    };

    Ok(KeyboardEvent::with_modifiers(key, modifiers).binding_name())
}

// =============================================================================
// KEY BINDINGS
// =============================================================================

/// Immutable table from key names to intents.
///
/// Resolved once when a widget is built. Derived tables (for instance the
/// multi-line editor table) are produced with [`KeyBindings::with`], which
/// returns a new table and leaves the original untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings<A: Copy> {
    map: HashMap<String, A>,
}

impl<A: Copy> Default for KeyBindings<A> {
    fn default() -> Self {
        Self { map: HashMap::new() }
    }
}

impl<A: Copy> KeyBindings<A> {
    /// Build from canonical names. Names are trusted as written.
    pub fn from_canonical<'a>(pairs: impl IntoIterator<Item = (&'a str, A)>) -> Self {
        Self {
            map: pairs
                .into_iter()
                .map(|(name, intent)| (name.to_string(), intent))
                .collect(),
        }
    }

    /// Build from user-facing names, normalizing each with [`parse_key_name`].
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, A)>) -> Result<Self> {
        let mut map = HashMap::new();
        for (name, intent) in pairs {
            map.insert(parse_key_name(name)?, intent);
        }
        Ok(Self { map })
    }

    /// See [`parse_key_name`].
    pub fn parse_name(name: &str) -> Result<String> {
        parse_key_name(name)
    }

    /// Intent bound to this event, if any.
    pub fn lookup(&self, event: &KeyboardEvent) -> Option<A> {
        self.map.get(&event.binding_name()).copied()
    }

    /// Intent bound to a canonical name.
    pub fn get(&self, name: &str) -> Option<A> {
        self.map.get(name).copied()
    }

    /// New table with one more (or a replaced) binding.
    pub fn with(&self, name: &str, intent: A) -> Self {
        let mut map = self.map.clone();
        map.insert(name.to_string(), intent);
        Self { map }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

struct HandlerRegistry {
    global_handlers: Vec<(usize, KeyHandler)>,
    key_handlers: HashMap<String, Vec<(usize, KeySpecificHandler)>>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            global_handlers: Vec::new(),
            key_handlers: HashMap::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

// =============================================================================
// EVENT DISPATCH
// =============================================================================

/// Route a keyboard event through the document.
///
/// 1. The focused element's key listeners, bubbling to its ancestors.
/// 2. Key-specific global handlers.
/// 3. Global handlers.
///
/// Only press events are routed; repeats and releases are declined.
pub fn dispatch(event: KeyboardEvent) -> Propagation {
    if event.state != KeyState::Press {
        return Propagation::Declined;
    }

    if let Some(focused) = focus::get_focused() {
        let result = events::bubble(focused, &ElementEvent::Key(event.clone()));
        if result.stops() {
            return result;
        }
    }

    if dispatch_to_handlers(&event) {
        Propagation::Handled
    } else {
        Propagation::Declined
    }
}

/// Dispatch to key-specific and global handlers only.
/// Returns true if any handler consumed the event.
pub fn dispatch_to_handlers(event: &KeyboardEvent) -> bool {
    REGISTRY.with(|reg| {
        let reg = reg.borrow();

        if let Some(handlers) = reg.key_handlers.get(&event.binding_name()) {
            for (_, handler) in handlers {
                if handler() {
                    return true;
                }
            }
        }

        for (_, handler) in &reg.global_handlers {
            if handler(event) {
                return true;
            }
        }

        false
    })
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to keyboard events no element consumed.
/// Return true from handler to consume the event.
/// Returns cleanup function.
pub fn on<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.global_handlers.push((id, Box::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.global_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to a specific key, by canonical binding name.
/// Return true to consume the event.
/// Returns cleanup function.
pub fn on_key<F>(key: &str, handler: F) -> impl FnOnce()
where
    F: Fn() -> bool + 'static,
{
    let key = key.to_string();
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.key_handlers
            .entry(key.clone())
            .or_default()
            .push((id, Box::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(handlers) = reg.key_handlers.get_mut(&key) {
                handlers.retain(|(handler_id, _)| *handler_id != id);
                if handlers.is_empty() {
                    reg.key_handlers.remove(&key);
                }
            }
        });
    }
}

/// Clear all state and handlers.
pub fn cleanup() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.global_handlers.clear();
        reg.key_handlers.clear();
    });
}

/// Reset keyboard state (for testing)
pub fn reset_keyboard_state() {
    cleanup();
    REGISTRY.with(|reg| {
        reg.borrow_mut().next_id = 0;
    });
}

// =============================================================================
// TESTS
// =============================================================================
