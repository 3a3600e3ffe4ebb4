//! Terminal input - crossterm events in, keyboard and mouse dispatch out.
//!
//! Keys are named the way binding tables name them (`"ArrowUp"`, `"Enter"`,
//! `"a"`, `"F5"`). A key with no such name is ignored rather than dispatched
//! with an empty name.
//!
//! ```ignore
//! while let Some(event) = input::poll_event(Duration::from_millis(16))? {
//!     input::route_event(event);
//! }
//! ```

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    self as term, DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
};
use crossterm::execute;

use super::events::Propagation;
use super::keyboard::{self, KeyState, KeyboardEvent, Modifiers};
use super::mouse::{self, MouseAction, MouseButton, MouseEvent};
use crate::error::Result;

/// A terminal event the widgets understand.
#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(KeyboardEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// Focus changes, pastes and unnamed keys.
    Ignored,
}

impl From<term::Event> for InputEvent {
    fn from(event: term::Event) -> Self {
        match event {
            term::Event::Key(key) => convert_key_event(key).map_or(InputEvent::Ignored, InputEvent::Key),
            term::Event::Mouse(event) => InputEvent::Mouse(convert_mouse_event(event)),
            term::Event::Resize(width, height) => InputEvent::Resize(width, height),
            _ => InputEvent::Ignored,
        }
    }
}

// =============================================================================
// Conversion
// =============================================================================

fn modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META),
    }
}

fn named_key(code: KeyCode) -> Option<&'static str> {
    let name = match code {
        KeyCode::Enter => "Enter",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        KeyCode::Esc => "Escape",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        _ => return None,
    };
    Some(name)
}

/// `None` for keys binding tables cannot name (media keys, lone modifiers).
pub fn convert_key_event(event: term::KeyEvent) -> Option<KeyboardEvent> {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        code => named_key(code)?.to_string(),
    };

    let mut mods = modifiers(event.modifiers);
    // Some terminals report BackTab without SHIFT.
    if event.code == KeyCode::BackTab {
        mods.shift = true;
    }

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    Some(KeyboardEvent { key, modifiers: mods, state, raw: None })
}

fn mouse_button(button: term::MouseButton) -> MouseButton {
    match button {
        term::MouseButton::Left => MouseButton::Left,
        term::MouseButton::Right => MouseButton::Right,
        term::MouseButton::Middle => MouseButton::Middle,
    }
}

/// The hit element is left unset; `mouse::dispatch` fills it in.
pub fn convert_mouse_event(event: term::MouseEvent) -> MouseEvent {
    let (action, button) = match event.kind {
        MouseEventKind::Down(b) => (MouseAction::Down, mouse_button(b)),
        MouseEventKind::Up(b) => (MouseAction::Up, mouse_button(b)),
        MouseEventKind::Drag(b) => (MouseAction::Drag, mouse_button(b)),
        MouseEventKind::Moved => (MouseAction::Move, MouseButton::None),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => (MouseAction::Scroll, MouseButton::None),
    };

    MouseEvent {
        action,
        button,
        x: event.column,
        y: event.row,
        modifiers: modifiers(event.modifiers),
        element_index: None,
    }
}

// =============================================================================
// Terminal
// =============================================================================

/// Wait up to `timeout` for one event.
pub fn poll_event(timeout: Duration) -> Result<Option<InputEvent>> {
    if !term::poll(timeout)? {
        return Ok(None);
    }
    read_event().map(Some)
}

/// Block until the next event.
pub fn read_event() -> Result<InputEvent> {
    Ok(term::read()?.into())
}

pub fn set_mouse_capture(enabled: bool) -> Result<()> {
    if enabled {
        execute!(stdout(), EnableMouseCapture)?;
    } else {
        execute!(stdout(), DisableMouseCapture)?;
    }
    Ok(())
}

/// Hand an event to the keyboard or mouse dispatcher.
pub fn route_event(event: InputEvent) -> Propagation {
    match event {
        InputEvent::Key(key) => keyboard::dispatch(key),
        InputEvent::Mouse(event) => mouse::dispatch(event),
        InputEvent::Resize(width, height) => {
            tracing::debug!(target: "spark_widgets::input", width, height, "resize");
            mouse::resize_hit_grid(width, height);
            Propagation::Declined
        }
        InputEvent::Ignored => Propagation::Declined,
    }
}
