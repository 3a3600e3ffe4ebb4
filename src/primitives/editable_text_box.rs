//! EditableTextBox - The editing region inside a text field.
//!
//! A value signal, a cursor (char offset) and an optional whole-value
//! selection. Bound actions and printable characters are handled; anything
//! else is declined so the owner can act on it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::engine::arrays::text;
use crate::layout::strip_markup;
use crate::state::events::{ElementEvent, EventType, ListenerId, Propagation};
use crate::state::keyboard::{KeyBindings, KeyboardEvent};
use crate::types::{AttrSet, ElementKind, Rect};

use super::element::{Element, Node};
use super::types::{default_editor_key_bindings, EditAction};

const MASK: char = '•';

// =============================================================================
// Word helpers
// =============================================================================

/// Find the start of the word before the given position.
/// A word is defined as a sequence of alphanumeric characters.
fn find_word_start(chars: &[char], pos: usize) -> usize {
    let mut i = pos.min(chars.len());

    // Skip whitespace/punctuation going backward
    while i > 0 && !chars[i - 1].is_alphanumeric() {
        i -= 1;
    }

    // Skip word characters going backward
    while i > 0 && chars[i - 1].is_alphanumeric() {
        i -= 1;
    }

    i
}

/// Find the end of the word after the given position.
fn find_word_end(chars: &[char], pos: usize) -> usize {
    let len = chars.len();
    let mut i = pos.min(len);

    while i < len && !chars[i].is_alphanumeric() {
        i += 1;
    }

    while i < len && chars[i].is_alphanumeric() {
        i += 1;
    }

    i
}

/// (line start, line end) around `pos`, ends exclusive of the newline.
fn line_bounds(chars: &[char], pos: usize) -> (usize, usize) {
    let start = chars[..pos].iter().rposition(|&c| c == '\n').map_or(0, |p| p + 1);
    let end = chars[pos..].iter().position(|&c| c == '\n').map_or(chars.len(), |p| pos + p);
    (start, end)
}

// =============================================================================
// Props
// =============================================================================

#[derive(Clone, Debug)]
pub struct EditableTextBoxProps {
    pub id: Option<String>,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Initial content; markup is stripped when `content_has_markup`.
    pub content: Option<String>,
    pub content_has_markup: bool,
    /// Initial value; wins over `content`.
    pub value: Option<String>,
    pub hidden: bool,
    pub text_attr: AttrSet,
    pub empty_attr: AttrSet,
    pub key_bindings: Option<KeyBindings<EditAction>>,
    pub no_draw: bool,
}

impl Default for EditableTextBoxProps {
    fn default() -> Self {
        Self {
            id: None,
            x: 0,
            y: 0,
            width: 20,
            height: 1,
            content: None,
            content_has_markup: false,
            value: None,
            hidden: false,
            text_attr: AttrSet::new(),
            empty_attr: AttrSet::new(),
            key_bindings: None,
            no_draw: false,
        }
    }
}

// =============================================================================
// EditableTextBox
// =============================================================================

struct EditorInner {
    node: Node,
    value: Signal<String>,
    cursor: Cell<usize>,
    selected_all: Cell<bool>,
    hidden: bool,
    text_attr: AttrSet,
    empty_attr: AttrSet,
    key_bindings: KeyBindings<EditAction>,
    listeners: RefCell<Vec<ListenerId>>,
}

#[derive(Clone)]
pub struct EditableTextBox {
    inner: Rc<EditorInner>,
}

impl EditableTextBox {
    pub fn new(parent: Node, props: EditableTextBoxProps) -> Self {
        let node = Node::create(Some(parent), ElementKind::EditableTextBox, props.id.as_deref());
        node.set_rect(Rect::new(props.x, props.y, props.width, props.height));

        let initial = match (props.value, props.content) {
            (Some(value), _) => value,
            (None, Some(content)) if props.content_has_markup => strip_markup(&content),
            (None, Some(content)) => content,
            (None, None) => String::new(),
        };
        let cursor = initial.chars().count();

        let editor = Self {
            inner: Rc::new(EditorInner {
                node,
                value: signal(initial),
                cursor: Cell::new(cursor),
                selected_all: Cell::new(false),
                hidden: props.hidden,
                text_attr: props.text_attr,
                empty_attr: props.empty_attr,
                key_bindings: props.key_bindings.unwrap_or_else(default_editor_key_bindings),
                listeners: RefCell::new(Vec::new()),
            }),
        };

        let weak = Rc::downgrade(&editor.inner);
        let key = node.on(EventType::Key, move |event| {
            match (weak.upgrade(), event) {
                (Some(inner), ElementEvent::Key(key)) => EditableTextBox { inner }.on_key(key),
                _ => Propagation::Declined,
            }
        });
        editor.inner.listeners.borrow_mut().push(key);

        editor.refresh();
        if !props.no_draw {
            node.draw();
        }
        editor
    }

    // -------------------------------------------------------------------------
    // Value
    // -------------------------------------------------------------------------

    pub fn value(&self) -> String {
        self.inner.value.get()
    }

    /// The value signal, for effects that follow edits.
    pub fn value_signal(&self) -> Signal<String> {
        self.inner.value.clone()
    }

    /// Replace the value; the cursor goes to the end.
    pub fn set_value(&self, value: impl Into<String>, dont_draw: bool) {
        let value = value.into();
        self.inner.cursor.set(value.chars().count());
        self.inner.selected_all.set(false);
        self.inner.value.set(value);
        self.refresh();
        if !dont_draw {
            self.inner.node.draw();
        }
    }

    pub fn content(&self) -> String {
        self.value()
    }

    pub fn set_content(&self, content: impl Into<String>, has_markup: bool, dont_draw: bool) {
        let content = content.into();
        let value = if has_markup { strip_markup(&content) } else { content };
        self.set_value(value, dont_draw);
    }

    pub fn cursor(&self) -> usize {
        self.inner.cursor.get()
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.hidden
    }

    /// Select the whole value; the next edit replaces it.
    pub fn select_all(&self) {
        self.inner.selected_all.set(true);
        self.inner.cursor.set(self.value().chars().count());
    }

    pub fn has_selection(&self) -> bool {
        self.inner.selected_all.get()
    }

    /// What the text arrays show: the value, masked when hidden.
    pub fn display_text(&self) -> String {
        let value = self.value();
        if self.inner.hidden {
            value.chars().map(|c| if c == '\n' { c } else { MASK }).collect()
        } else {
            value
        }
    }

    fn refresh(&self) {
        let index = self.inner.node.index();
        let display = self.display_text();
        let attr = if display.is_empty() { self.inner.empty_attr } else { self.inner.text_attr };
        text::set_text_content(index, display, false);
        text::set_text_attr(index, attr);
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    /// Handle a key: bound action, else printable insert, else decline.
    pub fn on_key(&self, event: &KeyboardEvent) -> Propagation {
        if let Some(action) = self.inner.key_bindings.lookup(event) {
            self.apply(action);
        } else if let Some(c) = event.printable() {
            self.insert(c);
        } else {
            return Propagation::Declined;
        }
        self.refresh();
        self.inner.node.draw();
        Propagation::Handled
    }

    fn insert(&self, c: char) {
        let chars = self.take_selection();
        self.insert_chars(chars, c);
    }

    /// Current chars, with the selection removed if there was one.
    fn take_selection(&self) -> Vec<char> {
        if self.inner.selected_all.replace(false) {
            self.inner.cursor.set(0);
            Vec::new()
        } else {
            self.value().chars().collect()
        }
    }

    pub fn apply(&self, action: EditAction) {
        let had_selection = self.inner.selected_all.get();
        let editing = matches!(action, EditAction::BackDelete | EditAction::Delete | EditAction::NewLine);

        if editing && had_selection {
            let chars = self.take_selection();
            if action == EditAction::NewLine {
                self.insert_chars(chars, '\n');
            } else {
                self.inner.value.set(String::new());
            }
            return;
        }
        self.inner.selected_all.set(false);

        let mut chars: Vec<char> = self.value().chars().collect();
        let cursor = self.inner.cursor.get().min(chars.len());

        let new_cursor = match action {
            EditAction::BackDelete => {
                if cursor == 0 {
                    return;
                }
                chars.remove(cursor - 1);
                self.inner.value.set(chars.iter().collect());
                cursor - 1
            }
            EditAction::Delete => {
                if cursor >= chars.len() {
                    return;
                }
                chars.remove(cursor);
                self.inner.value.set(chars.iter().collect());
                cursor
            }
            EditAction::NewLine => {
                self.insert_chars(chars, '\n');
                return;
            }
            EditAction::Backward => cursor.saturating_sub(1),
            EditAction::Forward => (cursor + 1).min(chars.len()),
            EditAction::StartOfWord => find_word_start(&chars, cursor),
            EditAction::EndOfWord => find_word_end(&chars, cursor),
            EditAction::StartOfLine => line_bounds(&chars, cursor).0,
            EditAction::EndOfLine => line_bounds(&chars, cursor).1,
            EditAction::Up | EditAction::Down => {
                let (start, _) = line_bounds(&chars, cursor);
                let column = cursor - start;
                let target = if action == EditAction::Up {
                    if start == 0 {
                        return;
                    }
                    line_bounds(&chars, start - 1)
                } else {
                    let (_, end) = line_bounds(&chars, cursor);
                    if end >= chars.len() {
                        return;
                    }
                    line_bounds(&chars, end + 1)
                };
                (target.0 + column).min(target.1)
            }
        };
        self.inner.cursor.set(new_cursor);
    }

    fn insert_chars(&self, mut chars: Vec<char>, c: char) {
        let cursor = self.inner.cursor.get().min(chars.len());
        chars.insert(cursor, c);
        self.inner.cursor.set(cursor + 1);
        self.inner.value.set(chars.into_iter().collect());
    }
}

impl Element for EditableTextBox {
    fn node(&self) -> Node {
        self.inner.node
    }

    fn destroy(&self) {
        let listeners: Vec<ListenerId> = self.inner.listeners.borrow_mut().drain(..).collect();
        for id in listeners {
            self.inner.node.off(id);
        }
        self.inner.node.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::element::{reset_document, Document};
    use crate::primitives::types::multi_line_key_bindings;
    use crate::state::keyboard::Modifiers;
    use crate::types::Color;

    fn editor(value: &str, props: EditableTextBoxProps) -> EditableTextBox {
        reset_document();
        let doc = Document::new(80, 24);
        EditableTextBox::new(doc.node(), EditableTextBoxProps { value: Some(value.into()), ..props })
    }

    fn key(editor: &EditableTextBox, name: &str) -> Propagation {
        editor.on_key(&KeyboardEvent::new(name))
    }

    #[test]
    fn test_find_word_start() {
        let chars: Vec<char> = "hello world".chars().collect();
        assert_eq!(find_word_start(&chars, 11), 6);
        assert_eq!(find_word_start(&chars, 6), 0);
        assert_eq!(find_word_start(&chars, 5), 0);
        assert_eq!(find_word_start(&chars, 0), 0);
    }

    #[test]
    fn test_find_word_end() {
        let chars: Vec<char> = "hello world".chars().collect();
        assert_eq!(find_word_end(&chars, 0), 5);
        assert_eq!(find_word_end(&chars, 5), 11);
        assert_eq!(find_word_end(&chars, 11), 11);
    }

    #[test]
    fn test_typing_and_back_delete() {
        let e = editor("ab", EditableTextBoxProps::default());

        assert_eq!(key(&e, "c"), Propagation::Handled);
        assert_eq!(e.value(), "abc");
        assert_eq!(key(&e, "Backspace"), Propagation::Handled);
        assert_eq!(e.value(), "ab");
        assert_eq!(e.cursor(), 2);
    }

    #[test]
    fn test_cursor_movement_and_delete() {
        let e = editor("hello world", EditableTextBoxProps::default());

        e.on_key(&KeyboardEvent::with_modifiers("ArrowLeft", Modifiers::ctrl()));
        assert_eq!(e.cursor(), 6);
        key(&e, "Home");
        assert_eq!(e.cursor(), 0);
        key(&e, "Delete");
        assert_eq!(e.value(), "ello world");
        key(&e, "End");
        assert_eq!(e.cursor(), 10);
        key(&e, "ArrowLeft");
        key(&e, "x");
        assert_eq!(e.value(), "ello worlxd");
    }

    #[test]
    fn test_unbound_keys_are_declined() {
        let e = editor("", EditableTextBoxProps::default());

        assert_eq!(key(&e, "Enter"), Propagation::Declined);
        assert_eq!(key(&e, "ArrowUp"), Propagation::Declined);
        assert_eq!(e.on_key(&KeyboardEvent::with_modifiers("s", Modifiers::ctrl())), Propagation::Declined);
        assert_eq!(e.value(), "");
    }

    #[test]
    fn test_multi_line_newline_and_vertical_moves() {
        let e = editor(
            "abc",
            EditableTextBoxProps {
                key_bindings: Some(multi_line_key_bindings(&default_editor_key_bindings())),
                ..Default::default()
            },
        );

        assert_eq!(key(&e, "Enter"), Propagation::Handled);
        key(&e, "d");
        assert_eq!(e.value(), "abc\nd");

        key(&e, "ArrowUp");
        assert_eq!(e.cursor(), 1);
        key(&e, "End");
        assert_eq!(e.cursor(), 3);
        key(&e, "ArrowDown");
        assert_eq!(e.cursor(), 5);
    }

    #[test]
    fn test_select_all_is_replaced_by_typing() {
        let e = editor("old", EditableTextBoxProps::default());

        e.select_all();
        key(&e, "n");
        assert_eq!(e.value(), "n");

        e.select_all();
        key(&e, "Backspace");
        assert_eq!(e.value(), "");
    }

    #[test]
    fn test_hidden_masks_display() {
        let e = editor(
            "pw",
            EditableTextBoxProps {
                hidden: true,
                text_attr: AttrSet::new().bg(Color::Blue),
                empty_attr: AttrSet::new().bg(Color::Red),
                ..Default::default()
            },
        );

        assert_eq!(e.value(), "pw");
        assert_eq!(text::get_text_content(e.index()), "••");
        assert_eq!(text::get_text_attr(e.index()).bg, Some(Color::Blue));

        e.set_value("", true);
        assert_eq!(text::get_text_attr(e.index()).bg, Some(Color::Red));
    }

    #[test]
    fn test_set_content_strips_markup() {
        let e = editor("", EditableTextBoxProps::default());
        e.set_content("^rred", true, true);
        assert_eq!(e.value(), "red");
        assert_eq!(e.content(), "red");
    }
}
