//! Primitive types - Props, styles and intents.
//!
//! Props are plain structs with `Default` impls; override what you need
//! with struct-update syntax:
//!
//! ```ignore
//! let props = MenuProps {
//!     items: vec![Item::new("Todo", "todo")],
//!     left_padding: " ".into(),
//!     ..Default::default()
//! };
//! ```

use crate::state::keyboard::KeyBindings;
use crate::types::{AttrSet, Color};

// =============================================================================
// Intents
// =============================================================================

/// Menu key intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Previous,
    Next,
}

/// Button key intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    Submit,
}

/// Text field key intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextInputAction {
    Submit,
}

/// Editor key intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditAction {
    BackDelete,
    Delete,
    Backward,
    Forward,
    StartOfWord,
    EndOfWord,
    StartOfLine,
    EndOfLine,
    NewLine,
    Up,
    Down,
}

// =============================================================================
// Default binding tables
// =============================================================================

pub fn default_menu_key_bindings() -> KeyBindings<MenuAction> {
    KeyBindings::from_canonical([
        ("ArrowUp", MenuAction::Previous),
        ("ArrowLeft", MenuAction::Previous),
        ("ArrowDown", MenuAction::Next),
        ("ArrowRight", MenuAction::Next),
    ])
}

pub fn default_button_key_bindings() -> KeyBindings<ButtonAction> {
    KeyBindings::from_canonical([("Enter", ButtonAction::Submit), ("Alt+Enter", ButtonAction::Submit)])
}

pub fn default_text_input_key_bindings() -> KeyBindings<TextInputAction> {
    KeyBindings::from_canonical([
        ("Enter", TextInputAction::Submit),
        ("Alt+Enter", TextInputAction::Submit),
    ])
}

/// Single-line editor table.
pub fn default_editor_key_bindings() -> KeyBindings<EditAction> {
    KeyBindings::from_canonical([
        ("Backspace", EditAction::BackDelete),
        ("Delete", EditAction::Delete),
        ("ArrowLeft", EditAction::Backward),
        ("ArrowRight", EditAction::Forward),
        ("Ctrl+ArrowLeft", EditAction::StartOfWord),
        ("Ctrl+ArrowRight", EditAction::EndOfWord),
        ("Home", EditAction::StartOfLine),
        ("End", EditAction::EndOfLine),
    ])
}

/// Multi-line table derived from `base`: Enter inserts a newline, Up/Down
/// move between lines. `base` is left untouched.
pub fn multi_line_key_bindings(base: &KeyBindings<EditAction>) -> KeyBindings<EditAction> {
    base.with("Enter", EditAction::NewLine)
        .with("ArrowUp", EditAction::Up)
        .with("ArrowDown", EditAction::Down)
}

// =============================================================================
// Items and styles
// =============================================================================

/// Caller-supplied menu entry. Becomes one button.
///
/// `value` is handed back untouched, as a [`SubmitValue`] holding a `V`,
/// when the item is submitted.
///
/// [`SubmitValue`]: crate::state::events::SubmitValue
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item<V = String> {
    pub content: String,
    pub value: V,
}

impl<V> Item<V> {
    pub fn new(content: impl Into<String>, value: V) -> Self {
        Self {
            content: content.into(),
            value,
        }
    }
}

/// Attribute and paddings for one visual state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateStyle {
    pub attr: AttrSet,
    pub left_padding: String,
    pub right_padding: String,
}

impl StateStyle {
    pub fn new(attr: AttrSet, left_padding: impl Into<String>, right_padding: impl Into<String>) -> Self {
        Self {
            attr,
            left_padding: left_padding.into(),
            right_padding: right_padding.into(),
        }
    }
}

/// Styles of a button in each of its states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonStyles {
    pub blur: StateStyle,
    pub focus: StateStyle,
    pub disabled: StateStyle,
    pub submitted: StateStyle,
    pub padding_has_markup: bool,
}

impl Default for ButtonStyles {
    fn default() -> Self {
        Self {
            blur: StateStyle::new(AttrSet::new().bg(Color::Black).fg(Color::White).bold(), "", ""),
            focus: StateStyle::new(AttrSet::new().bg(Color::White).fg(Color::Black).bold(), "", ""),
            disabled: StateStyle::new(
                AttrSet::new().bg(Color::Black).fg(Color::BrightBlack).bold(),
                "",
                "",
            ),
            submitted: StateStyle::new(
                AttrSet::new().bg(Color::BrightBlack).fg(Color::BrightWhite).bold(),
                "",
                "",
            ),
            padding_has_markup: false,
        }
    }
}

// =============================================================================
// Menu Props
// =============================================================================

/// Options of a paged menu.
///
/// Per-state paddings fall back to `left_padding`/`right_padding`, then `""`.
#[derive(Clone, Debug)]
pub struct MenuProps<V = String> {
    pub id: Option<String>,
    pub x: u16,
    pub y: u16,
    /// Fixed width. `None` fits the widest button.
    pub width: Option<u16>,

    pub items: Vec<Item<V>>,
    pub background_attr: AttrSet,
    pub content_ellipsis: String,
    pub previous_page_content: String,
    pub previous_page_content_has_markup: bool,
    pub next_page_content: String,
    pub next_page_content_has_markup: bool,

    pub button_focus_attr: AttrSet,
    pub button_blur_attr: AttrSet,
    pub button_disabled_attr: AttrSet,
    pub button_submitted_attr: AttrSet,

    pub left_padding: String,
    pub right_padding: String,
    pub blur_left_padding: Option<String>,
    pub blur_right_padding: Option<String>,
    pub focus_left_padding: Option<String>,
    pub focus_right_padding: Option<String>,
    pub disabled_left_padding: Option<String>,
    pub disabled_right_padding: Option<String>,
    pub submitted_left_padding: Option<String>,
    pub submitted_right_padding: Option<String>,
    pub padding_has_markup: bool,

    /// Replaces the default arrow bindings.
    pub key_bindings: Option<KeyBindings<MenuAction>>,
    pub no_draw: bool,
}

impl<V> Default for MenuProps<V> {
    fn default() -> Self {
        let styles = ButtonStyles::default();
        Self {
            id: None,
            x: 0,
            y: 0,
            width: None,
            items: Vec::new(),
            background_attr: AttrSet::new().bg(Color::White),
            content_ellipsis: "…".to_string(),
            previous_page_content: "«".to_string(),
            previous_page_content_has_markup: false,
            next_page_content: "»".to_string(),
            next_page_content_has_markup: false,
            button_focus_attr: styles.focus.attr,
            button_blur_attr: styles.blur.attr,
            button_disabled_attr: styles.disabled.attr,
            button_submitted_attr: styles.submitted.attr,
            left_padding: String::new(),
            right_padding: String::new(),
            blur_left_padding: None,
            blur_right_padding: None,
            focus_left_padding: None,
            focus_right_padding: None,
            disabled_left_padding: None,
            disabled_right_padding: None,
            submitted_left_padding: None,
            submitted_right_padding: None,
            padding_has_markup: false,
            key_bindings: None,
            no_draw: false,
        }
    }
}

impl<V> MenuProps<V> {
    /// Resolve the per-state button styles.
    pub fn button_styles(&self) -> ButtonStyles {
        let pick = |specific: &Option<String>, shared: &str| {
            specific.clone().unwrap_or_else(|| shared.to_string())
        };
        ButtonStyles {
            blur: StateStyle::new(
                self.button_blur_attr,
                pick(&self.blur_left_padding, &self.left_padding),
                pick(&self.blur_right_padding, &self.right_padding),
            ),
            focus: StateStyle::new(
                self.button_focus_attr,
                pick(&self.focus_left_padding, &self.left_padding),
                pick(&self.focus_right_padding, &self.right_padding),
            ),
            disabled: StateStyle::new(
                self.button_disabled_attr,
                pick(&self.disabled_left_padding, &self.left_padding),
                pick(&self.disabled_right_padding, &self.right_padding),
            ),
            submitted: StateStyle::new(
                self.button_submitted_attr,
                pick(&self.submitted_left_padding, &self.left_padding),
                pick(&self.submitted_right_padding, &self.right_padding),
            ),
            padding_has_markup: self.padding_has_markup,
        }
    }
}

// =============================================================================
// TextInput Props
// =============================================================================

/// Options of a text field.
#[derive(Clone, Debug)]
pub struct TextInputProps {
    pub id: Option<String>,
    pub x: u16,
    pub y: u16,
    /// Total width, label included. `None` gives the editor 20 cells.
    pub width: Option<u16>,
    pub height: u16,

    pub label: Option<String>,
    pub label_focus_attr: AttrSet,
    pub label_blur_attr: AttrSet,
    pub label_focus_left_padding: String,
    pub label_focus_right_padding: String,
    pub label_blur_left_padding: String,
    pub label_blur_right_padding: String,

    pub text_attr: AttrSet,
    pub empty_attr: AttrSet,

    pub content: Option<String>,
    pub content_has_markup: bool,
    pub value: Option<String>,
    pub hidden: bool,
    pub allow_new_line: bool,

    /// Replaces the default Enter/Alt+Enter submit bindings.
    pub key_bindings: Option<KeyBindings<TextInputAction>>,
    /// Replaces the editor table entirely (`allow_new_line` is then ignored).
    pub editable_text_box_key_bindings: Option<KeyBindings<EditAction>>,
    pub no_draw: bool,
}

impl Default for TextInputProps {
    fn default() -> Self {
        Self {
            id: None,
            x: 0,
            y: 0,
            width: None,
            height: 1,
            label: None,
            label_focus_attr: AttrSet::new().bold(),
            label_blur_attr: AttrSet::new().dim(),
            label_focus_left_padding: String::new(),
            label_focus_right_padding: String::new(),
            label_blur_left_padding: String::new(),
            label_blur_right_padding: String::new(),
            text_attr: AttrSet::new().bg(Color::Blue),
            empty_attr: AttrSet::new().bg(Color::Blue),
            content: None,
            content_has_markup: false,
            value: None,
            hidden: false,
            allow_new_line: false,
            key_bindings: None,
            editable_text_box_key_bindings: None,
            no_draw: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::keyboard::{KeyboardEvent, Modifiers};
    use crate::types::Attr;

    #[test]
    fn test_menu_defaults() {
        let props: MenuProps = MenuProps::default();
        assert_eq!(props.content_ellipsis, "…");
        assert_eq!(props.previous_page_content, "«");
        assert_eq!(props.next_page_content, "»");
        assert_eq!(props.background_attr.bg, Some(Color::White));

        let styles = props.button_styles();
        assert_eq!(styles.focus.attr.fg, Some(Color::Black));
        assert!(styles.focus.attr.flags.contains(Attr::BOLD));
        assert_eq!(styles.submitted.attr.bg, Some(Color::BrightBlack));
    }

    #[test]
    fn test_padding_fallback() {
        let props: MenuProps = MenuProps {
            left_padding: " ".into(),
            right_padding: " ".into(),
            focus_left_padding: Some(">".into()),
            ..Default::default()
        };
        let styles = props.button_styles();

        assert_eq!(styles.focus.left_padding, ">");
        assert_eq!(styles.focus.right_padding, " ");
        assert_eq!(styles.blur.left_padding, " ");
        assert_eq!(styles.disabled.right_padding, " ");
    }

    #[test]
    fn test_default_menu_bindings() {
        let bindings = default_menu_key_bindings();
        assert_eq!(bindings.lookup(&KeyboardEvent::new("ArrowLeft")), Some(MenuAction::Previous));
        assert_eq!(bindings.lookup(&KeyboardEvent::new("ArrowDown")), Some(MenuAction::Next));
        assert_eq!(bindings.lookup(&KeyboardEvent::new("Enter")), None);
    }

    #[test]
    fn test_multi_line_bindings_derive_from_base() {
        let base = default_editor_key_bindings();
        let multi = multi_line_key_bindings(&base);

        assert_eq!(base.get("Enter"), None);
        assert_eq!(multi.get("Enter"), Some(EditAction::NewLine));
        assert_eq!(multi.get("ArrowUp"), Some(EditAction::Up));
        assert_eq!(multi.get("Backspace"), Some(EditAction::BackDelete));
        assert_eq!(
            multi.lookup(&KeyboardEvent::with_modifiers("ArrowLeft", Modifiers::ctrl())),
            Some(EditAction::StartOfWord)
        );
    }

    #[test]
    fn test_text_input_defaults() {
        let props = TextInputProps::default();
        assert_eq!(props.text_attr.bg, Some(Color::Blue));
        assert!(props.label_blur_attr.flags.contains(Attr::DIM));
        assert!(!props.allow_new_line);
        assert_eq!(
            default_text_input_key_bindings().get("Alt+Enter"),
            Some(TextInputAction::Submit)
        );
    }
}
