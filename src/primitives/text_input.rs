//! TextInput - A label plus an embedded editor.
//!
//! Keys reach the editor first. The field's own submit binding only runs
//! when the editor lets the key through, so an editor that inserts a
//! newline on Enter suppresses submission.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::Signal;

use crate::state::events::{ElementEvent, EventType, ListenerId, Propagation, SubmitEvent};
use crate::state::focus::FocusReason;
use crate::state::keyboard::{KeyBindings, KeyboardEvent};
use crate::types::{ElementKind, Rect};

use super::editable_text_box::{EditableTextBox, EditableTextBoxProps};
use super::element::{Element, Node};
use super::label::{Text, TextProps};
use super::types::{
    default_editor_key_bindings, default_text_input_key_bindings, multi_line_key_bindings,
    StateStyle, TextInputAction, TextInputProps,
};

const DEFAULT_EDITOR_WIDTH: u16 = 20;

struct TextInputInner {
    node: Node,
    label: Option<Text>,
    editor: EditableTextBox,
    label_focus: StateStyle,
    label_blur: StateStyle,
    key_bindings: KeyBindings<TextInputAction>,
    has_focus: Cell<bool>,
    listeners: RefCell<Vec<ListenerId>>,
}

#[derive(Clone)]
pub struct TextInput {
    inner: Rc<TextInputInner>,
}

impl TextInput {
    pub fn new(parent: Node, props: TextInputProps) -> Self {
        let node = Node::create(Some(parent), ElementKind::TextInput, props.id.as_deref());
        node.set_focusable(true);
        node.set_no_child_focus(true);

        let label_focus = StateStyle::new(
            props.label_focus_attr,
            props.label_focus_left_padding.clone(),
            props.label_focus_right_padding.clone(),
        );
        let label_blur = StateStyle::new(
            props.label_blur_attr,
            props.label_blur_left_padding.clone(),
            props.label_blur_right_padding.clone(),
        );

        let label = props.label.as_ref().map(|content| {
            Text::new(
                node,
                TextProps {
                    x: props.x,
                    y: props.y,
                    content: content.clone(),
                    attr: label_blur.attr,
                    left_padding: label_blur.left_padding.clone(),
                    right_padding: label_blur.right_padding.clone(),
                    no_draw: true,
                    ..Default::default()
                },
            )
        });
        let label_width = label.map_or(0, |l| l.width());

        let editor_width = match props.width {
            Some(width) => width.saturating_sub(label_width),
            None => DEFAULT_EDITOR_WIDTH,
        };
        let editor_bindings = match props.editable_text_box_key_bindings {
            Some(bindings) => bindings,
            None if props.allow_new_line => multi_line_key_bindings(&default_editor_key_bindings()),
            None => default_editor_key_bindings(),
        };
        let editor = EditableTextBox::new(
            node,
            EditableTextBoxProps {
                x: props.x.saturating_add(label_width),
                y: props.y,
                width: editor_width,
                height: props.height,
                content: props.content,
                content_has_markup: props.content_has_markup,
                value: props.value,
                hidden: props.hidden,
                text_attr: props.text_attr,
                empty_attr: props.empty_attr,
                key_bindings: Some(editor_bindings),
                no_draw: true,
                ..Default::default()
            },
        );

        node.set_rect(Rect::new(props.x, props.y, label_width.saturating_add(editor_width), props.height));

        let field = Self {
            inner: Rc::new(TextInputInner {
                node,
                label,
                editor,
                label_focus,
                label_blur,
                key_bindings: props.key_bindings.unwrap_or_else(default_text_input_key_bindings),
                has_focus: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
            }),
        };

        field.subscribe();
        field.update_status();
        tracing::debug!(target: "spark_widgets::text_input", index = node.index(), label_width, editor_width, "text input created");

        if !props.no_draw {
            node.draw();
        }
        field
    }

    fn subscribe(&self) {
        let node = self.inner.node;

        let weak = Rc::downgrade(&self.inner);
        let key = node.on(EventType::Key, move |event| match (weak.upgrade(), event) {
            (Some(inner), ElementEvent::Key(key)) => TextInput { inner }.on_key(key),
            _ => Propagation::Declined,
        });

        let weak = Rc::downgrade(&self.inner);
        let focus = node.on(EventType::Focus, move |event| {
            if let (Some(inner), ElementEvent::Focus { focused, reason }) = (weak.upgrade(), event) {
                TextInput { inner }.on_focus(*focused, *reason);
            }
            Propagation::Declined
        });

        let weak = Rc::downgrade(&self.inner);
        let click = node.on(EventType::Click, move |_| {
            let Some(inner) = weak.upgrade() else {
                return Propagation::Declined;
            };
            TextInput { inner }.on_click()
        });

        self.inner.listeners.borrow_mut().extend([key, focus, click]);
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    /// Editor first; the submit binding only sees keys the editor let through.
    pub fn on_key(&self, event: &KeyboardEvent) -> Propagation {
        let editor = self.inner.editor.node();
        if editor.emit(&ElementEvent::Key(event.clone())).stops() {
            return Propagation::Interrupted;
        }

        match self.inner.key_bindings.lookup(event) {
            Some(TextInputAction::Submit) => {
                let value = self.value();
                let node = self.inner.node;
                tracing::trace!(target: "spark_widgets::text_input", index = node.index(), %value, "submit");
                node.emit(&ElementEvent::Submit(SubmitEvent { value: value.into(), source: node.index() }));
                Propagation::Handled
            }
            None => Propagation::Declined,
        }
    }

    pub fn on_focus(&self, focused: bool, reason: FocusReason) {
        self.inner.has_focus.set(focused);
        if focused && reason == FocusReason::Select {
            self.inner.editor.select_all();
        }
        self.update_status();
        self.inner.node.draw();
    }

    pub fn on_click(&self) -> Propagation {
        match self.inner.node.give_focus(FocusReason::Select) {
            Ok(_) => Propagation::Handled,
            Err(err) => {
                tracing::warn!(target: "spark_widgets::text_input", %err, "click on released field");
                Propagation::Declined
            }
        }
    }

    /// Apply the label's focus or blur style.
    pub fn update_status(&self) {
        let Some(label) = self.inner.label else {
            return;
        };
        let style = if self.inner.has_focus.get() { &self.inner.label_focus } else { &self.inner.label_blur };
        label.apply_style(style);
    }

    // -------------------------------------------------------------------------
    // Editor delegation
    // -------------------------------------------------------------------------

    pub fn value(&self) -> String {
        self.inner.editor.value()
    }

    pub fn value_signal(&self) -> Signal<String> {
        self.inner.editor.value_signal()
    }

    pub fn set_value(&self, value: impl Into<String>, dont_draw: bool) {
        self.inner.editor.set_value(value, dont_draw);
    }

    pub fn content(&self) -> String {
        self.inner.editor.content()
    }

    pub fn set_content(&self, content: impl Into<String>, has_markup: bool, dont_draw: bool) {
        self.inner.editor.set_content(content, has_markup, dont_draw);
    }

    pub fn label(&self) -> Option<Text> {
        self.inner.label
    }

    pub fn editor(&self) -> &EditableTextBox {
        &self.inner.editor
    }

    pub fn is_focused(&self) -> bool {
        self.inner.has_focus.get()
    }
}

impl Element for TextInput {
    fn node(&self) -> Node {
        self.inner.node
    }

    /// Unsubscribe, then release the editor, the label and the field.
    fn destroy(&self) {
        let node = self.inner.node;
        let listeners: Vec<ListenerId> = self.inner.listeners.borrow_mut().drain(..).collect();
        for id in listeners {
            node.off(id);
        }
        self.inner.editor.destroy();
        if let Some(label) = self.inner.label {
            label.destroy();
        }
        tracing::debug!(target: "spark_widgets::text_input", index = node.index(), "text input destroyed");
        node.destroy();
    }
}
