//! Button - A focusable, submittable run of text.
//!
//! Status precedence is disabled, submitted, focus, blur. Each status has
//! its own attribute and paddings, written to the text arrays on change.
//! Submitting emits `Submit { value, source }` on the button itself; the
//! owner (a menu) listens there.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::engine::arrays::text;
use crate::layout::display_width;
use crate::state::events::{ElementEvent, EventType, ListenerId, Propagation, SubmitEvent, SubmitValue};
use crate::state::focus::FocusReason;
use crate::state::keyboard::KeyBindings;
use crate::types::{ElementKind, Rect};

use super::element::{Element, Node};
use super::types::{default_button_key_bindings, ButtonAction, ButtonStyles, StateStyle};

// =============================================================================
// Types
// =============================================================================

/// What a button does for its menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonRole {
    /// A regular item.
    #[default]
    Item,
    PreviousPage,
    NextPage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonStatus {
    Blur,
    Focus,
    Disabled,
    Submitted,
}

#[derive(Clone, Debug)]
pub struct ButtonProps {
    pub id: Option<String>,
    pub x: u16,
    pub y: u16,
    /// Fixed width. `None` fits padding and content.
    pub width: Option<u16>,
    pub content: String,
    pub content_has_markup: bool,
    pub value: SubmitValue,
    pub role: ButtonRole,
    pub disabled: bool,
    pub styles: ButtonStyles,
    pub key_bindings: Option<KeyBindings<ButtonAction>>,
    pub no_draw: bool,
}

impl Default for ButtonProps {
    fn default() -> Self {
        Self {
            id: None,
            x: 0,
            y: 0,
            width: None,
            content: String::new(),
            content_has_markup: false,
            value: SubmitValue::default(),
            role: ButtonRole::Item,
            disabled: false,
            styles: ButtonStyles::default(),
            key_bindings: None,
            no_draw: false,
        }
    }
}

struct ButtonState {
    value: SubmitValue,
    has_focus: bool,
    submitted: bool,
}

struct ButtonInner {
    node: Node,
    role: ButtonRole,
    styles: ButtonStyles,
    key_bindings: KeyBindings<ButtonAction>,
    state: RefCell<ButtonState>,
    listeners: RefCell<Vec<ListenerId>>,
}

/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Button {
    inner: Rc<ButtonInner>,
}

// =============================================================================
// Construction
// =============================================================================

impl Button {
    pub fn new(parent: Node, props: ButtonProps) -> Self {
        let node = Node::create(Some(parent), ElementKind::Button, props.id.as_deref());
        node.set_focusable(true);
        node.set_disabled(props.disabled);
        text::set_text_content(node.index(), props.content, props.content_has_markup);

        let width = props.width.unwrap_or_else(|| {
            let padding = |style: &StateStyle| {
                display_width(&style.left_padding, props.styles.padding_has_markup)
                    .saturating_add(display_width(&style.right_padding, props.styles.padding_has_markup))
            };
            padding(&props.styles.blur).saturating_add(display_width(
                &text::get_text_content(node.index()),
                text::get_has_markup(node.index()),
            ))
        });
        node.set_rect(Rect::new(props.x, props.y, width, 1));

        let button = Self {
            inner: Rc::new(ButtonInner {
                node,
                role: props.role,
                styles: props.styles,
                key_bindings: props.key_bindings.unwrap_or_else(default_button_key_bindings),
                state: RefCell::new(ButtonState {
                    value: props.value,
                    has_focus: false,
                    submitted: false,
                }),
                listeners: RefCell::new(Vec::new()),
            }),
        };

        button.subscribe();
        button.update_status();

        if !props.no_draw {
            node.draw();
        }
        button
    }

    fn subscribe(&self) {
        let node = self.inner.node;

        let weak = Rc::downgrade(&self.inner);
        let key = node.on(EventType::Key, move |event| {
            let (Some(inner), ElementEvent::Key(key)) = (weak.upgrade(), event) else {
                return Propagation::Declined;
            };
            match inner.key_bindings.lookup(key) {
                Some(ButtonAction::Submit) => Button { inner }.submit(),
                None => Propagation::Declined,
            }
        });

        let weak = Rc::downgrade(&self.inner);
        let focus = node.on(EventType::Focus, move |event| {
            if let (Some(inner), ElementEvent::Focus { focused, .. }) = (weak.upgrade(), event) {
                Button { inner }.on_focus(*focused);
            }
            Propagation::Declined
        });

        let weak: Weak<ButtonInner> = Rc::downgrade(&self.inner);
        let click = node.on(EventType::Click, move |_| {
            let Some(inner) = weak.upgrade() else {
                return Propagation::Declined;
            };
            let button = Button { inner };
            if button.node().is_disabled() {
                return Propagation::Declined;
            }
            if let Err(err) = button.node().give_focus(FocusReason::Select) {
                tracing::warn!(target: "spark_widgets::button", %err, "click on released button");
                return Propagation::Declined;
            }
            button.submit()
        });

        self.inner.listeners.borrow_mut().extend([key, focus, click]);
    }
}

// =============================================================================
// Behaviour
// =============================================================================

impl Button {
    pub fn value(&self) -> SubmitValue {
        self.inner.state.borrow().value.clone()
    }

    /// The value as a `T`, if that is what it holds.
    pub fn value_as<T: Clone + 'static>(&self) -> Option<T> {
        self.inner.state.borrow().value.cloned()
    }

    pub fn set_value(&self, value: impl Into<SubmitValue>) {
        self.inner.state.borrow_mut().value = value.into();
    }

    pub fn content(&self) -> String {
        text::get_text_content(self.inner.node.index())
    }

    pub fn set_content(&self, content: impl Into<String>, has_markup: bool, dont_draw: bool) {
        text::set_text_content(self.inner.node.index(), content.into(), has_markup);
        if !dont_draw {
            self.inner.node.draw();
        }
    }

    pub fn role(&self) -> ButtonRole {
        self.inner.role
    }

    pub fn is_submitted(&self) -> bool {
        self.inner.state.borrow().submitted
    }

    pub fn status(&self) -> ButtonStatus {
        let state = self.inner.state.borrow();
        if self.inner.node.is_disabled() {
            ButtonStatus::Disabled
        } else if state.submitted {
            ButtonStatus::Submitted
        } else if state.has_focus {
            ButtonStatus::Focus
        } else {
            ButtonStatus::Blur
        }
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.node.set_disabled(disabled);
        self.update_status();
        self.inner.node.draw();
    }

    /// Write the current status' attribute and paddings to the text arrays.
    pub fn update_status(&self) {
        let styles = &self.inner.styles;
        let style = match self.status() {
            ButtonStatus::Disabled => &styles.disabled,
            ButtonStatus::Submitted => &styles.submitted,
            ButtonStatus::Focus => &styles.focus,
            ButtonStatus::Blur => &styles.blur,
        };
        let index = self.inner.node.index();
        text::set_text_attr(index, style.attr);
        text::set_padding(index, &style.left_padding, &style.right_padding);
    }

    fn on_focus(&self, focused: bool) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.has_focus = focused;
            state.submitted = false;
        }
        self.update_status();
        self.inner.node.draw();
    }

    /// Mark submitted, redraw, then emit `Submit` on the button.
    ///
    /// Listeners may destroy the button; nothing touches it after the emit.
    pub fn submit(&self) -> Propagation {
        let node = self.inner.node;
        if node.is_disabled() || !node.is_alive() {
            return Propagation::Declined;
        }

        let value = {
            let mut state = self.inner.state.borrow_mut();
            state.submitted = true;
            state.value.clone()
        };
        self.update_status();
        node.draw();

        tracing::trace!(target: "spark_widgets::button", index = node.index(), ?value, "submit");
        node.emit(&ElementEvent::Submit(SubmitEvent { value, source: node.index() }));
        Propagation::Handled
    }
}

impl Element for Button {
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
