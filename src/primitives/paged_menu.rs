//! PagedMenu - Buttons split across pages.
//!
//! The live children are, in order, an optional previous-page button, the
//! current page's item buttons and an optional next-page button. Which
//! buttons a page holds is up to a [`PageBuilder`]; the menu owns the page
//! counter, key intents, focus delegation and submit routing.
//!
//! ```ignore
//! let menu = PagedMenu::column(doc.node(), MenuProps {
//!     items: vec![Item::new("Todo", "todo"), Item::new("Done", "done")],
//!     ..Default::default()
//! }, Some(5))?;
//! menu.on(EventType::Submit, |event| { /* ... */ Propagation::Handled });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::arrays::text;
use crate::state::events::{ElementEvent, EventType, ListenerId, Propagation, SubmitEvent, SubmitValue};
use crate::state::focus::FocusReason;
use crate::state::keyboard::{KeyBindings, KeyboardEvent};
use crate::types::{ElementKind, Rect};

use super::button::{Button, ButtonProps, ButtonRole};
use super::element::{Element, Node};
use super::types::{default_menu_key_bindings, ButtonStyles, Item, MenuAction, MenuProps};

// =============================================================================
// Page builders
// =============================================================================

/// What a builder sees when it lays out a page.
pub struct PageContext<'a, V = String> {
    pub page: usize,
    pub max_page: usize,
    pub items: &'a [Item<V>],
    pub props: &'a MenuProps<V>,
    pub styles: &'a ButtonStyles,
}

/// Decides how items are split into pages and where their buttons go.
///
/// Both methods default to a single page with no buttons.
pub trait PageBuilder: 'static {
    /// Last page index for `item_count` items.
    fn max_page(&self, _item_count: usize) -> usize {
        0
    }

    /// Buttons of `ctx.page`, in child order. Item buttons carry their
    /// item's value wrapped in a [`SubmitValue`].
    fn init_page<V: Clone + 'static>(&self, _ctx: &PageContext<'_, V>) -> Vec<ButtonProps> {
        Vec::new()
    }
}

/// Builds nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyPage;

impl PageBuilder for EmptyPage {}

// =============================================================================
// PagedMenu
// =============================================================================

struct MenuState {
    page: usize,
    max_page: usize,
    buttons: Vec<Button>,
    /// Submit listeners the menu holds on its buttons.
    button_listeners: Vec<(Node, ListenerId)>,
}

struct MenuInner<B: PageBuilder, V> {
    node: Node,
    builder: B,
    props: MenuProps<V>,
    styles: ButtonStyles,
    key_bindings: KeyBindings<MenuAction>,
    state: RefCell<MenuState>,
    listeners: RefCell<Vec<ListenerId>>,
}

/// `V` is the item value type; submits carry it as a [`SubmitValue`].
pub struct PagedMenu<B: PageBuilder = EmptyPage, V = String> {
    inner: Rc<MenuInner<B, V>>,
}

impl<B: PageBuilder, V> Clone for PagedMenu<B, V> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<B: PageBuilder, V: Clone + 'static> PagedMenu<B, V> {
    pub fn new(parent: Node, props: MenuProps<V>, builder: B) -> Self {
        let node = Node::create(Some(parent), ElementKind::Menu, props.id.as_deref());
        node.set_focusable(true);
        node.set_rect(Rect::new(props.x, props.y, props.width.unwrap_or(0), 0));
        text::set_text_attr(node.index(), props.background_attr);

        let max_page = builder.max_page(props.items.len());
        let no_draw = props.no_draw;
        let menu = Self {
            inner: Rc::new(MenuInner {
                node,
                styles: props.button_styles(),
                key_bindings: props.key_bindings.clone().unwrap_or_else(default_menu_key_bindings),
                builder,
                props,
                state: RefCell::new(MenuState {
                    page: 0,
                    max_page,
                    buttons: Vec::new(),
                    button_listeners: Vec::new(),
                }),
                listeners: RefCell::new(Vec::new()),
            }),
        };

        menu.subscribe();
        menu.init_page();
        tracing::debug!(
            target: "spark_widgets::menu",
            index = node.index(),
            items = menu.inner.props.items.len(),
            max_page,
            "menu created"
        );

        if !no_draw {
            node.draw();
        }
        menu
    }

    fn subscribe(&self) {
        let node = self.inner.node;

        let weak = Rc::downgrade(&self.inner);
        let key = node.on(EventType::Key, move |event| match (weak.upgrade(), event) {
            (Some(inner), ElementEvent::Key(key)) => PagedMenu { inner }.on_key(key),
            _ => Propagation::Declined,
        });

        let weak = Rc::downgrade(&self.inner);
        let focus = node.on(EventType::Focus, move |event| {
            if let (Some(inner), ElementEvent::Focus { focused, reason }) = (weak.upgrade(), event) {
                PagedMenu { inner }.on_focus(*focused, *reason);
            }
            Propagation::Declined
        });

        self.inner.listeners.borrow_mut().extend([key, focus]);
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn page(&self) -> usize {
        self.inner.state.borrow().page
    }

    pub fn max_page(&self) -> usize {
        self.inner.state.borrow().max_page
    }

    pub fn items(&self) -> &[Item<V>] {
        &self.inner.props.items
    }

    /// Live buttons, in child order.
    pub fn buttons(&self) -> Vec<Button> {
        self.inner.state.borrow().buttons.clone()
    }

    pub fn focus_child(&self) -> Option<Node> {
        self.inner.node.focus_child()
    }

    pub fn builder(&self) -> &B {
        &self.inner.builder
    }

    // -------------------------------------------------------------------------
    // Paging
    // -------------------------------------------------------------------------

    /// Replace the live buttons with those of the current page.
    pub fn init_page(&self) {
        let node = self.inner.node;

        let (old_buttons, old_listeners) = {
            let mut state = self.inner.state.borrow_mut();
            (std::mem::take(&mut state.buttons), std::mem::take(&mut state.button_listeners))
        };
        for (button, id) in old_listeners {
            button.off(id);
        }
        for button in old_buttons {
            button.destroy();
        }

        let (page, max_page) = {
            let state = self.inner.state.borrow();
            (state.page, state.max_page)
        };
        let ctx = PageContext {
            page,
            max_page,
            items: &self.inner.props.items,
            props: &self.inner.props,
            styles: &self.inner.styles,
        };
        let planned = self.inner.builder.init_page(&ctx);

        let mut buttons = Vec::with_capacity(planned.len());
        let mut listeners = Vec::with_capacity(planned.len());
        for props in planned {
            let button = Button::new(node, ButtonProps { no_draw: true, ..props });
            listeners.push((button.node(), self.watch_button(&button)));
            buttons.push(button);
        }

        self.fit_rect(&buttons);
        tracing::trace!(target: "spark_widgets::menu", index = node.index(), page, buttons = buttons.len(), "page built");

        let mut state = self.inner.state.borrow_mut();
        state.buttons = buttons;
        state.button_listeners = listeners;
    }

    fn watch_button(&self, button: &Button) -> ListenerId {
        let weak = Rc::downgrade(&self.inner);
        let role = button.role();
        button.node().on(EventType::Submit, move |event| match (weak.upgrade(), event) {
            (Some(inner), ElementEvent::Submit(submit)) => {
                PagedMenu { inner }.on_button_submit(role, &submit.value, submit.source)
            }
            _ => Propagation::Declined,
        })
    }

    /// Grow the menu's rect to cover its buttons unless a width was given.
    fn fit_rect(&self, buttons: &[Button]) {
        let node = self.inner.node;
        let mut rect = node.rect();
        let mut right = rect.x.saturating_add(self.inner.props.width.unwrap_or(0));
        let mut bottom = rect.y;
        for button in buttons {
            let r = button.node().rect();
            right = right.max(r.x.saturating_add(r.width));
            bottom = bottom.max(r.y.saturating_add(r.height));
        }
        if self.inner.props.width.is_none() {
            rect.width = right - rect.x;
        }
        rect.height = bottom - rect.y;
        node.set_rect(rect);
    }

    /// Step back one page and focus its last item.
    pub fn previous_page(&self, reason: FocusReason) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.max_page == 0 || state.page == 0 {
                return;
            }
            state.page -= 1;
        }
        self.init_page();

        let children = self.inner.node.children();
        let target = children.len().checked_sub(2).map(|i| children[i]);
        self.focus_after_paging(target, reason);
    }

    /// Step forward one page and focus its first item.
    pub fn next_page(&self, reason: FocusReason) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.page >= state.max_page {
                return;
            }
            state.page += 1;
        }
        self.init_page();

        let target = self.inner.node.children().get(1).copied();
        self.focus_after_paging(target, reason);
    }

    fn focus_after_paging(&self, target: Option<Node>, reason: FocusReason) {
        let node = self.inner.node;
        tracing::trace!(target: "spark_widgets::menu", index = node.index(), page = self.page(), ?reason, "page changed");
        if let Some(target) = target {
            node.set_focus_child(Some(target));
            target.transfer_focus(reason);
        }
        node.draw();
    }

    // -------------------------------------------------------------------------
    // Handlers
    // -------------------------------------------------------------------------

    /// Previous/Next intents move focus between buttons, paging at the ends.
    pub fn on_key(&self, event: &KeyboardEvent) -> Propagation {
        let Some(action) = self.inner.key_bindings.lookup(event) else {
            return Propagation::Declined;
        };

        let node = self.inner.node;
        let (page, max_page) = (self.page(), self.max_page());
        let children = node.children();

        match action {
            MenuAction::Previous => {
                let child = node.focus_previous_child(max_page == 0);
                node.set_focus_child(child);
                if child.is_some() && child == children.first().copied() && max_page > 0 && page > 0 {
                    self.previous_page(FocusReason::Cycle);
                }
            }
            MenuAction::Next => {
                let child = node.focus_next_child(max_page == 0);
                node.set_focus_child(child);
                if child.is_some() && child == children.last().copied() && page < max_page {
                    self.next_page(FocusReason::Cycle);
                }
            }
        }
        Propagation::Handled
    }

    /// On a real focus gain, hand focus to the remembered child or the first
    /// one that takes it. Cycling is ignored.
    pub fn on_focus(&self, focused: bool, reason: FocusReason) {
        if !focused || reason == FocusReason::Cycle {
            return;
        }

        let node = self.inner.node;
        let remembered = node.focus_child().filter(|c| c.is_alive() && c.parent() == Some(node));
        match remembered {
            Some(child) if child.has_focus() && !node.has_focus() => {}
            Some(child) => {
                child.transfer_focus(FocusReason::Delegate);
            }
            None => {
                let child = node.focus_next_child(true);
                node.set_focus_child(child);
            }
        }
    }

    /// Nav buttons page; item buttons re-emit their submit on the menu.
    pub fn on_button_submit(&self, role: ButtonRole, value: &SubmitValue, source: usize) -> Propagation {
        match role {
            ButtonRole::PreviousPage => {
                self.previous_page(FocusReason::Direct);
                Propagation::Handled
            }
            ButtonRole::NextPage => {
                self.next_page(FocusReason::Direct);
                Propagation::Handled
            }
            ButtonRole::Item => {
                tracing::trace!(target: "spark_widgets::menu", index = self.inner.node.index(), ?value, "item submitted");
                self.inner.node.emit(&ElementEvent::Submit(SubmitEvent { value: value.clone(), source }))
            }
        }
    }
}

impl<B: PageBuilder, V: Clone + 'static> Element for PagedMenu<B, V> {
    fn node(&self) -> Node {
        self.inner.node
    }

    /// Unsubscribe everything, then release the menu and its buttons.
    fn destroy(&self) {
        let node = self.inner.node;
        let listeners: Vec<ListenerId> = self.inner.listeners.borrow_mut().drain(..).collect();
        for id in listeners {
            node.off(id);
        }
        let (buttons, button_listeners) = {
            let mut state = self.inner.state.borrow_mut();
            (std::mem::take(&mut state.buttons), std::mem::take(&mut state.button_listeners))
        };
        for (button, id) in button_listeners {
            button.off(id);
        }
        for button in buttons {
            button.destroy();
        }
        tracing::debug!(target: "spark_widgets::menu", index = node.index(), "menu destroyed");
        node.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::column_pages::ColumnPages;
    use crate::primitives::element::{reset_document, Document};
    use crate::state::events;
    use crate::state::keyboard;
    use std::cell::Cell;

    fn setup() -> Document {
        reset_document();
        Document::new(80, 24)
    }

    fn items(n: usize) -> Vec<Item> {
        (0..n).map(|i| Item::new(format!("Item {i}"), format!("v{i}"))).collect()
    }

    fn column(doc: &Document, n: usize, per_page: Option<usize>) -> PagedMenu<ColumnPages> {
        PagedMenu::column(doc.node(), MenuProps { items: items(n), ..Default::default() }, per_page).unwrap()
    }

    fn contents(menu: &PagedMenu<ColumnPages>) -> Vec<String> {
        menu.buttons().iter().map(|b| b.content()).collect()
    }

    fn press(name: &str) -> Propagation {
        keyboard::dispatch(KeyboardEvent::new(name))
    }

    #[test]
    fn test_empty_builder_has_no_children() {
        let doc = setup();
        let menu = PagedMenu::new(doc.node(), MenuProps { items: items(3), ..Default::default() }, EmptyPage);

        assert_eq!(menu.max_page(), 0);
        assert!(menu.buttons().is_empty());
        assert!(menu.node().children().is_empty());
        assert_eq!(menu.node().draw_count(), 1);
    }

    #[test]
    fn test_no_draw_skips_initial_draw() {
        let doc = setup();
        let menu = PagedMenu::column(
            doc.node(),
            MenuProps { items: items(2), no_draw: true, ..Default::default() },
            None,
        )
        .unwrap();

        assert_eq!(menu.node().draw_count(), 0);
    }

    #[test]
    fn test_live_children_per_page() {
        let doc = setup();
        let menu = column(&doc, 5, Some(2));

        assert_eq!(menu.max_page(), 2);
        assert_eq!(contents(&menu), vec!["Item 0", "Item 1", "»"]);

        menu.next_page(FocusReason::Direct);
        assert_eq!(contents(&menu), vec!["«", "Item 2", "Item 3", "»"]);

        menu.next_page(FocusReason::Direct);
        assert_eq!(contents(&menu), vec!["«", "Item 4"]);
    }

    #[test]
    fn test_paging_is_bounded() {
        let doc = setup();
        let menu = column(&doc, 5, Some(2));

        let before = contents(&menu);
        let focus_child = menu.focus_child();
        menu.previous_page(FocusReason::Direct);
        assert_eq!(menu.page(), 0);
        assert_eq!(contents(&menu), before);
        assert_eq!(menu.focus_child(), focus_child);

        menu.next_page(FocusReason::Direct);
        menu.next_page(FocusReason::Direct);
        let last = contents(&menu);
        let draws = menu.node().draw_count();
        menu.next_page(FocusReason::Direct);
        assert_eq!(menu.page(), 2);
        assert_eq!(contents(&menu), last);
        assert_eq!(menu.node().draw_count(), draws);
    }

    #[test]
    fn test_next_page_focuses_second_child() {
        let doc = setup();
        let menu = column(&doc, 5, Some(2));

        menu.next_page(FocusReason::Direct);
        let children = menu.node().children();
        assert!(children[1].has_focus());
        assert_eq!(menu.focus_child(), Some(children[1]));
    }

    #[test]
    fn test_previous_page_focuses_second_to_last_child() {
        let doc = setup();
        let menu = column(&doc, 5, Some(2));

        menu.next_page(FocusReason::Direct);
        menu.next_page(FocusReason::Direct);
        menu.previous_page(FocusReason::Direct);

        let children = menu.node().children();
        assert_eq!(menu.page(), 1);
        assert!(children[children.len() - 2].has_focus());
        assert_eq!(menu.buttons()[2].content(), "Item 3");
    }

    #[test]
    fn test_focus_delegates_to_first_item() {
        let doc = setup();
        let menu = column(&doc, 3, None);

        doc.give_focus_to(&menu, FocusReason::Direct).unwrap();
        let first = menu.buttons()[0].node();
        assert!(first.has_focus());
        assert_eq!(menu.focus_child(), Some(first));
    }

    #[test]
    fn test_focus_returns_to_remembered_child() {
        let doc = setup();
        let menu = column(&doc, 3, None);
        let other = Node::create(Some(doc.node()), ElementKind::Button, None);
        other.set_focusable(true);

        let second = menu.buttons()[1].node();
        second.transfer_focus(FocusReason::Direct);
        other.transfer_focus(FocusReason::Direct);
        assert!(!menu.node().contains_focus());

        doc.give_focus_to(&menu, FocusReason::Direct).unwrap();
        assert!(second.has_focus());
    }

    #[test]
    fn test_cycle_focus_gain_is_ignored() {
        let doc = setup();
        let menu = column(&doc, 3, None);
        let other = Node::create(Some(doc.node()), ElementKind::Button, None);
        other.set_focusable(true);

        let second = menu.buttons()[1].node();
        second.transfer_focus(FocusReason::Direct);
        other.transfer_focus(FocusReason::Direct);
        assert_eq!(menu.focus_child(), Some(second));

        menu.on_focus(true, FocusReason::Cycle);
        assert!(!second.has_focus());
        assert!(other.has_focus());

        menu.on_focus(true, FocusReason::Direct);
        assert!(second.has_focus());
    }

    #[test]
    fn test_arrow_keys_move_between_items() {
        let doc = setup();
        let menu = column(&doc, 3, None);
        doc.give_focus_to(&menu, FocusReason::Direct).unwrap();

        assert_eq!(press("ArrowDown"), Propagation::Handled);
        assert!(menu.buttons()[1].has_focus());
        assert_eq!(press("ArrowUp"), Propagation::Handled);
        assert!(menu.buttons()[0].has_focus());
    }

    #[test]
    fn test_single_page_wraps() {
        let doc = setup();
        let menu = column(&doc, 3, None);
        doc.give_focus_to(&menu, FocusReason::Direct).unwrap();

        press("ArrowUp");
        assert!(menu.buttons()[2].has_focus());
        press("ArrowDown");
        assert!(menu.buttons()[0].has_focus());
    }

    #[test]
    fn test_next_on_last_child_turns_page() {
        let doc = setup();
        let menu = column(&doc, 5, Some(2));
        menu.buttons()[1].node().transfer_focus(FocusReason::Direct);

        press("ArrowDown");

        assert_eq!(menu.page(), 1);
        assert_eq!(menu.buttons()[1].content(), "Item 2");
        assert!(menu.buttons()[1].has_focus());
    }

    #[test]
    fn test_previous_on_first_child_turns_page_back() {
        let doc = setup();
        let menu = column(&doc, 5, Some(2));
        menu.next_page(FocusReason::Direct);
        assert!(menu.buttons()[1].has_focus());

        press("ArrowUp");

        assert_eq!(menu.page(), 0);
        assert_eq!(menu.buttons()[1].content(), "Item 1");
        assert!(menu.buttons()[1].has_focus());
    }

    #[test]
    fn test_paged_menu_does_not_wrap() {
        let doc = setup();
        let menu = column(&doc, 5, Some(2));
        menu.buttons()[0].node().transfer_focus(FocusReason::Direct);

        press("ArrowUp");
        assert_eq!(menu.page(), 0);
        assert!(menu.buttons()[0].has_focus());
    }

    #[test]
    fn test_unbound_key_is_declined() {
        let doc = setup();
        let menu = column(&doc, 3, None);
        doc.give_focus_to(&menu, FocusReason::Direct).unwrap();

        assert_eq!(menu.on_key(&KeyboardEvent::new("x")), Propagation::Declined);
        assert_eq!(press("PageDown"), Propagation::Declined);
    }

    #[test]
    fn test_item_submit_is_reemitted() {
        let doc = setup();
        let menu = column(&doc, 3, None);
        doc.give_focus_to(&menu, FocusReason::Direct).unwrap();

        let got = Rc::new(RefCell::new(None));
        let probe = got.clone();
        menu.on(EventType::Submit, move |event| {
            if let ElementEvent::Submit(submit) = event {
                *probe.borrow_mut() = Some((submit.value.cloned::<String>(), submit.source));
            }
            Propagation::Handled
        });

        press("ArrowDown");
        press("Enter");

        let source = menu.buttons()[1].index();
        assert_eq!(*got.borrow(), Some((Some("v1".to_string()), source)));
    }

    #[test]
    fn test_item_values_keep_their_type() {
        #[derive(Clone, Copy, Debug, PartialEq)]
        enum Status {
            Todo,
            Done,
        }

        let doc = setup();
        let menu = PagedMenu::column(
            doc.node(),
            MenuProps { items: vec![Item::new("Todo", Status::Todo), Item::new("Done", Status::Done)], ..Default::default() },
            None,
        )
        .unwrap();
        assert_eq!(menu.buttons()[1].value_as::<Status>(), Some(Status::Done));

        let got = Rc::new(Cell::new(None));
        let probe = got.clone();
        menu.on(EventType::Submit, move |event| {
            if let ElementEvent::Submit(submit) = event {
                probe.set(submit.value.get::<Status>().copied());
            }
            Propagation::Handled
        });

        menu.buttons()[1].submit();
        assert_eq!(got.get(), Some(Status::Done));
    }

    #[test]
    fn test_nav_button_submit_pages() {
        let doc = setup();
        let menu = column(&doc, 5, Some(2));

        let submits = Rc::new(Cell::new(0));
        let probe = submits.clone();
        menu.on(EventType::Submit, move |_| {
            probe.set(probe.get() + 1);
            Propagation::Handled
        });

        let next = menu.buttons()[2].clone();
        next.submit();
        assert_eq!(menu.page(), 1);
        assert!(menu.buttons()[1].has_focus());

        let previous = menu.buttons()[0].clone();
        previous.submit();
        assert_eq!(menu.page(), 0);
        assert_eq!(submits.get(), 0);
    }

    #[test]
    fn test_custom_bindings_replace_defaults() {
        let doc = setup();
        let bindings = KeyBindings::from_pairs([("j", MenuAction::Next), ("k", MenuAction::Previous)]).unwrap();
        let menu = PagedMenu::column(
            doc.node(),
            MenuProps { items: items(3), key_bindings: Some(bindings), ..Default::default() },
            None,
        )
        .unwrap();
        doc.give_focus_to(&menu, FocusReason::Direct).unwrap();

        assert_eq!(press("ArrowDown"), Propagation::Declined);
        press("j");
        assert!(menu.buttons()[1].has_focus());
    }

    #[test]
    fn test_destroy_unsubscribes_then_releases() {
        let doc = setup();
        let menu = column(&doc, 5, Some(2));
        let node = menu.node();
        let buttons: Vec<usize> = menu.buttons().iter().map(|b| b.index()).collect();

        menu.destroy();

        assert!(!node.is_alive());
        assert_eq!(events::listener_count(node.index()), 0);
        for index in buttons {
            assert!(!Node::from_index(index).is_alive());
            assert_eq!(events::listener_count(index), 0);
        }
    }
}
