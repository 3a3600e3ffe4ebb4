//! Text label.
//!
//! A non-focusable single run of content with an attribute set and
//! paddings. Its width is the rendered width of padding plus content.

use crate::engine::arrays::text;
use crate::layout::display_width;
use crate::types::{AttrSet, ElementKind, Rect};

use super::element::{Element, Node};
use super::types::StateStyle;

#[derive(Clone, Debug, Default)]
pub struct TextProps {
    pub id: Option<String>,
    pub x: u16,
    pub y: u16,
    pub content: String,
    pub content_has_markup: bool,
    pub attr: AttrSet,
    pub left_padding: String,
    pub right_padding: String,
    pub padding_has_markup: bool,
    pub no_draw: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Text {
    node: Node,
}

impl Text {
    pub fn new(parent: Node, props: TextProps) -> Self {
        let node = Node::create(Some(parent), ElementKind::Text, props.id.as_deref());
        let label = Self { node };

        text::set_text_content(node.index(), props.content, props.content_has_markup);
        text::set_text_attr(node.index(), props.attr);
        text::set_padding(node.index(), &props.left_padding, &props.right_padding);
        node.set_rect(Rect::new(props.x, props.y, label.measure(props.padding_has_markup), 1));

        if !props.no_draw {
            node.draw();
        }
        label
    }

    pub fn content(&self) -> String {
        text::get_text_content(self.node.index())
    }

    pub fn set_content(&self, content: impl Into<String>, has_markup: bool) {
        text::set_text_content(self.node.index(), content.into(), has_markup);
    }

    pub fn attr(&self) -> AttrSet {
        text::get_text_attr(self.node.index())
    }

    pub fn padding(&self) -> (String, String) {
        text::get_padding(self.node.index())
    }

    /// Apply a state's attribute and paddings. The rect keeps its width.
    pub fn apply_style(&self, style: &StateStyle) {
        text::set_text_attr(self.node.index(), style.attr);
        text::set_padding(self.node.index(), &style.left_padding, &style.right_padding);
    }

    /// Rendered width of the current padding and content.
    pub fn measure(&self, padding_has_markup: bool) -> u16 {
        let index = self.node.index();
        let (left, right) = text::get_padding(index);
        display_width(&left, padding_has_markup)
            .saturating_add(display_width(&text::get_text_content(index), text::get_has_markup(index)))
            .saturating_add(display_width(&right, padding_has_markup))
    }

    /// Width of the element's rect.
    pub fn width(&self) -> u16 {
        self.node.rect().width
    }
}

impl Element for Text {
    fn node(&self) -> Node {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::element::{reset_document, Document};
    use crate::types::Color;

    #[test]
    fn test_width_strips_markup() {
        reset_document();
        let doc = Document::new(80, 24);

        let label = Text::new(
            doc.node(),
            TextProps {
                content: "^bName:".into(),
                content_has_markup: true,
                left_padding: " ".into(),
                right_padding: " ".into(),
                ..Default::default()
            },
        );

        assert_eq!(label.width(), 7);
        assert_eq!(label.content(), "^bName:");
        assert!(!label.node().is_focusable());
        assert_eq!(label.node().draw_count(), 1);
    }

    #[test]
    fn test_width_saturates() {
        reset_document();
        let doc = Document::new(80, 24);

        let label = Text::new(
            doc.node(),
            TextProps { content: "x".repeat(70_000), right_padding: " ".into(), no_draw: true, ..Default::default() },
        );
        assert_eq!(label.width(), u16::MAX);
    }

    #[test]
    fn test_apply_style() {
        reset_document();
        let doc = Document::new(80, 24);

        let label = Text::new(doc.node(), TextProps { content: "Name".into(), no_draw: true, ..Default::default() });
        assert_eq!(label.node().draw_count(), 0);

        label.apply_style(&StateStyle::new(AttrSet::new().fg(Color::Red), ">", ""));
        assert_eq!(label.attr().fg, Some(Color::Red));
        assert_eq!(label.padding(), (">".to_string(), String::new()));
        assert_eq!(label.width(), 4);
    }
}
