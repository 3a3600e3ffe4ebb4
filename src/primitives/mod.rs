//! Widgets - Element handles and the widgets built on them.
//!
//! - [`element`] - `Node` handle, `Element` trait, `Document` root
//! - [`label`] - Non-focusable text
//! - [`button`] - Focusable, submittable text
//! - [`editable_text_box`] - Minimal editor
//! - [`paged_menu`] - Buttons across pages, with a [`PageBuilder`] extension point
//! - [`column_pages`] - Fixed-size pages in a single column
//! - [`text_input`] - Label plus editor with priority key forwarding
//!
//! # Architecture
//!
//! Every widget allocates an index through [`Node::create`] and keeps its
//! typed state behind an `Rc`. Listeners capture a `Weak` to that state, so
//! a widget that has been dropped simply stops reacting, and `destroy`
//! removes its listeners before releasing the index.

pub mod button;
pub mod column_pages;
pub mod editable_text_box;
pub mod element;
pub mod label;
pub mod paged_menu;
pub mod text_input;
pub mod types;

pub use button::{Button, ButtonProps, ButtonRole, ButtonStatus};
pub use column_pages::ColumnPages;
pub use editable_text_box::{EditableTextBox, EditableTextBoxProps};
pub use element::{reset_document, Document, Element, Node};
pub use label::{Text, TextProps};
pub use paged_menu::{EmptyPage, PageBuilder, PageContext, PagedMenu};
pub use text_input::TextInput;
pub use types::*;
