//! # spark-widgets
//!
//! Focus-aware terminal widgets for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! few pieces of state that effects want to follow (focused index, redraw
//! generation, editor values).
//!
//! ## Architecture
//!
//! Elements are indices into parallel arrays plus a parent/child tree. Widgets
//! hold a [`Node`] handle and implement [`Element`]; events are routed by index:
//!
//! ```text
//! crossterm → input::route_event → keyboard/mouse dispatch
//!           → bubble from the focused (or hit) element → widget handlers
//!           → draw(index) → generation signal → snapshot / terminal
//! ```
//!
//! Handlers return a tri-state [`Propagation`]: `Handled` and `Interrupted`
//! stop bubbling, `Declined` lets the parent try.
//!
//! ## Widgets
//!
//! - [`PagedMenu`] - buttons split across pages, arrow keys move and page
//! - [`TextInput`] - label plus editor; the editor sees keys first
//! - [`Button`], [`Text`], [`EditableTextBox`] - the building blocks
//!
//! ## Modules
//!
//! - [`types`] - Colors, attribute sets, element kinds, rects
//! - [`engine`] - Registry and parallel arrays
//! - [`state`] - Events, focus, keyboard, mouse, input
//! - [`layout`] - Text measurement
//! - [`pipeline`] - Redraw bookkeeping, snapshots, terminal mount
//! - [`primitives`] - The widgets

pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use error::{Error, Result};
pub use types::*;

pub use engine::{get_id, get_index, is_allocated, reset_registry};

pub use layout::{display_width, string_width, strip_markup, truncate_text};

pub use pipeline::{draw, mount, run, snapshot, tick, MountHandle};

pub use primitives::{
    reset_document, Button, ButtonProps, ButtonRole, ButtonStatus, ButtonStyles, ColumnPages, Document,
    EditAction, EditableTextBox, EditableTextBoxProps, Element, EmptyPage, Item, MenuAction, MenuProps,
    Node, PageBuilder, PageContext, PagedMenu, StateStyle, Text, TextInput, TextInputAction,
    TextInputProps, TextProps,
};

pub use state::events::{ElementEvent, EventType, ListenerId, Propagation, SubmitEvent, SubmitValue};
pub use state::focus::FocusReason;
pub use state::keyboard::{KeyBindings, KeyboardEvent, Modifiers};
pub use state::mouse::{MouseButton, MouseEvent};
