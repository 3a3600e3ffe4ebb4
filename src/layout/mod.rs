//! Widget Toolkit - Layout Module
//!
//! Only text measurement lives here. Widgets place their children by hand
//! (a menu stacks its buttons, a field puts the editor after its label);
//! there is no layout solver.

pub mod text_measure;

pub use text_measure::{display_width, string_width, strip_markup, truncate_content, truncate_text};
