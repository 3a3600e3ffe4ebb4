//! State Module - Runtime state management systems
//!
//! The interactive systems every widget sits on:
//!
//! - **Events** - Per-element listeners, tri-state propagation, bubbling
//! - **Focus** - Focus transfer, child cycling, Tab order
//! - **Keyboard** - Event types, binding tables, dispatch
//! - **Mouse** - HitGrid, click detection
//! - **Input** - crossterm bridge and routing
//! - **Global keys** - Ctrl+C, Tab, Shift+Tab fallbacks

pub mod events;
pub mod focus;
pub mod global_keys;
pub mod input;
pub mod keyboard;
pub mod mouse;
