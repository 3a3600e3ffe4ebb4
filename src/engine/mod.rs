//! Widget Engine - Element registry and parallel arrays.
//!
//! The engine manages the core data structures:
//! - Registry: Index allocation, ID mapping, parent/child tree
//! - Arrays: Parallel per-index columns for element state
//!
//! # Architecture
//!
//! Elements are indices into parallel arrays plus a tree of parent links:
//!
//! ```text
//! Index 0: Document (parent=-,  focusable=false)
//! Index 1: Menu     (parent=0,  focusable=true)
//! Index 2: Button   (parent=1,  focusable=true, content="Todo")
//! ```
//!
//! Widgets hold the index (through a `Node`) and keep their own typed state;
//! focus, events and redraw only ever look at indices.

mod registry;
pub mod arrays;

pub use registry::*;
