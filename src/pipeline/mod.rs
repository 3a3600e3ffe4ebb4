//! Pipeline
//!
//! What happens after state changes:
//!
//! ```text
//! widget state → arrays → draw(index) → generation signal → snapshot / terminal
//! ```
//!
//! - **draw** - synchronous redraw bookkeeping and hit rects
//! - **snapshot** - plain-text view of the arrays
//! - **mount** - terminal session and event loop

pub mod draw;
pub mod mount;
pub mod snapshot;

pub use draw::{draw, draw_count, generation, generation_signal, reset_draw_state};
pub use mount::{mount, run, tick, MountHandle};
pub use snapshot::snapshot;
