//! Global Keys Module - Document-level keyboard fallbacks
//!
//! Keys that no focused element consumed end up here:
//! - Ctrl+C: Graceful shutdown
//! - Tab: Focus next tab stop
//! - Shift+Tab: Focus previous tab stop
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::state::global_keys;
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//!
//! let running = Arc::new(AtomicBool::new(true));
//! let handle = global_keys::setup_global_keys(running.clone());
//!
//! // Later, on teardown:
//! handle.cleanup();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::focus;
use super::keyboard;

// =============================================================================
// GLOBAL KEYS HANDLE
// =============================================================================

/// Cleanup handle for global key handlers
pub struct GlobalKeysHandle {
    cleanups: Vec<Box<dyn FnOnce()>>,
}

impl GlobalKeysHandle {
    /// Remove all global key handlers
    pub fn cleanup(self) {
        for cleanup in self.cleanups {
            cleanup();
        }
    }
}

// =============================================================================
// SETUP
// =============================================================================

/// Set up global key handlers.
///
/// # Arguments
/// * `running` - Atomic bool to set to false on Ctrl+C
pub fn setup_global_keys(running: Arc<AtomicBool>) -> GlobalKeysHandle {
    let ctrl_c = keyboard::on_key("Ctrl+c", move || {
        tracing::debug!(target: "spark_widgets::keys", "ctrl+c, stopping");
        running.store(false, Ordering::SeqCst);
        true
    });

    let tab = keyboard::on_key("Tab", || {
        focus::focus_next();
        true
    });

    let shift_tab = keyboard::on_key("Shift+Tab", || {
        focus::focus_previous();
        true
    });

    GlobalKeysHandle {
        cleanups: vec![Box::new(ctrl_c), Box::new(tab), Box::new(shift_tab)],
    }
}

// =============================================================================
// TESTS
// =============================================================================
