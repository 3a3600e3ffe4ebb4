//! Mount API - Terminal session lifecycle and the event loop.
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::pipeline::mount;
//!
//! let handle = mount::mount(true)?;
//!
//! // Option 1: Run blocking event loop
//! mount::run(&handle)?;
//!
//! // Option 2: Tick manually in your own loop
//! while mount::tick(&handle)? {
//!     // Your logic here
//! }
//!
//! handle.unmount();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::terminal;

use crate::error::Result;
use crate::state::{global_keys, input, mouse};

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by mount() that allows unmounting.
pub struct MountHandle {
    running: Arc<AtomicBool>,
    global_keys: Option<global_keys::GlobalKeysHandle>,
    mouse_enabled: bool,
    raw_mode: bool,
}

impl MountHandle {
    /// Stop, remove global keys and give the terminal back.
    pub fn unmount(mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.global_keys.take() {
            handle.cleanup();
        }
        self.restore_terminal();
    }

    /// Check if still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the loop (sets running to false).
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn restore_terminal(&mut self) {
        if self.mouse_enabled {
            if let Err(err) = input::set_mouse_capture(false) {
                tracing::warn!(target: "spark_widgets::mount", %err, "could not disable mouse capture");
            }
            self.mouse_enabled = false;
        }
        if self.raw_mode {
            if let Err(err) = terminal::disable_raw_mode() {
                tracing::warn!(target: "spark_widgets::mount", %err, "could not leave raw mode");
            }
            self.raw_mode = false;
        }
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.restore_terminal();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Put the terminal in raw mode and install the global keys
/// (Ctrl+C for shutdown, Tab/Shift+Tab for focus).
pub fn mount(with_mouse: bool) -> Result<MountHandle> {
    let (width, height) = terminal::size()?;
    mouse::resize_hit_grid(width, height);

    terminal::enable_raw_mode()?;
    let mut handle = MountHandle {
        running: Arc::new(AtomicBool::new(true)),
        global_keys: None,
        mouse_enabled: false,
        raw_mode: true,
    };

    if with_mouse {
        input::set_mouse_capture(true)?;
        handle.mouse_enabled = true;
    }

    handle.global_keys = Some(global_keys::setup_global_keys(handle.running.clone()));
    tracing::debug!(target: "spark_widgets::mount", width, height, with_mouse, "mounted");
    Ok(handle)
}

// =============================================================================
// Event Loop
// =============================================================================

/// Process at most one input event.
///
/// * `Ok(true)` - Continue running
/// * `Ok(false)` - Stop requested (Ctrl+C pressed or `handle.stop()` called)
/// * `Err(e)` - I/O error while polling
pub fn tick(handle: &MountHandle) -> Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    if let Some(event) = input::poll_event(Duration::from_millis(16))? {
        input::route_event(event);
    }

    Ok(handle.is_running())
}

/// Run the event loop until stopped.
pub fn run(handle: &MountHandle) -> Result<()> {
    while tick(handle)? {}
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_ends_ticking_without_polling() {
        let handle = MountHandle {
            running: Arc::new(AtomicBool::new(true)),
            global_keys: None,
            mouse_enabled: false,
            raw_mode: false,
        };

        assert!(handle.is_running());
        handle.stop();
        assert!(!tick(&handle).unwrap());
        handle.unmount();
    }
}
