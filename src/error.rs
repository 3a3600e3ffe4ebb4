//! Error types for the widget toolkit.

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or driving widgets.
///
/// Key handling never produces these: an unbound key is declined and bubbles.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The element index was never allocated or has been released.
    #[error("element {0} is not allocated")]
    NotAllocated(usize),

    /// An option value that cannot be honored.
    #[error("invalid value for option '{option}': {message}")]
    InvalidOption { option: &'static str, message: String },

    /// Terminal I/O failure in the input bridge.
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid option error.
    pub fn invalid_option(option: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            message: message.into(),
        }
    }
}
