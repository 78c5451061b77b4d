use std::fmt;

/// Errors surfaced by [`Display`](crate::core::display::Display) operations.
///
/// Nothing here is retried internally; the host decides what a failure means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// The platform display driver could not be brought up, or the terminal
    /// is too small to hold a log row, the divider and the input row.
    DriverInit(String),
    /// Input ended (end-of-input key, interrupt, or a closed stream) before a
    /// line was submitted.
    InputClosed,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::DriverInit(msg) => write!(f, "display driver init failed: {msg}"),
            DisplayError::InputClosed => write!(f, "input closed before a line was submitted"),
        }
    }
}

impl std::error::Error for DisplayError {}
