//! chatwin library exports

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

pub use crate::core::display::{Display, PrintOptions};
pub use crate::core::error::DisplayError;
pub use crate::core::outbox::{LogEntry, LogSender};
pub use crate::core::style::{ColorId, TextStyle};
