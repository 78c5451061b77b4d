//! # Log Outbox
//!
//! The single access point through which other threads get text onto the
//! log. Senders only queue; the flow that owns the `Display` writes the
//! queued lines, either from `Display::flush_pending` or while it waits in
//! `Display::ask`.
//!
//! ```text
//!  worker thread ──┐
//!  worker thread ──┼─ LogSender ──► mpsc ──► Display (owner flow) ──► LogRegion
//!  timer thread  ──┘
//! ```

use std::sync::mpsc::{self, Receiver, SendError, Sender};

use crate::core::style::{Attributes, ColorId, TextStyle};

/// One queued log line. A newline is appended when it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub attrs: Attributes,
}

impl LogEntry {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attrs: Attributes::NORMAL,
        }
    }

    pub fn styled(text: impl Into<String>, style: TextStyle, color: ColorId) -> Self {
        Self {
            text: text.into(),
            attrs: Attributes::new(style, color),
        }
    }
}

/// Cloneable, `Send` handle for queueing log lines from any thread.
#[derive(Debug, Clone)]
pub struct LogSender {
    tx: Sender<LogEntry>,
}

impl LogSender {
    /// Queue a line. Fails only once the owning `Display` is gone.
    pub fn send(&self, entry: LogEntry) -> Result<(), SendError<LogEntry>> {
        self.tx.send(entry)
    }

    pub fn send_text(&self, text: impl Into<String>) -> Result<(), SendError<LogEntry>> {
        self.send(LogEntry::plain(text))
    }
}

/// Receiving side, held by the `Display`.
pub(crate) struct Outbox {
    tx: Sender<LogEntry>,
    rx: Receiver<LogEntry>,
}

impl Outbox {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub(crate) fn sender(&self) -> LogSender {
        LogSender {
            tx: self.tx.clone(),
        }
    }

    /// Next queued entry, without blocking.
    pub(crate) fn next(&self) -> Option<LogEntry> {
        self.rx.try_recv().ok()
    }
}
