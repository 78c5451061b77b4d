//! # Line Editor
//!
//! Editing model behind a blocking line read. The editor owns the in-progress
//! buffer; echoing to the screen is left to the caller, which receives an
//! [`Edit`] describing what changed.
//!
//! ## Key set
//!
//! - printable characters append to the line
//! - Backspace erases the last character, Ctrl+U erases the whole line
//! - Enter submits
//! - Ctrl+D on an empty line ends input; elsewhere it is ignored
//! - a closed stream ends input regardless of what was typed
//!
//! There is no cursor movement: text is always appended at the end.
//!
//! ## Capacity
//!
//! Capacity is counted in terminal columns so the echoed line always fits
//! its row. Characters that would exceed it are dropped.

use unicode_width::UnicodeWidthChar;

/// Input events understood by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEvent {
    Insert(char),
    /// Bracketed paste. Only the text before the first line break is used.
    Paste(String),
    Backspace,
    KillLine,
    Submit,
    /// End-of-input key (Ctrl+D).
    EndOfInput,
    /// The input stream is gone (closed, failed, or interrupted).
    Closed,
}

/// What an event did to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Text appended to the line; echo it.
    Inserted(String),
    /// This many columns were removed from the end of the line.
    Erased(u16),
    Unchanged,
    Submitted(String),
    Closed,
}

pub struct LineEditor {
    buffer: String,
    /// Columns used by `buffer`
    used: usize,
    capacity: usize,
}

impl LineEditor {
    /// Create an editor accepting at most `capacity` columns of text.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: String::new(),
            used: 0,
            capacity,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn apply(&mut self, event: EditEvent) -> Edit {
        match event {
            EditEvent::Insert(c) => {
                if self.push(c) {
                    Edit::Inserted(c.to_string())
                } else {
                    Edit::Unchanged
                }
            }
            EditEvent::Paste(text) => {
                let first_line = text.split(['\n', '\r']).next().unwrap_or_default();
                let mut inserted = String::new();
                for c in first_line.chars().filter(|c| !c.is_control()) {
                    if !self.push(c) {
                        break;
                    }
                    inserted.push(c);
                }
                if inserted.is_empty() {
                    Edit::Unchanged
                } else {
                    Edit::Inserted(inserted)
                }
            }
            EditEvent::Backspace => {
                if self.buffer.is_empty() {
                    return Edit::Unchanged;
                }
                // Combining marks go together with the character they sit on
                let mut width = 0;
                while let Some(c) = self.buffer.pop() {
                    width = char_width(c);
                    if width > 0 {
                        break;
                    }
                }
                self.used -= width;
                Edit::Erased(width as u16)
            }
            EditEvent::KillLine => {
                if self.buffer.is_empty() {
                    return Edit::Unchanged;
                }
                let width = self.used;
                self.buffer.clear();
                self.used = 0;
                Edit::Erased(width as u16)
            }
            EditEvent::Submit => {
                self.used = 0;
                Edit::Submitted(std::mem::take(&mut self.buffer))
            }
            EditEvent::EndOfInput if self.buffer.is_empty() => Edit::Closed,
            EditEvent::EndOfInput => Edit::Unchanged,
            EditEvent::Closed => Edit::Closed,
        }
    }

    /// Append `c` if it is printable and fits. Zero-width characters such
    /// as combining marks take no room. Returns whether it was taken.
    fn push(&mut self, c: char) -> bool {
        let width = char_width(c);
        if c.is_control() || self.used + width > self.capacity {
            return false;
        }
        self.buffer.push(c);
        self.used += width;
        true
    }
}

/// Columns occupied by `c`; control and zero-width characters count as 0.
fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}
