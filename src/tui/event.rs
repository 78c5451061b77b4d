use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, warn};

use crate::core::editor::EditEvent;

/// Where a driver gets its input from.
pub trait EventSource {
    /// Next edit event. `None` blocks; `Some(timeout)` returns `Ok(None)` if
    /// nothing arrived in time. A failed or closed stream yields
    /// `EditEvent::Closed`.
    fn next_event(&mut self, timeout: Option<Duration>) -> Option<EditEvent>;
}

/// Reads the real terminal through crossterm.
#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self, timeout: Option<Duration>) -> Option<EditEvent> {
        loop {
            if let Some(timeout) = timeout {
                match event::poll(timeout) {
                    Ok(true) => {}
                    Ok(false) => return None,
                    Err(e) => {
                        warn!("Input poll failed: {}", e);
                        return Some(EditEvent::Closed);
                    }
                }
            }
            match event::read() {
                Ok(event) => {
                    if let Some(edit) = map_event(event) {
                        return Some(edit);
                    }
                    // Ignored events only count against a timed poll once
                    if timeout.is_some() {
                        return None;
                    }
                }
                Err(e) => {
                    warn!("Input read failed: {}", e);
                    return Some(EditEvent::Closed);
                }
            }
        }
    }
}

/// Translate a crossterm event into an edit event, if it is one.
pub fn map_event(event: Event) -> Option<EditEvent> {
    match event {
        Event::Key(key_event) => map_key(key_event),
        Event::Paste(data) => Some(EditEvent::Paste(data)),
        // Fixed layout: resize, focus and mouse events are not handled
        _ => None,
    }
}

fn map_key(key_event: KeyEvent) -> Option<EditEvent> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code, key_event.modifiers
    );
    match (key_event.modifiers, key_event.code) {
        // Raw mode swallows SIGINT; treat Ctrl+C as the stream going away
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(EditEvent::Closed),
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => Some(EditEvent::EndOfInput),
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => Some(EditEvent::KillLine),
        // Ctrl+H is the ASCII backspace on some terminals
        (KeyModifiers::CONTROL, KeyCode::Char('h')) => Some(EditEvent::Backspace),
        (KeyModifiers::CONTROL, KeyCode::Char('j' | 'm')) => Some(EditEvent::Submit),
        (m, KeyCode::Char(_)) if m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => None,
        (_, KeyCode::Char(c)) => Some(EditEvent::Insert(c)),
        (_, KeyCode::Backspace) => Some(EditEvent::Backspace),
        (_, KeyCode::Enter) => Some(EditEvent::Submit),
        _ => None,
    }
}

/// A step of scripted input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Event(EditEvent),
    /// A poll that times out with nothing to report.
    Idle,
}

/// Pre-recorded input for headless displays and tests.
///
/// Once the script runs out the stream reports itself closed.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    steps: VecDeque<Step>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(mut self, event: EditEvent) -> Self {
        self.steps.push_back(Step::Event(event));
        self
    }

    /// Type each character of `text`.
    pub fn typed(mut self, text: &str) -> Self {
        self.steps
            .extend(text.chars().map(|c| Step::Event(EditEvent::Insert(c))));
        self
    }

    /// Type `text` and press Enter.
    pub fn line(self, text: &str) -> Self {
        self.typed(text).event(EditEvent::Submit)
    }

    pub fn idle(mut self) -> Self {
        self.steps.push_back(Step::Idle);
        self
    }

    pub fn is_exhausted(&self) -> bool {
        self.steps.is_empty()
    }
}

impl EventSource for ScriptedInput {
    fn next_event(&mut self, _timeout: Option<Duration>) -> Option<EditEvent> {
        match self.steps.pop_front() {
            Some(Step::Event(event)) => Some(event),
            Some(Step::Idle) => None,
            None => Some(EditEvent::Closed),
        }
    }
}
