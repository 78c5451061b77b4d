//! # Display
//!
//! Splits the screen into a scrolling log and a one-row input box:
//!
//! ```text
//! row 0          ┌──────────────────────────────┐
//!                │ LogRegion                    │  auto-scroll, immediate
//!                │ (height - 2 rows)            │
//! row height-2   ├──────────────────────────────┤  divider, drawn once
//! row height-1   │ InputRegion (1 row)          │  immediate
//!                └──────────────────────────────┘
//! ```
//!
//! `print` appends to the log, `ask` reads a line from the input box.
//! Every log write ends by writing nothing to the input box, which moves
//! the terminal cursor back there so whatever the user is typing stays
//! visibly active.
//!
//! A `Display` has a single owner. Other threads reach the log through a
//! [`LogSender`]; the owner writes what they queued (see [`crate::core::outbox`]).

use std::fmt;
use std::time::Duration;

use log::debug;
use unicode_width::UnicodeWidthChar;

use crate::core::driver::{Driver, RegionId, TAB_STOP};
use crate::core::error::DisplayError;
use crate::core::outbox::{LogEntry, LogSender, Outbox};
use crate::core::style::{Attributes, ColorId, TextStyle};

/// Log row + divider row + input row.
pub const MIN_HEIGHT: u16 = 3;
pub const MIN_WIDTH: u16 = 1;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How `print` joins and decorates its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    pub separator: String,
    pub terminator: String,
    pub style: TextStyle,
    pub color: ColorId,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            terminator: "\n".to_string(),
            style: TextStyle::NORMAL,
            color: ColorId::DEFAULT,
        }
    }
}

impl PrintOptions {
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn terminator(mut self, terminator: impl Into<String>) -> Self {
        self.terminator = terminator.into();
        self
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    pub fn color(mut self, color: impl Into<ColorId>) -> Self {
        self.color = color.into();
        self
    }

    fn attrs(&self) -> Attributes {
        Attributes::new(self.style, self.color)
    }
}

pub struct Display<D: Driver> {
    driver: D,
    height: u16,
    width: u16,
    color_count: u16,
    log: RegionId,
    input: RegionId,
    /// Created on the first `log_sender` call
    outbox: Option<Outbox>,
    poll_interval: Duration,
}

impl<D: Driver> Display<D> {
    /// Lay out the log, divider and input regions on `driver`'s surface.
    pub fn with_driver(mut driver: D) -> Result<Self, DisplayError> {
        let (height, width) = driver.dimensions();
        if height < MIN_HEIGHT || width < MIN_WIDTH {
            return Err(DisplayError::DriverInit(format!(
                "terminal is {width}x{height}, need at least {MIN_WIDTH}x{MIN_HEIGHT}"
            )));
        }

        let color_count = driver.color_count();
        driver.define_palette(color_count);

        let main = driver.create_region(height, width, 0, 0)?;
        driver.set_immediate_refresh(main, true);
        driver.draw_horizontal_line(main, height - 2, 0, width);

        let log = driver.create_sub_region(main, height - 2, width, 0, 0)?;
        driver.set_immediate_refresh(log, true);
        driver.set_auto_scroll(log, true);

        let input = driver.create_sub_region(main, 1, width, height - 1, 0)?;
        driver.set_immediate_refresh(input, true);

        debug!(
            "Display created: {}x{}, {} log rows, {} colours",
            width,
            height,
            height - 2,
            color_count
        );

        Ok(Self {
            driver,
            height,
            width,
            color_count,
            log,
            input,
            outbox: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// How long `ask` waits for a key before writing queued log lines.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn color_count(&self) -> u16 {
        self.color_count
    }

    pub fn log_region(&self) -> RegionId {
        self.log
    }

    pub fn input_region(&self) -> RegionId {
        self.input
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Append `items` to the log, joined by the separator and followed by
    /// the terminator. An empty `items` writes nothing. Either way the
    /// cursor ends up back in the input box.
    pub fn print<I>(&mut self, items: I, options: &PrintOptions)
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        let parts: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
        let mut text = parts.join(&options.separator);
        if !parts.is_empty() {
            text.push_str(&options.terminator);
        }
        write_log(&mut self.driver, self.log, self.input, &text, options.attrs());
    }

    /// Print one item with the default separator and terminator.
    pub fn println(&mut self, item: impl fmt::Display) {
        self.print([item], &PrintOptions::default());
    }

    /// Erase the log. The input box and divider are untouched.
    pub fn clear(&mut self) {
        self.driver.clear_region(self.log);
    }

    /// Clear the input box, show `prompt` in bold and block until the user
    /// submits a line. Queued log lines are written while waiting.
    ///
    /// The prompt is measured as drawn: tabs expand to the next tab stop and
    /// control characters take two columns in caret notation. A prompt wider
    /// than `width - 1` columns is cut down so at least one column is left
    /// for input.
    pub fn ask(&mut self, prompt: &str) -> Result<String, DisplayError> {
        self.flush_pending();

        let max_prompt = usize::from(self.width) - 1;
        let (prompt, prompt_cols) = fit_prompt(prompt, max_prompt);
        let max_len = usize::from(self.width) - prompt_cols;

        self.driver.clear_region(self.input);
        self.driver
            .write_text(self.input, &prompt, Attributes::styled(TextStyle::BOLD));

        let Self {
            driver,
            log,
            input,
            outbox,
            poll_interval,
            ..
        } = self;
        let tick = outbox.as_ref().map(|_| *poll_interval);
        driver.read_line(*input, max_len, tick, &mut |driver: &mut D| {
            if let Some(outbox) = outbox.as_ref() {
                drain(driver, *log, *input, outbox);
            }
        })
    }

    /// Handle for queueing log lines from other threads.
    pub fn log_sender(&mut self) -> LogSender {
        self.outbox.get_or_insert_with(Outbox::new).sender()
    }

    /// Write every queued log line now.
    pub fn flush_pending(&mut self) {
        if let Some(outbox) = self.outbox.as_ref() {
            drain(&mut self.driver, self.log, self.input, outbox);
        }
    }
}

/// Write `text` to the log, then hand the cursor back to the input box.
fn write_log<D: Driver>(driver: &mut D, log: RegionId, input: RegionId, text: &str, attrs: Attributes) {
    if !text.is_empty() {
        driver.write_text(log, text, attrs);
    }
    driver.write_text(input, "", Attributes::NORMAL);
}

fn drain<D: Driver>(driver: &mut D, log: RegionId, input: RegionId, outbox: &Outbox) {
    while let Some(LogEntry { mut text, attrs }) = outbox.next() {
        text.push('\n');
        write_log(driver, log, input, &text, attrs);
    }
}

/// Spell `prompt` out the way the input row draws it, cut to at most
/// `max_cols` columns. Returns the text to write and its width.
fn fit_prompt(prompt: &str, max_cols: usize) -> (String, usize) {
    let mut shown = String::new();
    let mut cols = 0;
    for c in prompt.chars() {
        let piece = match c {
            '\t' => " ".repeat(usize::from(TAB_STOP) - cols % usize::from(TAB_STOP)),
            '\u{7f}' => "^?".to_string(),
            c if c.is_ascii_control() => format!("^{}", (c as u8 + b'@') as char),
            c if c.is_control() => continue,
            c => c.to_string(),
        };
        let width: usize = piece.chars().map(|c| c.width().unwrap_or(0)).sum();
        if cols + width > max_cols {
            debug!("Prompt truncated to {} columns", cols);
            break;
        }
        shown.push_str(&piece);
        cols += width;
    }
    (shown, cols)
}
