//! # TUI Adapter
//!
//! The ratatui-specific layer: implements the core `Driver` on top of any
//! ratatui `Backend`, keeping the character grid in memory (`Surface`) and
//! pushing it to the backend whenever an immediate-refresh region changes.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! Every write to an immediate-refresh region calls `Terminal::draw` with the
//! whole surface. ratatui diffs against the previous frame, so only changed
//! cells reach the terminal. The cursor is drawn at the cursor of the region
//! touched last, which is how focus moves between log and input.
//!
//! A `SteadyBar` cursor style is used because `set_cursor_position` resets
//! the terminal's blink timer on every `draw()` call, making blinking
//! cursors appear erratic while log lines stream in.

pub mod event;
pub mod palette;
pub mod surface;

use std::io::{IsTerminal, Stdout, stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use log::{debug, info, warn};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend, TestBackend};
use ratatui::layout::Rect;

use crate::core::config::{DEFAULT_DIVIDER, ResolvedConfig};
use crate::core::display::Display;
use crate::core::driver::{Driver, RegionId};
use crate::core::editor::EditEvent;
use crate::core::error::DisplayError;
use crate::core::style::Attributes;

pub use event::{CrosstermEvents, EventSource, ScriptedInput};
pub use palette::Palette;
pub use surface::Surface;

/// Colour count assumed when nothing else says otherwise.
pub const DEFAULT_COLORS: u16 = 8;

/// The driver behind a real terminal.
pub type CrosstermDriver = TerminalDriver<CrosstermBackend<Stdout>, CrosstermEvents>;
/// An off-screen driver fed by scripted input.
pub type HeadlessDriver = TerminalDriver<TestBackend, ScriptedInput>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    pub colors: u16,
    pub divider: char,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS,
            divider: DEFAULT_DIVIDER,
        }
    }
}

/// Set while a real terminal is driven; the terminal is process-wide state.
static TERMINAL_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Exclusive use of the process's terminal, released on drop.
struct TerminalClaim;

impl TerminalClaim {
    fn acquire() -> Result<Self, DisplayError> {
        TERMINAL_CLAIMED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self)
            .map_err(|_| {
                DisplayError::DriverInit(
                    "display driver already initialized in this process".to_string(),
                )
            })
    }
}

impl Drop for TerminalClaim {
    fn drop(&mut self) {
        TERMINAL_CLAIMED.store(false, Ordering::Release);
    }
}

struct TerminalModeGuard {
    // Released after the terminal is restored in `drop`
    _claim: TerminalClaim,
}

impl TerminalModeGuard {
    fn new() -> Result<Self, DisplayError> {
        if !stdout().is_terminal() {
            return Err(DisplayError::DriverInit(
                "stdout is not attached to a terminal".to_string(),
            ));
        }
        // From here on Drop releases the claim and restores the terminal
        let guard = Self {
            _claim: TerminalClaim::acquire()?,
        };
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,                      // Show cursor for input editing
            SetCursorStyle::SteadyBar  // Non-blinking: avoids blink timer reset from continuous redraws
        )
        .map_err(|e| DisplayError::DriverInit(format!("cannot set terminal modes: {e}")))?;
        info!("Terminal modes enabled (bracketed paste, steady bar cursor)");
        Ok(guard)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
        ratatui::restore();
        info!("Terminal restored");
    }
}

/// `Driver` over a ratatui backend and an input source.
pub struct TerminalDriver<B: Backend, E: EventSource> {
    terminal: Terminal<B>,
    events: E,
    surface: Surface,
    palette: Palette,
    colors: u16,
    divider: char,
    // Declared last so the terminal is restored after everything else drops
    _guard: Option<TerminalModeGuard>,
}

impl CrosstermDriver {
    /// Take over the process's terminal: raw mode, alternate screen,
    /// bracketed paste. Restored when the driver is dropped.
    pub fn init(colors: Option<u16>, divider: char) -> Result<Self, DisplayError> {
        let guard = TerminalModeGuard::new()?;
        let terminal = ratatui::try_init()
            .map_err(|e| DisplayError::DriverInit(format!("cannot enter raw mode: {e}")))?;
        let colors = colors.unwrap_or_else(crossterm::style::available_color_count);
        let mut driver = Self::new(terminal, CrosstermEvents, DriverOptions { colors, divider })?;
        driver._guard = Some(guard);
        info!("Display driver initialized ({} colours)", driver.colors);
        Ok(driver)
    }
}

impl HeadlessDriver {
    pub fn headless(
        width: u16,
        height: u16,
        input: ScriptedInput,
        options: DriverOptions,
    ) -> Result<Self, DisplayError> {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .map_err(|e| DisplayError::DriverInit(e.to_string()))?;
        Self::new(terminal, input, options)
    }
}

impl<B: Backend, E: EventSource> TerminalDriver<B, E> {
    pub fn new(terminal: Terminal<B>, events: E, options: DriverOptions) -> Result<Self, DisplayError> {
        let size = terminal
            .size()
            .map_err(|e| DisplayError::DriverInit(format!("cannot query terminal size: {e}")))?;
        debug!("Terminal size {}x{}", size.width, size.height);
        Ok(Self {
            terminal,
            events,
            surface: Surface::new(size.width, size.height),
            palette: Palette::default(),
            colors: options.colors.min(palette::MAX_COLORS),
            divider: options.divider,
            _guard: None,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    /// Push the surface to the backend if `region` refreshes immediately.
    fn refresh_if_immediate(&mut self, region: RegionId) {
        if self.surface.is_immediate(region) {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        let surface = &self.surface;
        let result = self.terminal.draw(|frame| {
            frame.render_widget(surface, frame.area());
            if let Some(position) = surface.cursor_position() {
                frame.set_cursor_position(position);
            }
        });
        if let Err(e) = result {
            warn!("Failed to draw display: {}", e);
        }
    }
}

impl<B: Backend, E: EventSource> Driver for TerminalDriver<B, E> {
    fn color_count(&self) -> u16 {
        self.colors
    }

    fn define_palette(&mut self, count: u16) {
        self.palette = Palette::new(count);
        debug!("Palette defined with {} colours", self.palette.count());
    }

    fn dimensions(&self) -> (u16, u16) {
        let area = self.surface.area();
        (area.height, area.width)
    }

    fn create_region(
        &mut self,
        rows: u16,
        cols: u16,
        origin_row: u16,
        origin_col: u16,
    ) -> Result<RegionId, DisplayError> {
        let area = Rect::new(origin_col, origin_row, cols, rows);
        let screen = self.surface.area();
        self.surface.add_region(area, screen).ok_or_else(|| {
            DisplayError::DriverInit(format!("region {area:?} does not fit the screen {screen:?}"))
        })
    }

    fn create_sub_region(
        &mut self,
        parent: RegionId,
        rows: u16,
        cols: u16,
        origin_row: u16,
        origin_col: u16,
    ) -> Result<RegionId, DisplayError> {
        let bounds = self
            .surface
            .region_area(parent)
            .ok_or_else(|| DisplayError::DriverInit(format!("unknown parent region {parent:?}")))?;
        let area = Rect::new(origin_col, origin_row, cols, rows);
        self.surface.add_region(area, bounds).ok_or_else(|| {
            DisplayError::DriverInit(format!("region {area:?} does not fit its parent {bounds:?}"))
        })
    }

    fn set_immediate_refresh(&mut self, region: RegionId, enabled: bool) {
        self.surface.set_immediate(region, enabled);
    }

    fn set_auto_scroll(&mut self, region: RegionId, enabled: bool) {
        self.surface.set_scroll(region, enabled);
    }

    fn write_text(&mut self, region: RegionId, text: &str, attrs: Attributes) {
        let style = self.palette.style(attrs);
        self.surface.write(region, text, style);
        self.refresh_if_immediate(region);
    }

    fn erase_back(&mut self, region: RegionId, cols: u16) {
        self.surface.erase_back(region, cols);
        self.refresh_if_immediate(region);
    }

    fn clear_region(&mut self, region: RegionId) {
        self.surface.clear(region);
        self.refresh_if_immediate(region);
    }

    fn draw_horizontal_line(&mut self, region: RegionId, row: u16, col: u16, len: u16) {
        self.surface.hline(region, row, col, len, self.divider);
        self.refresh_if_immediate(region);
    }

    fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Option<EditEvent>, DisplayError> {
        Ok(self.events.next_event(timeout))
    }
}

impl Display<CrosstermDriver> {
    /// Take over the terminal with built-in defaults.
    pub fn create() -> Result<Self, DisplayError> {
        Self::open(&ResolvedConfig::default())
    }

    /// Take over the terminal using resolved configuration.
    pub fn open(config: &ResolvedConfig) -> Result<Self, DisplayError> {
        let driver = CrosstermDriver::init(config.colors, config.divider)?;
        Ok(Self::with_driver(driver)?.with_poll_interval(config.poll_interval))
    }
}

impl Display<HeadlessDriver> {
    /// An off-screen display of `width` x `height` cells reading `input`.
    pub fn headless(width: u16, height: u16, input: ScriptedInput) -> Result<Self, DisplayError> {
        Self::headless_with(width, height, input, DriverOptions::default())
    }

    pub fn headless_with(
        width: u16,
        height: u16,
        input: ScriptedInput,
        options: DriverOptions,
    ) -> Result<Self, DisplayError> {
        Self::with_driver(HeadlessDriver::headless(width, height, input, options)?)
    }
}
