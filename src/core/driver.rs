//! # Platform Driver
//!
//! The character-grid capability `Display` is built on. A driver owns one
//! backing surface and hands out [`RegionId`] handles for rectangular
//! regions of it; sub-regions share their parent's cells.
//!
//! Implementations decide how the surface reaches a screen. The contract
//! `Display` depends on:
//!
//! - writes to an immediate-refresh region are visible when the call returns
//! - an auto-scroll region scrolls its content up instead of overflowing
//! - the terminal cursor sits in the region written to (or cleared) last
//! - a tab advances to the next multiple of [`TAB_STOP`]; other C0 control
//!   characters and DEL are shown in caret notation (`^A`, `^?`)

use std::time::Duration;

use crate::core::editor::{Edit, EditEvent, LineEditor};
use crate::core::error::DisplayError;
use crate::core::style::Attributes;

/// Columns between tab stops.
pub const TAB_STOP: u16 = 8;

/// Handle to a region created by a [`Driver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(pub(crate) usize);

pub trait Driver {
    /// Number of foreground colours the platform supports.
    fn color_count(&self) -> u16;

    /// Map `count` foreground colours on the default background to
    /// identifiers `1..=count`.
    fn define_palette(&mut self, count: u16);

    /// Screen size as `(rows, cols)`.
    fn dimensions(&self) -> (u16, u16);

    fn create_region(
        &mut self,
        rows: u16,
        cols: u16,
        origin_row: u16,
        origin_col: u16,
    ) -> Result<RegionId, DisplayError>;

    /// Create a region sharing `parent`'s cells. The origin is in screen
    /// coordinates and the region must lie inside the parent.
    fn create_sub_region(
        &mut self,
        parent: RegionId,
        rows: u16,
        cols: u16,
        origin_row: u16,
        origin_col: u16,
    ) -> Result<RegionId, DisplayError>;

    fn set_immediate_refresh(&mut self, region: RegionId, enabled: bool);

    fn set_auto_scroll(&mut self, region: RegionId, enabled: bool);

    /// Write `text` at the region's cursor. An empty write still moves the
    /// terminal cursor into the region.
    fn write_text(&mut self, region: RegionId, text: &str, attrs: Attributes);

    /// Move the region's cursor back `cols` cells, blanking them.
    fn erase_back(&mut self, region: RegionId, cols: u16);

    fn clear_region(&mut self, region: RegionId);

    fn draw_horizontal_line(&mut self, region: RegionId, row: u16, col: u16, len: u16);

    /// Wait for the next input event. `None` blocks until one arrives;
    /// `Some(timeout)` returns `Ok(None)` when nothing arrived in time.
    fn poll_event(&mut self, timeout: Option<Duration>) -> Result<Option<EditEvent>, DisplayError>;

    /// Read one line into `region`, echoing as the user types.
    ///
    /// `idle` runs after every poll, with `tick` bounding how long a poll
    /// may wait. Returns the submitted text without a line terminator.
    fn read_line(
        &mut self,
        region: RegionId,
        max_len: usize,
        tick: Option<Duration>,
        idle: &mut dyn FnMut(&mut Self),
    ) -> Result<String, DisplayError>
    where
        Self: Sized,
    {
        let mut editor = LineEditor::new(max_len);
        loop {
            if let Some(event) = self.poll_event(tick)? {
                match editor.apply(event) {
                    Edit::Inserted(text) => self.write_text(region, &text, Attributes::NORMAL),
                    Edit::Erased(cols) => self.erase_back(region, cols),
                    Edit::Unchanged => {}
                    Edit::Submitted(line) => return Ok(line),
                    Edit::Closed => return Err(DisplayError::InputClosed),
                }
            }
            idle(self);
        }
    }
}
