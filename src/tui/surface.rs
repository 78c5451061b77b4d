//! # Surface
//!
//! The backing character grid: one ratatui `Buffer` covering the screen plus
//! the regions carved out of it. Regions are views; a sub-region writes
//! straight into its parent's cells.
//!
//! ## Write semantics
//!
//! Text is placed one character at a time at the region's cursor, the way a
//! classic curses window does it:
//!
//! | Input            | Effect                                             |
//! |------------------|----------------------------------------------------|
//! | `\n`             | blank the rest of the row, move to the next row    |
//! | `\r`             | back to column 0                                   |
//! | `\t`             | advance to the next multiple of 8                  |
//! | `\x08`           | one column left                                    |
//! | other C0, DEL    | caret notation (`^A`, `^?`)                        |
//! | wide character   | two cells, wrapped as a unit                       |
//! | zero-width       | joined onto the previous cell                      |
//!
//! Running off the last column wraps. Running off the last row scrolls the
//! region when auto-scroll is on, otherwise the cursor parks on the last
//! cell and later text overwrites it.

use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthChar;

use crate::core::driver::{RegionId, TAB_STOP};

#[derive(Debug, Clone)]
struct Region {
    /// Absolute screen rectangle
    area: Rect,
    /// Cursor relative to `area`: (col, row)
    cursor: (u16, u16),
    /// Cells under a cursor parked on the last cell of a full region
    parked: u16,
    immediate: bool,
    scroll: bool,
}

impl Region {
    fn new(area: Rect) -> Self {
        Self {
            area,
            cursor: (0, 0),
            parked: 0,
            immediate: false,
            scroll: false,
        }
    }
}

pub struct Surface {
    buffer: Buffer,
    regions: Vec<Region>,
    /// Region touched last; the terminal cursor is drawn there.
    focus: Option<RegionId>,
}

impl Surface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            regions: Vec::new(),
            focus: None,
        }
    }

    pub fn area(&self) -> Rect {
        self.buffer.area
    }

    /// Add a region at an absolute position. Returns `None` if it is empty or
    /// does not fit inside `bounds`.
    pub fn add_region(&mut self, area: Rect, bounds: Rect) -> Option<RegionId> {
        if area.is_empty() || bounds.intersection(area) != area {
            return None;
        }
        self.regions.push(Region::new(area));
        Some(RegionId(self.regions.len() - 1))
    }

    pub fn region_area(&self, id: RegionId) -> Option<Rect> {
        self.regions.get(id.0).map(|r| r.area)
    }

    pub fn set_immediate(&mut self, id: RegionId, enabled: bool) {
        if let Some(region) = self.regions.get_mut(id.0) {
            region.immediate = enabled;
        }
    }

    pub fn set_scroll(&mut self, id: RegionId, enabled: bool) {
        if let Some(region) = self.regions.get_mut(id.0) {
            region.scroll = enabled;
        }
    }

    pub fn is_immediate(&self, id: RegionId) -> bool {
        self.regions.get(id.0).is_some_and(|r| r.immediate)
    }

    pub fn focus(&self) -> Option<RegionId> {
        self.focus
    }

    /// Cursor of `id`, relative to the region: (col, row).
    pub fn region_cursor(&self, id: RegionId) -> Option<(u16, u16)> {
        self.regions.get(id.0).map(|r| r.cursor)
    }

    /// Absolute screen position of the focused region's cursor.
    pub fn cursor_position(&self) -> Option<Position> {
        let region = self.regions.get(self.focus?.0)?;
        let (col, row) = region.cursor;
        Some(Position::new(region.area.x + col, region.area.y + row))
    }

    pub fn write(&mut self, id: RegionId, text: &str, style: Style) {
        let Some(mut region) = self.regions.get(id.0).cloned() else {
            return;
        };
        for c in text.chars() {
            self.put_char(&mut region, c, style);
        }
        self.regions[id.0] = region;
        self.focus = Some(id);
    }

    pub fn erase_back(&mut self, id: RegionId, cols: u16) {
        let Some(region) = self.regions.get_mut(id.0) else {
            return;
        };
        let width = usize::from(region.area.width);
        let (col, row) = region.cursor;
        let end = usize::from(row) * width + usize::from(col) + usize::from(region.parked);
        let start = end.saturating_sub(usize::from(cols));
        region.cursor = ((start % width) as u16, (start / width) as u16);
        region.parked = 0;
        let area = region.area;
        for offset in start..end {
            let x = area.x + (offset % width) as u16;
            let y = area.y + (offset / width) as u16;
            if let Some(cell) = self.buffer.cell_mut((x, y)) {
                cell.reset();
            }
        }
        self.focus = Some(id);
    }

    pub fn clear(&mut self, id: RegionId) {
        let Some(region) = self.regions.get_mut(id.0) else {
            return;
        };
        region.cursor = (0, 0);
        region.parked = 0;
        let area = region.area;
        for y in area.top()..area.bottom() {
            self.blank_row(area, y, area.x);
        }
        self.focus = Some(id);
    }

    /// Draw `len` copies of `symbol` starting at (`row`, `col`) relative to the
    /// region, clipped to it. The region's cursor does not move.
    pub fn hline(&mut self, id: RegionId, row: u16, col: u16, len: u16, symbol: char) {
        let Some(area) = self.region_area(id) else {
            return;
        };
        if row >= area.height {
            return;
        }
        let mut buf = [0u8; 4];
        let symbol = symbol.encode_utf8(&mut buf);
        let y = area.y + row;
        let end = area.x.saturating_add(col.saturating_add(len)).min(area.right());
        for x in (area.x + col.min(area.width))..end {
            if let Some(cell) = self.buffer.cell_mut((x, y)) {
                cell.reset();
                cell.set_symbol(symbol);
            }
        }
    }

    /// Text of one region row, trailing blanks trimmed.
    pub fn row_text(&self, id: RegionId, row: u16) -> String {
        let Some(area) = self.region_area(id) else {
            return String::new();
        };
        if row >= area.height {
            return String::new();
        }
        let text: String = (area.left()..area.right())
            .filter_map(|x| self.buffer.cell((x, area.y + row)))
            .map(Cell::symbol)
            .collect();
        text.trim_end().to_string()
    }

    /// All rows of a region, trailing blanks trimmed.
    pub fn region_text(&self, id: RegionId) -> Vec<String> {
        let rows = self.region_area(id).map_or(0, |a| a.height);
        (0..rows).map(|row| self.row_text(id, row)).collect()
    }

    /// Cell at a position relative to the region.
    pub fn cell(&self, id: RegionId, col: u16, row: u16) -> Option<&Cell> {
        let area = self.region_area(id)?;
        if col >= area.width || row >= area.height {
            return None;
        }
        self.buffer.cell((area.x + col, area.y + row))
    }

    fn put_char(&mut self, region: &mut Region, c: char, style: Style) {
        if c.is_control() || c.width() != Some(0) {
            region.parked = 0;
        }
        match c {
            '\n' => {
                let (col, row) = region.cursor;
                self.blank_row(region.area, region.area.y + row, region.area.x + col);
                self.next_line(region);
            }
            '\r' => region.cursor.0 = 0,
            '\t' => {
                let spaces = TAB_STOP - region.cursor.0 % TAB_STOP;
                for _ in 0..spaces {
                    self.put_char(region, ' ', style);
                    if region.cursor.0 == 0 {
                        break;
                    }
                }
            }
            '\u{8}' => region.cursor.0 = region.cursor.0.saturating_sub(1),
            c if c.is_ascii_control() => {
                let shown = if c == '\u{7f}' { '?' } else { (c as u8 + b'@') as char };
                self.put_char(region, '^', style);
                self.put_char(region, shown, style);
            }
            c if c.is_control() => {}
            c => self.put_printable(region, c, style),
        }
    }

    fn put_printable(&mut self, region: &mut Region, c: char, style: Style) {
        let width = c.width().unwrap_or(0) as u16;
        let area = region.area;

        if width == 0 {
            let (col, row) = region.cursor;
            // A parked cursor sits on the last character rather than after it
            let base = if region.parked > 0 { Some(col) } else { col.checked_sub(1) };
            if let Some(base) = base
                && let Some(cell) = self.buffer.cell_mut((area.x + base, area.y + row))
            {
                let joined = format!("{}{}", cell.symbol(), c);
                cell.set_symbol(&joined);
            }
            return;
        }
        if width > area.width {
            return;
        }

        // Wide characters never straddle the right edge
        if region.cursor.0 + width > area.width {
            let (col, row) = region.cursor;
            self.blank_row(area, area.y + row, area.x + col);
            if !self.next_line(region) {
                return;
            }
        }

        let (col, row) = region.cursor;
        let (x, y) = (area.x + col, area.y + row);
        let mut buf = [0u8; 4];
        if let Some(cell) = self.buffer.cell_mut((x, y)) {
            cell.reset();
            cell.set_symbol(c.encode_utf8(&mut buf)).set_style(style);
        }
        for trailing in 1..width {
            if let Some(cell) = self.buffer.cell_mut((x + trailing, y)) {
                cell.reset();
            }
        }

        region.cursor.0 += width;
        if region.cursor.0 >= area.width && !self.next_line(region) {
            region.cursor.0 = area.width - width;
            region.parked = width;
        }
    }

    /// Move to the start of the next row, scrolling if allowed.
    /// Returns false (cursor unmoved) at the bottom of a non-scrolling region.
    fn next_line(&mut self, region: &mut Region) -> bool {
        if region.cursor.1 + 1 < region.area.height {
            region.cursor = (0, region.cursor.1 + 1);
            true
        } else if region.scroll {
            self.scroll_up(region.area);
            region.cursor.0 = 0;
            true
        } else {
            false
        }
    }

    fn scroll_up(&mut self, area: Rect) {
        for y in area.top()..area.bottom().saturating_sub(1) {
            for x in area.left()..area.right() {
                let below = self.buffer[(x, y + 1)].clone();
                self.buffer[(x, y)] = below;
            }
        }
        self.blank_row(area, area.bottom() - 1, area.x);
    }

    /// Reset cells of row `y` from column `from_x` to the region's right edge.
    fn blank_row(&mut self, area: Rect, y: u16, from_x: u16) {
        for x in from_x..area.right() {
            if let Some(cell) = self.buffer.cell_mut((x, y)) {
                cell.reset();
            }
        }
    }
}

impl Widget for &Surface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let visible = area.intersection(self.buffer.area);
        for y in visible.top()..visible.bottom() {
            for x in visible.left()..visible.right() {
                if let (Some(src), Some(dst)) = (self.buffer.cell((x, y)), buf.cell_mut((x, y))) {
                    *dst = src.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;

    fn surface_with_region(width: u16, height: u16, scroll: bool) -> (Surface, RegionId) {
        let mut surface = Surface::new(width, height);
        let area = surface.area();
        let id = surface.add_region(area, area).unwrap();
        surface.set_scroll(id, scroll);
        (surface, id)
    }

    #[test]
    fn test_write_places_text_and_moves_cursor() {
        let (mut surface, id) = surface_with_region(10, 3, false);
        surface.write(id, "hi", Style::default());
        assert_eq!(surface.row_text(id, 0), "hi");
        assert_eq!(surface.region_cursor(id), Some((2, 0)));
        assert_eq!(surface.focus(), Some(id));
    }

    #[test]
    fn test_newline_moves_to_next_row() {
        let (mut surface, id) = surface_with_region(10, 3, false);
        surface.write(id, "ab\ncd", Style::default());
        assert_eq!(surface.region_text(id), ["ab", "cd", ""]);
        assert_eq!(surface.region_cursor(id), Some((2, 1)));
    }

    #[test]
    fn test_newline_blanks_rest_of_row() {
        let (mut surface, id) = surface_with_region(10, 2, false);
        surface.write(id, "abcdef", Style::default());
        surface.write(id, "\rxy\n", Style::default());
        assert_eq!(surface.row_text(id, 0), "xy");
    }

    #[test]
    fn test_long_text_wraps() {
        let (mut surface, id) = surface_with_region(4, 3, false);
        surface.write(id, "abcdef", Style::default());
        assert_eq!(surface.region_text(id), ["abcd", "ef", ""]);
    }

    #[test]
    fn test_scrolling_region_drops_oldest_rows() {
        let (mut surface, id) = surface_with_region(8, 3, true);
        for line in ["one", "two", "three", "four"] {
            surface.write(id, &format!("{line}\n"), Style::default());
        }
        // The cursor sits on a fresh bottom row after each newline
        assert_eq!(surface.region_text(id), ["three", "four", ""]);
        assert_eq!(surface.region_cursor(id), Some((0, 2)));
    }

    #[test]
    fn test_non_scrolling_region_parks_cursor() {
        let (mut surface, id) = surface_with_region(3, 1, false);
        surface.write(id, "abcde", Style::default());
        assert_eq!(surface.row_text(id, 0), "abe");
        assert_eq!(surface.region_cursor(id), Some((2, 0)));
    }

    #[test]
    fn test_erase_back_from_parked_cursor() {
        let (mut surface, id) = surface_with_region(3, 1, false);
        surface.write(id, "abc", Style::default());
        assert_eq!(surface.region_cursor(id), Some((2, 0)));
        surface.erase_back(id, 1);
        assert_eq!(surface.row_text(id, 0), "ab");
        assert_eq!(surface.region_cursor(id), Some((2, 0)));
    }

    #[test]
    fn test_zero_width_joins_parked_cell() {
        let (mut surface, id) = surface_with_region(3, 1, false);
        surface.write(id, "abe", Style::default());
        surface.write(id, "\u{301}", Style::default());
        assert_eq!(surface.row_text(id, 0), "abe\u{301}");

        // Erasing the parked cell takes the mark with it
        surface.erase_back(id, 1);
        assert_eq!(surface.row_text(id, 0), "ab");
    }

    #[test]
    fn test_tab_advances_to_tab_stop() {
        let (mut surface, id) = surface_with_region(20, 1, false);
        surface.write(id, "ab\tc", Style::default());
        assert_eq!(surface.row_text(id, 0), "ab      c");
        assert_eq!(surface.region_cursor(id), Some((9, 0)));
    }

    #[test]
    fn test_control_characters_use_caret_notation() {
        let (mut surface, id) = surface_with_region(10, 1, false);
        surface.write(id, "a\u{1}b\u{7f}", Style::default());
        assert_eq!(surface.row_text(id, 0), "a^Ab^?");
    }

    #[test]
    fn test_backspace_moves_left() {
        let (mut surface, id) = surface_with_region(10, 1, false);
        surface.write(id, "abc\u{8}X", Style::default());
        assert_eq!(surface.row_text(id, 0), "abX");
    }

    #[test]
    fn test_wide_character_wraps_as_unit() {
        let (mut surface, id) = surface_with_region(3, 2, false);
        surface.write(id, "ab中", Style::default());
        assert_eq!(surface.row_text(id, 0), "ab");
        assert_eq!(surface.cell(id, 0, 1).map(Cell::symbol), Some("中"));
        assert_eq!(surface.region_cursor(id), Some((2, 1)));
    }

    #[test]
    fn test_zero_width_joins_previous_cell() {
        let (mut surface, id) = surface_with_region(5, 1, false);
        surface.write(id, "e\u{301}x", Style::default());
        assert_eq!(surface.cell(id, 0, 0).map(Cell::symbol), Some("e\u{301}"));
        assert_eq!(surface.cell(id, 1, 0).map(Cell::symbol), Some("x"));
    }

    #[test]
    fn test_style_is_applied_per_cell() {
        let (mut surface, id) = surface_with_region(10, 1, false);
        let bold = Style::default().add_modifier(Modifier::BOLD);
        surface.write(id, "a", bold);
        surface.write(id, "b", Style::default());
        assert!(surface.cell(id, 0, 0).unwrap().modifier.contains(Modifier::BOLD));
        assert!(!surface.cell(id, 1, 0).unwrap().modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_erase_back_blanks_cells() {
        let (mut surface, id) = surface_with_region(10, 1, false);
        surface.write(id, "hello", Style::default());
        surface.erase_back(id, 2);
        assert_eq!(surface.row_text(id, 0), "hel");
        assert_eq!(surface.region_cursor(id), Some((3, 0)));
        surface.erase_back(id, 10);
        assert_eq!(surface.region_cursor(id), Some((0, 0)));
    }

    #[test]
    fn test_sub_regions_share_cells() {
        let mut surface = Surface::new(10, 4);
        let screen = surface.area();
        let main = surface.add_region(screen, screen).unwrap();
        let bottom = surface
            .add_region(Rect::new(0, 3, 10, 1), screen)
            .unwrap();
        surface.write(bottom, "input", Style::default());
        assert_eq!(surface.row_text(main, 3), "input");
        assert_eq!(surface.cursor_position(), Some(Position::new(5, 3)));
    }

    #[test]
    fn test_region_outside_bounds_is_rejected() {
        let mut surface = Surface::new(10, 4);
        let screen = surface.area();
        assert!(surface.add_region(Rect::new(0, 3, 10, 2), screen).is_none());
        assert!(surface.add_region(Rect::new(0, 0, 0, 1), screen).is_none());
    }

    #[test]
    fn test_clear_only_touches_region() {
        let mut surface = Surface::new(10, 3);
        let screen = surface.area();
        let top = surface.add_region(Rect::new(0, 0, 10, 2), screen).unwrap();
        let bottom = surface.add_region(Rect::new(0, 2, 10, 1), screen).unwrap();
        surface.write(top, "log", Style::default());
        surface.write(bottom, "typed", Style::default());
        surface.clear(top);
        assert_eq!(surface.region_text(top), ["", ""]);
        assert_eq!(surface.row_text(bottom, 0), "typed");
        assert_eq!(surface.focus(), Some(top));
    }

    #[test]
    fn test_hline_does_not_move_cursor() {
        let (mut surface, id) = surface_with_region(5, 3, false);
        surface.hline(id, 1, 0, 5, '─');
        assert_eq!(surface.row_text(id, 1), "─────");
        assert_eq!(surface.region_cursor(id), Some((0, 0)));
    }

    #[test]
    fn test_render_copies_into_frame_buffer() {
        let (mut surface, id) = surface_with_region(6, 2, false);
        surface.write(id, "frame", Style::default());
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 2));
        (&surface).render(buf.area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "f");
        assert_eq!(buf[(4, 0)].symbol(), "e");
    }
}
