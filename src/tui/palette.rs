//! Colour pairs and style mapping.
//!
//! Identifier `i` in `1..=count` is foreground colour `i - 1` on the
//! terminal's default background. Identifier 0, and anything past `count`,
//! leaves the foreground at the terminal default.

use log::debug;
use ratatui::style::{Color, Modifier, Style};

use crate::core::style::{Attributes, ColorId, TextStyle};

/// Largest palette an indexed colour can address.
pub const MAX_COLORS: u16 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    count: u16,
}

impl Palette {
    pub fn new(count: u16) -> Self {
        Self {
            count: count.min(MAX_COLORS),
        }
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    /// Foreground colour for `id`, or `None` for the terminal default.
    pub fn resolve(&self, id: ColorId) -> Option<Color> {
        match id.0 {
            0 => None,
            n if n <= self.count => Some(Color::Indexed((n - 1) as u8)),
            _ => {
                debug!("{} outside palette of {} colours, using default", id, self.count);
                None
            }
        }
    }

    pub fn style(&self, attrs: Attributes) -> Style {
        let style = Style::default().add_modifier(modifiers(attrs.style));
        match self.resolve(attrs.color) {
            Some(color) => style.fg(color),
            None => style,
        }
    }
}

fn modifiers(style: TextStyle) -> Modifier {
    let mut modifier = Modifier::empty();
    if style.contains(TextStyle::BOLD) {
        modifier |= Modifier::BOLD;
    }
    if style.contains(TextStyle::UNDERLINE) {
        modifier |= Modifier::UNDERLINED;
    }
    if style.contains(TextStyle::STANDOUT) {
        modifier |= Modifier::REVERSED;
    }
    modifier
}
