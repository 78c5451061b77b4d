//! # Text Attributes
//!
//! What a run of printed text looks like, independent of how any terminal
//! draws it. The TUI adapter maps these onto ratatui styles.
//!
//! ```text
//! Attributes
//! ├── style: TextStyle   // BOLD | UNDERLINE | STANDOUT, combinable
//! └── color: ColorId     // palette identifier, 0 = terminal default
//! ```

use std::fmt;

bitflags::bitflags! {
    /// Rendering traits applied to printed text.
    ///
    /// Combine with bitwise OR: `TextStyle::BOLD | TextStyle::UNDERLINE`.
    /// The empty set is [`TextStyle::NORMAL`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextStyle: u8 {
        const BOLD = 1 << 0;
        const UNDERLINE = 1 << 1;
        /// Emphasised text (inverted colours on most terminals).
        const STANDOUT = 1 << 2;
    }
}

impl TextStyle {
    pub const NORMAL: Self = Self::empty();
}

/// Palette identifier selecting a foreground colour.
///
/// `ColorId(0)` means "no colour pairing applied". Identifiers `1..=count`
/// select palette entries `0..count` against the default background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ColorId(pub u16);

impl ColorId {
    pub const DEFAULT: Self = ColorId(0);

    pub fn is_default(self) -> bool {
        self.0 == 0
    }
}

impl From<u16> for ColorId {
    fn from(id: u16) -> Self {
        ColorId(id)
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "color#{}", self.0)
    }
}

/// Style and colour carried by every character of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attributes {
    pub style: TextStyle,
    pub color: ColorId,
}

impl Attributes {
    pub const NORMAL: Self = Attributes {
        style: TextStyle::NORMAL,
        color: ColorId::DEFAULT,
    };

    pub fn new(style: TextStyle, color: ColorId) -> Self {
        Self { style, color }
    }

    pub fn styled(style: TextStyle) -> Self {
        Self {
            style,
            color: ColorId::DEFAULT,
        }
    }
}
