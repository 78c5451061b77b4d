//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::display::Display;
use crate::tui::{DriverOptions, HeadlessDriver, ScriptedInput};

/// Creates a headless Display with an 8-colour palette.
pub fn test_display(width: u16, height: u16, input: ScriptedInput) -> Display<HeadlessDriver> {
    Display::headless_with(width, height, input, DriverOptions::default()).unwrap()
}

/// Log rows as currently held by the surface.
pub fn log_text(display: &Display<HeadlessDriver>) -> Vec<String> {
    display.driver().surface().region_text(display.log_region())
}

/// The single input row.
pub fn input_text(display: &Display<HeadlessDriver>) -> String {
    display.driver().surface().row_text(display.input_region(), 0)
}
