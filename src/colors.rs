//! Named RGB565 colors used by the reminder screens.
//!
//! RGB565 packs 5 bits red, 6 bits green, 5 bits blue into a `u16`; the panel
//! receives the high byte first.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

pub const COLOR_BLACK: Rgb565 = Rgb565::BLACK;
pub const COLOR_WHITE: Rgb565 = Rgb565::WHITE;
pub const COLOR_RED: Rgb565 = Rgb565::RED;
pub const COLOR_GREEN: Rgb565 = Rgb565::GREEN;
pub const COLOR_BLUE: Rgb565 = Rgb565::BLUE;
pub const COLOR_YELLOW: Rgb565 = Rgb565::YELLOW;
pub const COLOR_CYAN: Rgb565 = Rgb565::CYAN;

/// Dim gray for frames and dividers.
pub const COLOR_GRAY: Rgb565 = Rgb565::new(8, 16, 8);
