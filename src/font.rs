//! 5x7 bitmap font (uppercase A..Z) and text drawing on the ST7735.
//!
//! Each glyph is five column bytes; bit 0 of a column is the top row and
//! bit 6 the bottom. Characters advance six pixels (five columns plus one
//! blank spacing column). Anything outside A..Z draws nothing but still
//! takes its cell, so callers stick to uppercase ASCII.

use embedded_graphics::{pixelcolor::Rgb565, prelude::IntoStorage};
use embedded_hal::{digital::OutputPin, spi::SpiDevice};

use crate::st7735::{DriverError, St7735, St7735Error};

pub const GLYPH_WIDTH: u16 = 5;
pub const GLYPH_HEIGHT: u16 = 7;
/// Horizontal step between characters.
pub const CHAR_ADVANCE: u16 = 6;

// One opaque 6x7 cell, RGB565.
const CELL_BYTES: usize = (CHAR_ADVANCE * GLYPH_HEIGHT) as usize * 2;

static FONT_5X7: [[u8; 5]; 26] = [
    [0x7C, 0x12, 0x11, 0x12, 0x7C], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x09, 0x01], // F
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x26, 0x49, 0x49, 0x49, 0x32], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x07, 0x08, 0x70, 0x08, 0x07], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
];

/// Column bytes for `c`, if the font has it.
pub fn glyph(c: char) -> Option<&'static [u8; 5]> {
    if c.is_ascii_uppercase() {
        Some(&FONT_5X7[(c as u8 - b'A') as usize])
    } else {
        None
    }
}

// Column 5 (the spacing column) is never lit.
#[inline]
fn lit(columns: &[u8; 5], col: u16, row: u16) -> bool {
    col < GLYPH_WIDTH && (columns[col as usize] >> row) & 1 != 0
}

impl<SPI, DC, RST> St7735<SPI, DC, RST>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
{
    /// Draw the lit pixels of one glyph with its top-left at `(x, y)`.
    /// Background pixels are left untouched; pixels off the panel are clipped.
    pub fn draw_char(
        &mut self,
        c: char,
        x: u16,
        y: u16,
        color: Rgb565,
    ) -> Result<(), DriverError<SPI, DC>> {
        let Some(columns) = glyph(c) else {
            return Ok(());
        };
        for col in 0..GLYPH_WIDTH {
            for row in 0..GLYPH_HEIGHT {
                if !lit(columns, col, row) {
                    continue;
                }
                if let (Some(px), Some(py)) = (x.checked_add(col), y.checked_add(row)) {
                    self.draw_pixel(px, py, color)?;
                }
            }
        }
        Ok(())
    }

    /// Draw `text` left to right starting at `(x, y)`, one cell every
    /// [`CHAR_ADVANCE`] pixels, stopping once the cursor leaves the panel.
    ///
    /// With `background` set each cell is painted opaque (spacing column
    /// included) through a single window, which redraws changing text in
    /// place without a full-screen clear.
    pub fn draw_string(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        color: Rgb565,
        background: Option<Rgb565>,
    ) -> Result<(), DriverError<SPI, DC>> {
        let mut cursor = x;
        for c in text.chars() {
            if cursor >= self.width() {
                break;
            }
            match background {
                Some(bg) => self.draw_cell(c, cursor, y, color, bg)?,
                None => self.draw_char(c, cursor, y, color)?,
            }
            cursor = match cursor.checked_add(CHAR_ADVANCE) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(())
    }

    fn draw_cell(
        &mut self,
        c: char,
        x: u16,
        y: u16,
        fg: Rgb565,
        bg: Rgb565,
    ) -> Result<(), DriverError<SPI, DC>> {
        let columns = glyph(c);
        let pick = |col, row| match columns {
            Some(g) if lit(g, col, row) => fg,
            _ => bg,
        };

        let fits = x as u32 + CHAR_ADVANCE as u32 <= self.width() as u32
            && y as u32 + GLYPH_HEIGHT as u32 <= self.height() as u32;
        if !fits {
            // Partially visible: per-pixel, clipped at the edge
            for row in 0..GLYPH_HEIGHT {
                for col in 0..CHAR_ADVANCE {
                    if let (Some(px), Some(py)) = (x.checked_add(col), y.checked_add(row)) {
                        self.draw_pixel(px, py, pick(col, row))?;
                    }
                }
            }
            return Ok(());
        }

        self.ensure_ready()?;
        let mut cell: heapless::Vec<u8, CELL_BYTES> = heapless::Vec::new();
        for row in 0..GLYPH_HEIGHT {
            for col in 0..CHAR_ADVANCE {
                cell.extend_from_slice(&pick(col, row).into_storage().to_be_bytes())
                    .map_err(|_| St7735Error::OutOfBounds)?;
            }
        }
        self.set_addr_window(x, y, x + CHAR_ADVANCE - 1, y + GLYPH_HEIGHT - 1)?;
        self.send_data(&cell)
    }
}
