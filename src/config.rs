//! Panel configuration: geometry, frame-buffer offsets, orientation and bus speed.
//!
//! One driver serves every 128x160 module batch; what differs between them
//! (offsets, MADCTL value, clock) lives here instead of in copies of the driver.
//! Pin assignments are board wiring and live in `wiring.rs`.

/// Panel width in the default portrait orientation.
pub const TFT_WIDTH: u16 = 128;
/// Panel height in the default portrait orientation.
pub const TFT_HEIGHT: u16 = 160;

/// ST7735 internal frame memory is 132x162; the visible area sits inside it.
pub const RAM_WIDTH: u16 = 132;
pub const RAM_HEIGHT: u16 = 162;

/// Memory-access-control (MADCTL, 0x36) value.
///
/// Module batches ship with different mounting, so the value is a
/// configuration option rather than a constant of the driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Orientation(u8);

impl Orientation {
    /// Row address order (mirror Y).
    pub const MY: u8 = 0x80;
    /// Column address order (mirror X).
    pub const MX: u8 = 0x40;
    /// Row/column exchange.
    pub const MV: u8 = 0x20;
    /// Vertical refresh order.
    pub const ML: u8 = 0x10;
    /// BGR subpixel order.
    pub const BGR: u8 = 0x08;
    /// Horizontal refresh order.
    pub const MH: u8 = 0x04;

    /// 0x00: controller default scan direction.
    pub const NATIVE: Self = Self(0x00);
    /// 0xC0: portrait, RGB order (1.8" red-tab modules).
    pub const PORTRAIT: Self = Self(Self::MY | Self::MX);
    /// 0xC8: portrait, BGR order (green-tab modules).
    pub const PORTRAIT_BGR: Self = Self(Self::MY | Self::MX | Self::BGR);
    /// 0x60: landscape, rotated 90 degrees.
    pub const LANDSCAPE: Self = Self(Self::MX | Self::MV);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn with_bgr(self, bgr: bool) -> Self {
        if bgr {
            Self(self.0 | Self::BGR)
        } else {
            Self(self.0 & !Self::BGR)
        }
    }

    /// True when rows and columns are exchanged (landscape scan).
    #[inline]
    pub const fn swaps_axes(self) -> bool {
        self.0 & Self::MV != 0
    }
}

fn no_yield() {}

const fn clamp_side(v: u16) -> u16 {
    if v > RAM_HEIGHT {
        RAM_HEIGHT
    } else {
        v
    }
}

/// Everything that varies between panel modules and boards.
#[derive(Copy, Clone, Debug)]
pub struct PanelConfig {
    pub width: u16,
    pub height: u16,
    /// Added to every column address at the SPI boundary.
    pub x_offset: u16,
    /// Added to every row address at the SPI boundary.
    pub y_offset: u16,
    pub orientation: Orientation,
    /// SPI clock for the panel link.
    pub spi_hz: u32,
    /// Called once per streamed row during long fills and blits.
    /// Point it at the scheduler yield or a watchdog feed.
    pub row_yield: fn(),
}

impl PanelConfig {
    /// 1.8" 128x160 red-tab module, as wired on the tft_test board (MADCTL 0xC0, 8 MHz).
    pub const ST7735R_128X160: Self = Self {
        width: TFT_WIDTH,
        height: TFT_HEIGHT,
        x_offset: 0,
        y_offset: 0,
        orientation: Orientation::PORTRAIT,
        spi_hz: 8_000_000,
        row_yield: no_yield,
    };

    /// Green-tab batch: visible area shifted by (2, 1) inside the 132x162 RAM.
    pub const ST7735_GREENTAB_128X160: Self = Self {
        width: TFT_WIDTH,
        height: TFT_HEIGHT,
        x_offset: 2,
        y_offset: 1,
        orientation: Orientation::PORTRAIT_BGR,
        spi_hz: 8_000_000,
        row_yield: no_yield,
    };

    /// Each side is capped at 162, the longest side of the frame memory
    /// (and of the driver's row buffer).
    pub const fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = clamp_side(width);
        self.height = clamp_side(height);
        self
    }

    pub const fn with_offsets(mut self, x_offset: u16, y_offset: u16) -> Self {
        self.x_offset = x_offset;
        self.y_offset = y_offset;
        self
    }

    pub const fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub const fn with_spi_hz(mut self, spi_hz: u32) -> Self {
        self.spi_hz = spi_hz;
        self
    }

    pub const fn with_row_yield(mut self, row_yield: fn()) -> Self {
        self.row_yield = row_yield;
        self
    }

    /// Number of pixels in one full-screen fill.
    #[inline]
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "greentab")] {
                Self::ST7735_GREENTAB_128X160
            } else {
                Self::ST7735R_128X160
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_the_128x160_panel() {
        let red = PanelConfig::ST7735R_128X160;
        assert_eq!((red.width, red.height), (128, 160));
        assert_eq!((red.x_offset, red.y_offset), (0, 0));
        assert_eq!(red.orientation.bits(), 0xC0);
        assert_eq!(red.pixel_count(), 20_480);

        let green = PanelConfig::ST7735_GREENTAB_128X160;
        assert_eq!((green.x_offset, green.y_offset), (2, 1));
        assert_eq!(green.orientation.bits(), 0xC8);
    }

    #[test]
    fn builder_setters_override_fields() {
        let cfg = PanelConfig::ST7735R_128X160
            .with_offsets(2, 3)
            .with_orientation(Orientation::LANDSCAPE)
            .with_size(160, 128)
            .with_spi_hz(26_000_000);
        assert_eq!((cfg.x_offset, cfg.y_offset), (2, 3));
        assert_eq!((cfg.width, cfg.height), (160, 128));
        assert_eq!(cfg.spi_hz, 26_000_000);
        assert!(cfg.orientation.swaps_axes());
    }

    #[test]
    fn size_is_capped_to_frame_memory() {
        let cfg = PanelConfig::ST7735R_128X160.with_size(200, 1_000);
        assert_eq!((cfg.width, cfg.height), (162, 162));
        let cfg = PanelConfig::ST7735R_128X160.with_size(162, 132);
        assert_eq!((cfg.width, cfg.height), (162, 132));
    }

    #[test]
    fn orientation_bgr_toggle() {
        assert_eq!(Orientation::PORTRAIT.with_bgr(true), Orientation::PORTRAIT_BGR);
        assert_eq!(Orientation::PORTRAIT_BGR.with_bgr(false), Orientation::PORTRAIT);
        assert!(!Orientation::from_bits(0xC8).swaps_axes());
    }
}
