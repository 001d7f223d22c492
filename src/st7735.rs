// ST7735 panel driver (4-wire SPI with D/C line, write-only).
// Works with esp-hal (no_std) and embedded-graphics, or any embedded-hal 1.0 SPI device.
//
// Wiring on the tft_test board (ESP32, VSPI):
//   CS  = GPIO5
//   SCK = GPIO18
//   MOSI = GPIO23
//   DC  = GPIO2
//   RST = GPIO4
//   BL  = GPIO15
//
// Protocol:
//   D/C low  -> the byte on the bus is a command opcode.
//   D/C high -> the bytes are parameters or pixel data for the last command.
//   Example: [DC=0] 0x3A, [DC=1] 0x05 -> Pixel Format = 16bpp (RGB565)
// Pixels: CASET + RASET stage a window, RAMWR starts the write, then RGB565
// big-endian pixels fill the window row by row without further addressing.
// Geometry: 128 x 160 visible pixels inside a 132 x 162 frame memory.

use core::fmt;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PointsIter, Rectangle},
};
use embedded_hal::{
    delay::DelayNs,
    digital::{self, OutputPin},
    spi::{self, SpiDevice},
};

use crate::config::{Orientation, PanelConfig, RAM_HEIGHT};
use crate::init::{self, Args, InitCommand, InitState, INIT_SEQUENCE};

/// Longest row the frame memory can hold (162 px), in bytes.
pub const ROW_BUF: usize = RAM_HEIGHT as usize * 2;

/// Error type that wraps SPI and GPIO errors.
#[derive(Debug)]
pub enum St7735Error<SpiE, PinE> {
    Spi(SpiE),
    Pin(PinE),
    OutOfBounds,
    NotInitialized,
}

impl<SpiE, PinE> From<SpiE> for St7735Error<SpiE, PinE> {
    fn from(e: SpiE) -> Self {
        Self::Spi(e)
    }
}

impl<SpiE: fmt::Debug, PinE: fmt::Debug> fmt::Display for St7735Error<SpiE, PinE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI transfer failed: {:?}", e),
            Self::Pin(e) => write!(f, "control pin failed: {:?}", e),
            Self::OutOfBounds => f.write_str("window outside the panel"),
            Self::NotInitialized => f.write_str("panel not initialized"),
        }
    }
}

/// Driver error for a given SPI device / D/C pin pair.
pub type DriverError<SPI, DC> =
    St7735Error<<SPI as spi::ErrorType>::Error, <DC as digital::ErrorType>::Error>;

/// ST7735 driver. Owns the SPI device (CS is handled by the `SpiDevice`),
/// the D/C line and an optional hardware reset line.
///
/// Every call is blocking and finishes its bus traffic before returning.
/// There is no locking inside; one owner drives the panel (see `shared.rs`
/// for parking it behind a critical section).
pub struct St7735<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: Option<RST>,
    config: PanelConfig,
    state: InitState,
}

impl<SPI, DC, RST> St7735<SPI, DC, RST>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
{
    /// Wrap the transport. Nothing is sent until [`init`](Self::init).
    pub fn new(spi: SPI, dc: DC, rst: Option<RST>, config: PanelConfig) -> Self {
        Self {
            spi,
            dc,
            rst,
            config,
            state: InitState::Uninitialized,
        }
    }

    /// Hardware reset followed by the full power-up table.
    ///
    /// A reset-line failure aborts right away. An SPI failure inside the
    /// table is logged and the table keeps going so the command order on the
    /// wire is never broken; the first such failure is returned at the end.
    ///
    /// After a failure the state stays at the last step reached before it,
    /// so drawing keeps returning `NotInitialized` until `init` succeeds.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), DriverError<SPI, DC>> {
        self.state = InitState::Uninitialized;

        self.hard_reset(delay)?;
        self.state = InitState::Reset;

        let mut first_err = None;
        for rec in INIT_SEQUENCE.iter() {
            if let Err(e) = self.write_init_command(rec) {
                first_err.get_or_insert(e);
            }
            if rec.delay_ms > 0 {
                delay.delay_ms(rec.delay_ms as u32);
            }
            if first_err.is_none() {
                self.state = rec.enters;
            }
        }

        match first_err {
            Some(e) => {
                log_warn!("st7735: init stopped short of display-on at {:?}", self.state);
                Err(e)
            }
            None => Ok(()),
        }
    }

    /// Panel width in pixels (current orientation).
    #[inline]
    pub fn width(&self) -> u16 {
        self.config.width
    }

    /// Panel height in pixels (current orientation).
    #[inline]
    pub fn height(&self) -> u16 {
        self.config.height
    }

    /// Bring-up progress; drawing needs [`InitState::DisplayOn`].
    #[inline]
    pub fn state(&self) -> InitState {
        self.state
    }

    /// Active panel configuration (geometry follows `set_orientation`).
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Give the bus and pins back.
    pub fn release(self) -> (SPI, DC, Option<RST>) {
        (self.spi, self.dc, self.rst)
    }

    // ---- Transport primitives ----

    /// D/C low, then one single-byte exchange.
    ///
    /// A failed exchange is logged and returned; it is never retried, since a
    /// resend would desync the command/parameter framing.
    pub fn send_command(&mut self, cmd: u8) -> Result<(), DriverError<SPI, DC>> {
        self.dc.set_low().map_err(St7735Error::Pin)?;
        self.spi.write(&[cmd]).map_err(|e| {
            log_warn!("st7735: command 0x{:02X} failed: {:?}", cmd, e);
            St7735Error::Spi(e)
        })
    }

    /// D/C high, then one exchange carrying all of `data`. Empty data is a no-op.
    /// Failures are logged and returned without retry, like `send_command`.
    pub fn send_data(&mut self, data: &[u8]) -> Result<(), DriverError<SPI, DC>> {
        if data.is_empty() {
            return Ok(());
        }
        self.dc.set_high().map_err(St7735Error::Pin)?;
        self.spi.write(data).map_err(|e| {
            log_warn!("st7735: data write of {} bytes failed: {:?}", data.len(), e);
            St7735Error::Spi(e)
        })
    }

    /// Stage the inclusive window `(x0, y0)-(x1, y1)` and start a RAM write.
    ///
    /// Coordinates are panel-local; the frame-memory offset is added here and
    /// nowhere else.
    pub fn set_addr_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), DriverError<SPI, DC>> {
        let (xo, yo) = (self.config.x_offset, self.config.y_offset);

        self.send_command(init::CASET)?;
        self.send_data(&window_bytes(x0.saturating_add(xo), x1.saturating_add(xo)))?;
        self.send_command(init::RASET)?;
        self.send_data(&window_bytes(y0.saturating_add(yo), y1.saturating_add(yo)))?;
        self.send_command(init::RAMWR)
    }

    // ---- Drawing ----

    /// Fill the whole panel: one window, then one data write per row.
    pub fn fill_screen(&mut self, color: Rgb565) -> Result<(), DriverError<SPI, DC>> {
        let (w, h) = (self.config.width, self.config.height);
        self.fill_rect(0, 0, w, h, color)
    }

    /// Set one pixel. Coordinates off the panel are ignored.
    ///
    /// Stages a 1x1 window per call; for runs of pixels prefer `fill_rect`,
    /// `draw_image` or opaque text, which stage the window once.
    pub fn draw_pixel(&mut self, x: u16, y: u16, color: Rgb565) -> Result<(), DriverError<SPI, DC>> {
        if x >= self.config.width || y >= self.config.height {
            return Ok(());
        }
        self.ensure_ready()?;
        self.set_addr_window(x, y, x, y)?;
        self.send_data(&color.into_storage().to_be_bytes())
    }

    /// Solid rectangle, streamed row by row inside a single window.
    pub fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        color: Rgb565,
    ) -> Result<(), DriverError<SPI, DC>> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        let (x1, y1) = self.window_end(x, y, w, h)?;
        self.ensure_ready()?;

        // Build the row before touching the bus
        let px = color.into_storage().to_be_bytes();
        let mut row: heapless::Vec<u8, ROW_BUF> = heapless::Vec::new();
        for _ in 0..w {
            row.extend_from_slice(&px).map_err(|_| St7735Error::OutOfBounds)?;
        }

        self.set_addr_window(x, y, x1, y1)?;
        for _ in 0..h {
            self.send_data(&row)?;
            (self.config.row_yield)();
        }
        Ok(())
    }

    /// Blit big-endian RGB565 bytes (`w * h * 2` of them) into a window.
    pub fn draw_image(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        data: &[u8],
    ) -> Result<(), DriverError<SPI, DC>> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        let (x1, y1) = self.window_end(x, y, w, h)?;
        let row_bytes = w as usize * 2;
        if data.len() != row_bytes * h as usize {
            return Err(St7735Error::OutOfBounds);
        }
        self.ensure_ready()?;

        self.set_addr_window(x, y, x1, y1)?;
        for row in data.chunks_exact(row_bytes) {
            self.send_data(row)?;
            (self.config.row_yield)();
        }
        Ok(())
    }

    /// Re-issue MADCTL. Switching between portrait and landscape scan swaps
    /// the logical width/height (and offsets) to match.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), DriverError<SPI, DC>> {
        self.send_command(init::MADCTL)?;
        self.send_data(&[orientation.bits()])?;

        if orientation.swaps_axes() != self.config.orientation.swaps_axes() {
            let c = &mut self.config;
            core::mem::swap(&mut c.width, &mut c.height);
            core::mem::swap(&mut c.x_offset, &mut c.y_offset);
        }
        self.config.orientation = orientation;
        Ok(())
    }

    // ---- Low-level helpers ----

    pub(crate) fn ensure_ready(&self) -> Result<(), DriverError<SPI, DC>> {
        if self.state.is_ready() {
            Ok(())
        } else {
            Err(St7735Error::NotInitialized)
        }
    }

    // Inclusive end corner of a w x h window at (x, y), if it fits the panel.
    fn window_end(&self, x: u16, y: u16, w: u16, h: u16) -> Result<(u16, u16), DriverError<SPI, DC>> {
        let x1 = x
            .checked_add(w - 1)
            .filter(|&v| v < self.config.width)
            .ok_or(St7735Error::OutOfBounds)?;
        let y1 = y
            .checked_add(h - 1)
            .filter(|&v| v < self.config.height)
            .ok_or(St7735Error::OutOfBounds)?;
        Ok((x1, y1))
    }

    fn hard_reset(&mut self, delay: &mut impl DelayNs) -> Result<(), DriverError<SPI, DC>> {
        if let Some(r) = self.rst.as_mut() {
            r.set_high().map_err(St7735Error::Pin)?;
            delay.delay_ms(init::RESET_HIGH_MS);
            r.set_low().map_err(St7735Error::Pin)?;
            delay.delay_ms(init::RESET_LOW_MS);
            r.set_high().map_err(St7735Error::Pin)?;
            delay.delay_ms(init::RESET_SETTLE_MS);
        }
        Ok(())
    }

    fn write_init_command(&mut self, rec: &InitCommand) -> Result<(), DriverError<SPI, DC>> {
        self.send_command(rec.cmd)?;
        match rec.args {
            Args::None => Ok(()),
            Args::Fixed(bytes) => self.send_data(bytes),
            Args::Orientation => {
                let madctl = [self.config.orientation.bits()];
                self.send_data(&madctl)
            }
        }
    }
}

// CASET/RASET parameter block: start and end, high byte first.
#[inline]
fn window_bytes(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

// -------------------- embedded-graphics integration --------------------
impl<SPI, DC, RST> OriginDimensions for St7735<SPI, DC, RST>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
{
    fn size(&self) -> Size {
        Size::new(self.config.width as u32, self.config.height as u32)
    }
}

impl<SPI, DC, RST> DrawTarget for St7735<SPI, DC, RST>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
{
    type Color = Rgb565;
    type Error = DriverError<SPI, DC>;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Rgb565>>,
    {
        for Pixel(p, c) in pixels {
            if let (Ok(x), Ok(y)) = (u16::try_from(p.x), u16::try_from(p.y)) {
                self.draw_pixel(x, y, c)?;
            }
        }
        Ok(())
    }

    // Fully visible areas stream through one window; anything clipped goes per pixel.
    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        let inside = !area.is_zero_sized() && area.intersection(&self.bounding_box()) == *area;
        if !inside {
            return self.draw_iter(area.points().zip(colors).map(|(p, c)| Pixel(p, c)));
        }

        let (x, y) = (area.top_left.x as u16, area.top_left.y as u16);
        let (w, h) = (area.size.width as u16, area.size.height as u16);
        self.ensure_ready()?;
        self.set_addr_window(x, y, x + w - 1, y + h - 1)?;

        let mut colors = colors.into_iter();
        for _ in 0..h {
            let mut row: heapless::Vec<u8, ROW_BUF> = heapless::Vec::new();
            for c in colors.by_ref().take(w as usize) {
                row.extend_from_slice(&c.into_storage().to_be_bytes())
                    .map_err(|_| St7735Error::OutOfBounds)?;
            }
            self.send_data(&row)?;
            (self.config.row_yield)();
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Rgb565) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounding_box());
        if clipped.is_zero_sized() {
            return Ok(());
        }
        self.fill_rect(
            clipped.top_left.x as u16,
            clipped.top_left.y as u16,
            clipped.size.width as u16,
            clipped.size.height as u16,
            color,
        )
    }

    fn clear(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        self.fill_screen(color)
    }
}
