//! Display setup and initialization module.
//
// - `setup_display` builds the SPI bus, wraps it with the chip-select line
//   and runs the ST7735 power-up sequence.
// - Clock rate and panel geometry come from `PanelConfig`.
// - The backlight is switched on only after init, so the user never sees
//   uninitialized frame memory.

use esp_backtrace as _;

use esp_hal::{
    delay::Delay,
    gpio::Output,
    spi::master::{Config, ConfigError, Spi},
    spi::Mode,
    time::Rate,
    Blocking,
};

use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};

use crate::config::PanelConfig;
use crate::st7735::{DriverError, St7735};
use crate::wiring::DisplayPins;

pub type SpiDev = ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, NoDelay>;
pub type DisplayType = St7735<SpiDev, Output<'static>, Output<'static>>;
pub type PanelError = DriverError<SpiDev, Output<'static>>;

#[derive(Debug)]
pub enum SetupError {
    /// SPI clock or mode rejected by the HAL.
    SpiConfig(ConfigError),
    /// Chip-select could not be driven high.
    ChipSelect,
    /// Power-up sequence failed on the bus.
    Panel(PanelError),
}

/// Bring the panel up. Returns the driver and the backlight pin, which must
/// stay alive for the light to stay on.
pub fn setup_display(
    display_pins: DisplayPins,
    config: PanelConfig,
) -> Result<(DisplayType, Output<'static>), SetupError> {
    let DisplayPins {
        spi,
        sck,
        mosi,
        cs,
        dc,
        rst,
        mut bl,
    } = display_pins;

    // SPI Mode 0, write-only
    let spi_cfg = Config::default()
        .with_frequency(Rate::from_hz(config.spi_hz))
        .with_mode(Mode::_0);

    let bus = Spi::new(spi, spi_cfg)
        .map_err(SetupError::SpiConfig)?
        .with_sck(sck)
        .with_mosi(mosi);

    let spi_dev = ExclusiveDevice::new(bus, cs, NoDelay).map_err(|_| SetupError::ChipSelect)?;

    let mut display = St7735::new(spi_dev, dc, Some(rst), config);
    let mut delay = Delay::new();
    display.init(&mut delay).map_err(SetupError::Panel)?;

    bl.set_high();
    Ok((display, bl))
}
