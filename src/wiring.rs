// This module handles board-specific pin mappings for the TFT link.
// The profile is selected with the chip feature in Cargo.toml.
//! The following wiring is assumed:
//!
//! esp32 (tft_test board, VSPI / SPI3):
//! - SCK  => GPIO18
//! - MOSI => GPIO23
//! - CS   => GPIO5
//! - DC   => GPIO2
//! - RST  => GPIO4
//! - BL   => GPIO15
//!
//! esp32s3 (devkit, SPI2):
//! - SCK  => GPIO10
//! - MOSI => GPIO11
//! - CS   => GPIO9
//! - DC   => GPIO8
//! - RST  => GPIO14
//! - BL   => GPIO2
//!
//! - VCC => 3.3V, GND => GND
//! The module is write-only: MISO is not connected.

use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::peripherals::Peripherals;

cfg_if::cfg_if! {
    if #[cfg(feature = "esp32")] {
        use esp_hal::peripherals::{GPIO18, GPIO23, SPI3};
        pub type PanelSpi = SPI3<'static>;
        pub type PanelSck = GPIO18<'static>;
        pub type PanelMosi = GPIO23<'static>;
    } else if #[cfg(feature = "esp32s3")] {
        use esp_hal::peripherals::{GPIO10, GPIO11, SPI2};
        pub type PanelSpi = SPI2<'static>;
        pub type PanelSck = GPIO10<'static>;
        pub type PanelMosi = GPIO11<'static>;
    }
}

/// Everything the panel needs, split out of `Peripherals`.
pub struct DisplayPins {
    pub spi: PanelSpi,
    pub sck: PanelSck,
    pub mosi: PanelMosi,
    pub cs: Output<'static>,
    pub dc: Output<'static>,
    pub rst: Output<'static>,
    pub bl: Output<'static>,
}

#[cfg(feature = "esp32")]
pub fn init_board_pins(p: Peripherals) -> DisplayPins {
    // CS idles high, backlight stays off until the panel is initialized
    DisplayPins {
        spi: p.SPI3,
        sck: p.GPIO18,
        mosi: p.GPIO23,
        cs: Output::new(p.GPIO5, Level::High, OutputConfig::default()),
        dc: Output::new(p.GPIO2, Level::Low, OutputConfig::default()),
        rst: Output::new(p.GPIO4, Level::High, OutputConfig::default()),
        bl: Output::new(p.GPIO15, Level::Low, OutputConfig::default()),
    }
}

// Same LCD control pins as the watch devkit
#[cfg(all(feature = "esp32s3", not(feature = "esp32")))]
pub fn init_board_pins(p: Peripherals) -> DisplayPins {
    DisplayPins {
        spi: p.SPI2,
        sck: p.GPIO10,
        mosi: p.GPIO11,
        cs: Output::new(p.GPIO9, Level::High, OutputConfig::default()),
        dc: Output::new(p.GPIO8, Level::Low, OutputConfig::default()),
        rst: Output::new(p.GPIO14, Level::High, OutputConfig::default()),
        bl: Output::new(p.GPIO2, Level::Low, OutputConfig::default()),
    }
}
