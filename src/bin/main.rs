//! TFT test firmware
//! ========================================
//! source ~/export-esp.sh
//! cargo run --release --features esp32
//! ========================================
//!
//! Brings up the 1.8" ST7735 panel and shows the medication reminder
//! screen, cycling through the day's reminders.

#![no_std]
#![no_main]

// Define the application description, which is placed in a special section of the binary.
// This is used by the bootloader to verify the application.
esp_bootloader_esp_idf::esp_app_desc!();

use esp32_st7735::{
    colors::{COLOR_BLACK, COLOR_GRAY, COLOR_GREEN, COLOR_WHITE},
    config::PanelConfig,
    font::{CHAR_ADVANCE, GLYPH_HEIGHT},
    display::{setup_display, DisplayType, PanelError},
    wiring::init_board_pins,
};

use embedded_graphics::{
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use embedded_hal::delay::DelayNs;
use esp_backtrace as _;
use esp_hal::{delay::Delay, main, Config};
use esp_println::println;

const TITLE: &str = "NHAC NHO:";
const REMINDERS: [&str; 3] = ["UONG THUOC SANG", "UONG THUOC TRUA", "UONG THUOC TOI"];
const REMINDER_PERIOD_MS: u32 = 5_000;
const MSG_X: u16 = 10;
const MSG_Y: u16 = 40;

fn draw_frame(display: &mut DisplayType) -> Result<(), PanelError> {
    display.fill_screen(COLOR_BLACK)?;
    Rectangle::new(Point::new(2, 2), Size::new(124, 156))
        .into_styled(PrimitiveStyle::with_stroke(COLOR_GRAY, 1))
        .draw(display)?;
    display.draw_string(10, 10, TITLE, COLOR_GREEN, None)
}

// Opaque cells overwrite the previous message in place; the tail of a
// longer previous message is blanked.
fn draw_reminder(display: &mut DisplayType, message: &str) -> Result<(), PanelError> {
    display.draw_string(MSG_X, MSG_Y, message, COLOR_WHITE, Some(COLOR_BLACK))?;

    let longest = REMINDERS.iter().map(|m| m.len()).max().unwrap_or(0);
    let pad = longest.saturating_sub(message.len()) as u16;
    let tail_x = MSG_X + message.len() as u16 * CHAR_ADVANCE;
    display.fill_rect(tail_x, MSG_Y, pad * CHAR_ADVANCE, GLYPH_HEIGHT, COLOR_BLACK)
}

#[main]
fn main() -> ! {
    let peripherals = esp_hal::init(Config::default());
    let pins = init_board_pins(peripherals);

    let config = PanelConfig::default();
    let (mut display, _backlight) = match setup_display(pins, config) {
        Ok(v) => v,
        Err(e) => {
            println!("ST7735 setup failed: {:?}", e);
            panic!("display init failed");
        }
    };
    println!("ST7735 ready: {}x{}", display.width(), display.height());

    if let Err(e) = draw_frame(&mut display) {
        println!("frame draw failed: {:?}", e);
    }

    let mut delay = Delay::new();
    let mut idx = 0;
    loop {
        if let Err(e) = draw_reminder(&mut display, REMINDERS[idx]) {
            println!("reminder draw failed: {:?}", e);
        }

        idx = (idx + 1) % REMINDERS.len();
        delay.delay_ms(REMINDER_PERIOD_MS);
    }
}
