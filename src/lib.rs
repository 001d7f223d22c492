#![cfg_attr(not(test), no_std)]

// Warnings go to the serial console on the board, into a per-thread list
// under test, and nowhere in other host builds.
#[cfg(feature = "firmware")]
macro_rules! log_warn {
    ($($arg:tt)*) => { esp_println::println!($($arg)*) };
}

#[cfg(all(not(feature = "firmware"), test))]
macro_rules! log_warn {
    ($($arg:tt)*) => { crate::testing::record_warning(format_args!($($arg)*)) };
}

#[cfg(all(not(feature = "firmware"), not(test)))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{ let _ = format_args!($($arg)*); }};
}

pub mod colors;
pub mod config;
pub mod font;
pub mod init;
pub mod shared;
pub mod st7735;

#[cfg(feature = "firmware")]
pub mod display;
#[cfg(feature = "firmware")]
pub mod wiring;

#[cfg(test)]
mod testing;

pub use st7735::{DriverError, St7735, St7735Error};
