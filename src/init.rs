//! ST7735 command set and the power-up command table.
//!
//! The table is an ordered list of explicit records. A command without
//! parameters says so with [`Args::None`]; there is no end-of-table marker.

// System commands
pub const SWRESET: u8 = 0x01;
pub const SLPOUT: u8 = 0x11;
pub const DISPON: u8 = 0x29;
pub const CASET: u8 = 0x2A;
pub const RASET: u8 = 0x2B;
pub const RAMWR: u8 = 0x2C;
pub const MADCTL: u8 = 0x36;
pub const COLMOD: u8 = 0x3A;

// Panel function commands
pub const FRMCTR1: u8 = 0xB1;
pub const FRMCTR2: u8 = 0xB2;
pub const FRMCTR3: u8 = 0xB3;
pub const INVCTR: u8 = 0xB4;
pub const PWCTR1: u8 = 0xC0;
pub const PWCTR2: u8 = 0xC1;
pub const PWCTR3: u8 = 0xC2;
pub const PWCTR4: u8 = 0xC3;
pub const PWCTR5: u8 = 0xC4;
pub const VMCTR1: u8 = 0xC5;
pub const GMCTRP1: u8 = 0xE0;
pub const GMCTRN1: u8 = 0xE1;

/// COLMOD parameter: 16 bits per pixel, RGB565.
pub const COLMOD_RGB565: u8 = 0x05;

/// Hardware reset line timing (ms): high, low pulse, settle after release.
pub const RESET_HIGH_MS: u32 = 5;
pub const RESET_LOW_MS: u32 = 20;
pub const RESET_SETTLE_MS: u32 = 150;

/// Bring-up progress of the controller.
///
/// Registers written before the controller finishes its internal boot are
/// dropped silently, so the settle delays between states are mandatory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum InitState {
    Uninitialized,
    Reset,
    SleepOut,
    ConfiguredTiming,
    ConfiguredColorMode,
    ConfiguredOrientation,
    GammaSet,
    DisplayOn,
}

impl InitState {
    #[inline]
    pub fn is_ready(self) -> bool {
        self == InitState::DisplayOn
    }
}

/// Parameter block of one init record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Args {
    /// Command takes no parameters.
    None,
    /// Fixed parameter bytes.
    Fixed(&'static [u8]),
    /// Single MADCTL byte taken from the panel configuration.
    Orientation,
}

/// One step of the power-up sequence.
#[derive(Copy, Clone, Debug)]
pub struct InitCommand {
    pub cmd: u8,
    pub args: Args,
    /// Wait after the command (and its parameters) went out.
    pub delay_ms: u16,
    /// State reached once this record has been written.
    pub enters: InitState,
}

const fn step(cmd: u8, args: Args, delay_ms: u16, enters: InitState) -> InitCommand {
    InitCommand { cmd, args, delay_ms, enters }
}

/// ST7735R power-up sequence for 128x160 modules.
pub static INIT_SEQUENCE: [InitCommand; 17] = [
    // Software reset and sleep out, both need the full settle time
    step(SWRESET, Args::None, 150, InitState::Reset),
    step(SLPOUT, Args::None, 500, InitState::SleepOut),
    // Frame rate: normal, idle, partial (dot inversion then line inversion)
    step(FRMCTR1, Args::Fixed(&[0x01, 0x2C, 0x2D]), 0, InitState::ConfiguredTiming),
    step(FRMCTR2, Args::Fixed(&[0x01, 0x2C, 0x2D]), 0, InitState::ConfiguredTiming),
    step(FRMCTR3, Args::Fixed(&[0x01, 0x2C, 0x2D, 0x01, 0x2C, 0x2D]), 0, InitState::ConfiguredTiming),
    // No display inversion
    step(INVCTR, Args::Fixed(&[0x07]), 0, InitState::ConfiguredTiming),
    // Power: -4.6V AUTO, VGH25 2.4V, opamp current, boost frequencies, VCOM
    step(PWCTR1, Args::Fixed(&[0xA2, 0x02, 0x84]), 0, InitState::ConfiguredTiming),
    step(PWCTR2, Args::Fixed(&[0xC5]), 0, InitState::ConfiguredTiming),
    step(PWCTR3, Args::Fixed(&[0x0A, 0x00]), 0, InitState::ConfiguredTiming),
    step(PWCTR4, Args::Fixed(&[0x8A, 0x2A]), 0, InitState::ConfiguredTiming),
    step(PWCTR5, Args::Fixed(&[0x8A, 0xEE]), 0, InitState::ConfiguredTiming),
    step(VMCTR1, Args::Fixed(&[0x0E]), 0, InitState::ConfiguredTiming),
    step(COLMOD, Args::Fixed(&[COLMOD_RGB565]), 10, InitState::ConfiguredColorMode),
    step(MADCTL, Args::Orientation, 0, InitState::ConfiguredOrientation),
    step(
        GMCTRP1,
        Args::Fixed(&[
            0x02, 0x1C, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D, 0x29, 0x25, 0x2B, 0x39, 0x00, 0x01, 0x03, 0x10,
        ]),
        0,
        InitState::GammaSet,
    ),
    step(
        GMCTRN1,
        Args::Fixed(&[
            0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D, 0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00, 0x02, 0x10,
        ]),
        0,
        InitState::GammaSet,
    ),
    step(DISPON, Args::None, 100, InitState::DisplayOn),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_states_never_go_backwards() {
        let mut prev = InitState::Uninitialized;
        for rec in INIT_SEQUENCE.iter() {
            assert!(rec.enters >= prev, "0x{:02X} moves state backwards", rec.cmd);
            prev = rec.enters;
        }
        assert_eq!(prev, InitState::DisplayOn);
    }

    #[test]
    fn boot_commands_carry_mandatory_settle_time() {
        assert_eq!(INIT_SEQUENCE[0].cmd, SWRESET);
        assert!(INIT_SEQUENCE[0].delay_ms >= 120);
        assert_eq!(INIT_SEQUENCE[1].cmd, SLPOUT);
        assert!(INIT_SEQUENCE[1].delay_ms >= 120);
        assert_eq!(INIT_SEQUENCE[INIT_SEQUENCE.len() - 1].cmd, DISPON);
    }

    #[test]
    fn zero_argument_commands_are_explicit() {
        for rec in INIT_SEQUENCE.iter() {
            match rec.args {
                Args::None => assert!(matches!(rec.cmd, SWRESET | SLPOUT | DISPON)),
                Args::Fixed(bytes) => assert!(!bytes.is_empty()),
                Args::Orientation => assert_eq!(rec.cmd, MADCTL),
            }
        }
    }

    #[test]
    fn gamma_blocks_are_sixteen_bytes() {
        for rec in INIT_SEQUENCE.iter().filter(|r| matches!(r.cmd, GMCTRP1 | GMCTRN1)) {
            match rec.args {
                Args::Fixed(bytes) => assert_eq!(bytes.len(), 16),
                other => panic!("unexpected gamma args {:?}", other),
            }
        }
    }
}
