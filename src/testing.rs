//! Host-side stand-in for the panel: a fake SPI bus and pins sharing one
//! simulated controller that decodes CASET/RASET/RAMWR into frame memory.

use core::convert::Infallible;
use std::{cell::RefCell, rc::Rc, string::String, vec::Vec};

use embedded_hal::{
    delay::DelayNs,
    digital,
    spi::{self, ErrorKind},
};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};

use crate::config::{PanelConfig, RAM_HEIGHT, RAM_WIDTH};
use crate::init::{CASET, MADCTL, RAMWR, RASET};
use crate::st7735::St7735;

/// One exchange as seen on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Command(u8),
    Data(Vec<u8>),
}

pub struct Bus {
    pub dc_high: bool,
    pub cs_low: bool,
    pub rst_levels: Vec<bool>,
    pub events: Vec<Event>,
    /// Number of bus writes since the last `clear_log`.
    pub transfers: usize,
    /// Reject the write of this command byte (it is still logged).
    pub fail_on_command: Option<u8>,
    pub madctl: Option<u8>,
    ram: Vec<u16>,
    current: Option<u8>,
    params: Vec<u8>,
    cols: (u16, u16),
    rows: (u16, u16),
    cursor: (u16, u16),
    half: Option<u8>,
}

impl Bus {
    fn new() -> Self {
        Self {
            dc_high: false,
            cs_low: false,
            rst_levels: Vec::new(),
            events: Vec::new(),
            transfers: 0,
            fail_on_command: None,
            madctl: None,
            ram: vec![0; RAM_WIDTH as usize * RAM_HEIGHT as usize],
            current: None,
            params: Vec::new(),
            cols: (0, RAM_WIDTH - 1),
            rows: (0, RAM_HEIGHT - 1),
            cursor: (0, 0),
            half: None,
        }
    }

    pub fn clear_log(&mut self) {
        self.events.clear();
        self.transfers = 0;
    }

    /// Command bytes in the order they were sent.
    pub fn commands(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Command(c) => Some(*c),
                Event::Data(_) => None,
            })
            .collect()
    }

    /// Frame memory word at a RAM address (offsets already applied).
    pub fn ram_at(&self, x: u16, y: u16) -> u16 {
        self.ram[y as usize * RAM_WIDTH as usize + x as usize]
    }

    fn on_write(&mut self, bytes: &[u8]) -> Result<(), ErrorKind> {
        self.transfers += 1;
        if self.dc_high {
            self.on_data(bytes);
            return Ok(());
        }
        for &b in bytes {
            self.on_command(b);
            if self.fail_on_command == Some(b) {
                return Err(ErrorKind::Other);
            }
        }
        Ok(())
    }

    fn on_command(&mut self, cmd: u8) {
        self.events.push(Event::Command(cmd));
        self.current = Some(cmd);
        self.params.clear();
        self.half = None;
        if cmd == RAMWR {
            self.cursor = (self.cols.0, self.rows.0);
        }
    }

    fn on_data(&mut self, bytes: &[u8]) {
        self.events.push(Event::Data(bytes.to_vec()));
        match self.current {
            Some(CASET) | Some(RASET) => {
                self.params.extend_from_slice(bytes);
                if self.params.len() >= 4 {
                    let p = &self.params;
                    let range = (
                        u16::from_be_bytes([p[0], p[1]]),
                        u16::from_be_bytes([p[2], p[3]]),
                    );
                    if self.current == Some(CASET) {
                        self.cols = range;
                    } else {
                        self.rows = range;
                    }
                }
            }
            Some(RAMWR) => {
                for &b in bytes {
                    match self.half.take() {
                        Some(hi) => self.store(u16::from_be_bytes([hi, b])),
                        None => self.half = Some(b),
                    }
                }
            }
            Some(MADCTL) => self.madctl = bytes.first().copied(),
            _ => {}
        }
    }

    // Write one pixel at the cursor and advance row-major inside the window.
    fn store(&mut self, value: u16) {
        let (x, y) = self.cursor;
        if x < RAM_WIDTH && y < RAM_HEIGHT {
            self.ram[y as usize * RAM_WIDTH as usize + x as usize] = value;
        }
        self.cursor = if x >= self.cols.1 {
            (self.cols.0, y + 1)
        } else {
            (x + 1, y)
        };
    }
}

std::thread_local! {
    static WARNINGS: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// Sink for `log_warn!` in host tests.
pub fn record_warning(args: core::fmt::Arguments<'_>) {
    WARNINGS.with(|w| w.borrow_mut().push(std::fmt::format(args)));
}

/// Drain the warnings logged on this thread so far.
pub fn take_warnings() -> Vec<String> {
    WARNINGS.with(|w| core::mem::take(&mut *w.borrow_mut()))
}

pub type SharedBus = Rc<RefCell<Bus>>;

pub struct FakeBus(SharedBus);

impl spi::ErrorType for FakeBus {
    type Error = ErrorKind;
}

impl spi::SpiBus<u8> for FakeBus {
    fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.0.borrow_mut().on_write(words)
    }

    fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.0.borrow_mut().on_write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.0.borrow_mut().on_write(words)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
enum Role {
    Dc,
    Cs,
    Rst,
}

pub struct FakePin {
    bus: SharedBus,
    role: Role,
}

impl FakePin {
    fn set(&mut self, high: bool) {
        let mut bus = self.bus.borrow_mut();
        match self.role {
            Role::Dc => bus.dc_high = high,
            Role::Cs => bus.cs_low = !high,
            Role::Rst => bus.rst_levels.push(high),
        }
    }
}

impl digital::ErrorType for FakePin {
    type Error = Infallible;
}

impl digital::OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}

/// Records requested wait time instead of sleeping.
#[derive(Default)]
pub struct FakeDelay {
    total_ns: u64,
}

impl FakeDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ns += ms as u64 * 1_000_000;
    }
}

pub type TestSpi = ExclusiveDevice<FakeBus, FakePin, NoDelay>;
pub type TestPanel = St7735<TestSpi, FakePin, FakePin>;

/// SPI device, D/C pin and reset pin wired to one simulated controller.
pub fn parts() -> (TestSpi, FakePin, FakePin, SharedBus) {
    take_warnings();
    let bus = Rc::new(RefCell::new(Bus::new()));
    let pin = |role| FakePin { bus: bus.clone(), role };

    let spi = ExclusiveDevice::new(FakeBus(bus.clone()), pin(Role::Cs), NoDelay).unwrap();
    let (dc, rst) = (pin(Role::Dc), pin(Role::Rst));
    (spi, dc, rst, bus)
}

/// Driver that has not been initialized yet.
pub fn panel(config: PanelConfig) -> (TestPanel, SharedBus) {
    let (spi, dc, rst, bus) = parts();
    (St7735::new(spi, dc, Some(rst), config), bus)
}

/// Initialized driver with the init traffic already cleared from the log.
pub fn ready_panel(config: PanelConfig) -> (TestPanel, SharedBus) {
    let (mut display, bus) = panel(config);
    display.init(&mut FakeDelay::default()).unwrap();
    bus.borrow_mut().clear_log();
    (display, bus)
}
