//! Serialized access to a single display from more than one context.
//!
//! The driver has no locking of its own. When firmware draws from the main
//! loop and from an interrupt or timer path, the driver is parked here and
//! every access runs inside `critical_section::with`, so only one
//! command/data exchange is ever in flight.

use core::cell::RefCell;
use critical_section::Mutex;

pub struct SharedDisplay<D> {
    slot: Mutex<RefCell<Option<D>>>,
}

impl<D> SharedDisplay<D> {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(RefCell::new(None)),
        }
    }

    /// Park `display`, handing back whatever was installed before.
    pub fn install(&self, display: D) -> Option<D> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).replace(display))
    }

    /// Take the display back out (e.g. to `release()` the bus).
    pub fn take(&self) -> Option<D> {
        critical_section::with(|cs| self.slot.borrow_ref_mut(cs).take())
    }

    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow_ref(cs).is_some())
    }

    /// Run `f` with exclusive access to the display.
    /// Returns `None` if nothing is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut D) -> R) -> Option<R> {
        critical_section::with(|cs| {
            let mut slot = self.slot.borrow_ref_mut(cs);
            match slot.as_mut() {
                Some(display) => Some(f(display)),
                None => {
                    log_warn!("shared display used before install");
                    None
                }
            }
        })
    }
}

impl<D> Default for SharedDisplay<D> {
    fn default() -> Self {
        Self::new()
    }
}
