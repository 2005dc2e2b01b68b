//! Sharing the firmware between the boot path and the tick interrupt.
//!
//! [`SharedFirmware`] is meant to live in a `static`. The boot path builds a
//! [`Firmware`], runs [`Firmware::boot`] and installs it inside one critical
//! section, so a tick armed by `boot` waits for the install; the timer
//! interrupt handler then calls [`SharedFirmware::on_tick`].
//!
//! ```ignore
//! static FIRMWARE: SharedFirmware<Pwm, Eeprom> = SharedFirmware::new();
//!
//! #[interrupt]
//! fn WDT() {
//!     FIRMWARE.on_tick();
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;
use portable_atomic::{AtomicBool, AtomicU8, Ordering};

use crate::cells::CellStorage;
use crate::firmware::Firmware;
use crate::runtime::PwmOutput;
use crate::store::DEFAULT_LOG_CELLS;

/// Serializes tick processing and queues ticks that arrive while a tick is
/// still being processed.
///
/// A tick raised while another is running is counted and processed by the
/// running invocation before it returns, instead of nesting. A tick raised
/// after the running invocation has drained its queue but before it has
/// released the gate stays queued until the next tick arrives.
#[derive(Debug)]
pub struct TickGate {
    busy: AtomicBool,
    pending: AtomicU8,
}

impl TickGate {
    /// Creates an idle gate.
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            pending: AtomicU8::new(0),
        }
    }

    /// Records one tick and, unless another invocation is already running,
    /// calls `tick` once for every queued tick.
    ///
    /// Returns the number of ticks processed by this invocation; 0 means
    /// the tick was queued for the running invocation.
    pub fn run<F: FnMut()>(&self, mut tick: F) -> u8 {
        let _ = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1));

        if self.busy.swap(true, Ordering::Acquire) {
            trace!("tick queued behind a running tick");
            return 0;
        }

        let mut processed: u8 = 0;
        loop {
            let queued = self.pending.swap(0, Ordering::AcqRel);
            if queued == 0 {
                break;
            }
            if queued > 1 {
                warn!("handler overran, catching up {=u8} ticks", queued);
            }
            for _ in 0..queued {
                tick();
            }
            processed = processed.saturating_add(queued);
        }

        self.busy.store(false, Ordering::Release);
        processed
    }

    /// Returns the number of ticks waiting to be processed.
    pub fn pending(&self) -> u8 {
        self.pending.load(Ordering::Acquire)
    }

    /// Returns true while an invocation of [`run`](Self::run) is active.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Default for TickGate {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`Firmware`] behind a critical-section mutex, with a [`TickGate`] in
/// front of its tick entry point.
pub struct SharedFirmware<O: PwmOutput, S: CellStorage, const CELLS: usize = DEFAULT_LOG_CELLS> {
    firmware: Mutex<RefCell<Option<Firmware<O, S, CELLS>>>>,
    gate: TickGate,
}

impl<O: PwmOutput, S: CellStorage, const CELLS: usize> SharedFirmware<O, S, CELLS> {
    /// Creates an empty slot. Ticks are ignored until a firmware is
    /// installed.
    pub const fn new() -> Self {
        Self {
            firmware: Mutex::new(RefCell::new(None)),
            gate: TickGate::new(),
        }
    }

    /// Installs `firmware`, returning the one it replaces.
    pub fn install(&self, firmware: Firmware<O, S, CELLS>) -> Option<Firmware<O, S, CELLS>> {
        critical_section::with(|cs| self.firmware.borrow_ref_mut(cs).replace(firmware))
    }

    /// Removes the installed firmware.
    pub fn take(&self) -> Option<Firmware<O, S, CELLS>> {
        critical_section::with(|cs| self.firmware.borrow_ref_mut(cs).take())
    }

    /// Runs `f` on the installed firmware with interrupts masked.
    ///
    /// Returns `None` if no firmware is installed.
    pub fn with<R>(&self, f: impl FnOnce(&mut Firmware<O, S, CELLS>) -> R) -> Option<R> {
        critical_section::with(|cs| self.firmware.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Tick interrupt entry point.
    ///
    /// Returns the number of ticks that reached an installed firmware. Ticks
    /// queued behind a running invocation, or raised before
    /// [`install`](Self::install), count as 0.
    pub fn on_tick(&self) -> u8 {
        let mut ticked: u8 = 0;
        self.gate.run(|| {
            if self.with(|firmware| firmware.tick()).is_some() {
                ticked = ticked.saturating_add(1);
            }
        });
        ticked
    }

    /// Returns the gate guarding [`on_tick`](Self::on_tick).
    pub fn gate(&self) -> &TickGate {
        &self.gate
    }
}

impl<O: PwmOutput, S: CellStorage, const CELLS: usize> Default for SharedFirmware<O, S, CELLS> {
    fn default() -> Self {
        Self::new()
    }
}
