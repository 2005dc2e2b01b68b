//! Byte-addressed non-volatile cells.
//!
//! The wear-leveled store only ever reads or writes a single byte at a
//! time. [`CellStorage`] is that minimal interface; [`StorageCells`] adapts
//! any [`embedded_storage::Storage`] device to it.

use embedded_storage::{ReadStorage, Storage};

/// Value of a cell that holds no data.
pub const EMPTY_CELL: u8 = 0xFF;

/// Trait for abstracting byte-addressed non-volatile memory (EEPROM, or an
/// emulation of it).
///
/// Both methods are infallible: implementations handle device errors
/// internally. A read that fails should return [`EMPTY_CELL`], which the
/// store treats as "no data".
pub trait CellStorage {
    /// Reads the cell at `index`.
    fn read_cell(&mut self, index: u8) -> u8;

    /// Writes `value` to the cell at `index`, blocking until the write
    /// has completed.
    fn write_cell(&mut self, index: u8, value: u8);
}

impl<T: CellStorage + ?Sized> CellStorage for &mut T {
    fn read_cell(&mut self, index: u8) -> u8 {
        (**self).read_cell(index)
    }

    fn write_cell(&mut self, index: u8, value: u8) {
        (**self).write_cell(index, value)
    }
}

/// Cells backed by an `embedded-storage` device, starting at `base`.
///
/// Cell `i` lives at byte offset `base + i`. Read errors read as
/// [`EMPTY_CELL`]; write errors are logged and dropped, so the affected
/// save is lost exactly as if power had failed during it.
#[derive(Debug)]
pub struct StorageCells<S> {
    storage: S,
    base: u32,
}

impl<S: Storage> StorageCells<S> {
    /// Wraps `storage`, placing cell 0 at byte offset `base`.
    pub fn new(storage: S, base: u32) -> Self {
        Self { storage, base }
    }

    /// Returns the byte offset of cell 0.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Releases the underlying device.
    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl<S: Storage> CellStorage for StorageCells<S> {
    fn read_cell(&mut self, index: u8) -> u8 {
        let mut buf = [EMPTY_CELL];
        match self.storage.read(self.base + u32::from(index), &mut buf) {
            Ok(()) => buf[0],
            Err(_) => {
                warn!("cell {=u8} unreadable, treating as empty", index);
                EMPTY_CELL
            }
        }
    }

    fn write_cell(&mut self, index: u8, value: u8) {
        if self
            .storage
            .write(self.base + u32::from(index), &[value])
            .is_err()
        {
            warn!("write of cell {=u8} failed", index);
        }
    }
}
