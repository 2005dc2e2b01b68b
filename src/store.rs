//! Wear-leveled persistence of the lights' modes.
//!
//! The store is a circular log of single-byte cells. At most one cell holds
//! data; every other cell holds [`EMPTY_CELL`]. A save erases the cell in
//! use, moves the cursor to the next cell and writes the new state there,
//! so writes rotate across the whole log.
//!
//! The cursor is only kept in RAM. After a power cycle it is recovered by
//! [`WearLevelStore::restore`], which scans for the cell holding data.
//!
//! If power fails between the erase and the write, the log is left with no
//! data at all and the next boot falls back to defaults. An erased cell is
//! never decoded as a state, because no encoded state equals [`EMPTY_CELL`].

use crate::cells::{CellStorage, EMPTY_CELL};
use crate::types::{Light, ModeId};

/// Default number of cells in the log.
pub const DEFAULT_LOG_CELLS: usize = 64;

/// The current mode of every light, as stored in one log cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PersistedState {
    modes: [ModeId; Light::COUNT],
}

impl PersistedState {
    /// Creates a state from per-light modes, indexed by [`Light::index`].
    #[inline]
    pub const fn new(modes: [ModeId; Light::COUNT]) -> Self {
        Self { modes }
    }

    /// Returns the stored mode of `light`.
    #[inline]
    pub const fn mode(&self, light: Light) -> ModeId {
        self.modes[light.index()]
    }

    /// Returns all stored modes, indexed by [`Light::index`].
    #[inline]
    pub const fn modes(&self) -> [ModeId; Light::COUNT] {
        self.modes
    }

    /// Packs the state into a cell: primary in the high nibble, secondary
    /// in the low nibble.
    ///
    /// The result is never [`EMPTY_CELL`].
    #[inline]
    pub const fn encode(&self) -> u8 {
        (self.modes[0].raw() << 4) | self.modes[1].raw()
    }

    /// Unpacks a cell.
    ///
    /// Returns `None` for an empty cell and for a cell with a nibble that
    /// is not a mode id.
    pub const fn decode(cell: u8) -> Option<Self> {
        if cell == EMPTY_CELL {
            return None;
        }
        match (ModeId::from_raw(cell >> 4), ModeId::from_raw(cell & 0x0F)) {
            (Some(primary), Some(secondary)) => Some(Self::new([primary, secondary])),
            _ => None,
        }
    }
}

/// Circular wear-leveled log over `CELLS` cells of a [`CellStorage`].
///
/// # Type Parameters
/// * `S` - Cell storage implementation
/// * `CELLS` - Number of cells in the log (1 to 256)
#[derive(Debug)]
pub struct WearLevelStore<S: CellStorage, const CELLS: usize = DEFAULT_LOG_CELLS> {
    storage: S,
    cursor: u8,
}

impl<S: CellStorage, const CELLS: usize> WearLevelStore<S, CELLS> {
    /// Creates a store with the cursor at cell 0.
    ///
    /// Call [`restore`](Self::restore) before the first
    /// [`save`](Self::save) so the cursor points at the cell in use.
    pub fn new(storage: S) -> Self {
        const { assert!(CELLS > 0 && CELLS <= 256, "log must have 1 to 256 cells") };
        Self { storage, cursor: 0 }
    }

    /// Persists `state`.
    ///
    /// Erases the cell in use, advances the cursor to the next cell
    /// (wrapping at the end of the log) and writes the encoded state there.
    /// Each step runs with interrupts masked.
    pub fn save(&mut self, state: PersistedState) {
        let old = self.cursor;
        critical_section::with(|_| self.storage.write_cell(old, EMPTY_CELL));

        let new = Self::next(old);
        critical_section::with(|_| {
            self.cursor = new;
            self.storage.write_cell(new, state.encode());
        });

        trace!("saved {=u8:#x} to cell {=u8}", state.encode(), new);
    }

    /// Recovers the persisted state and the cursor.
    ///
    /// Scans forward from the cursor, wrapping once, for the first
    /// non-empty cell. If one is found the cursor moves there and its
    /// content is decoded; a cell that does not decode yields `None` but
    /// keeps the cursor, so the next save erases it. If the whole log is
    /// empty the cursor resets to cell 0.
    pub fn restore(&mut self) -> Option<PersistedState> {
        let mut index = self.cursor;
        for _ in 0..CELLS {
            let cell = self.storage.read_cell(index);
            if cell != EMPTY_CELL {
                critical_section::with(|_| self.cursor = index);
                let state = PersistedState::decode(cell);
                if state.is_none() {
                    warn!("cell {=u8} holds undecodable {=u8:#x}", index, cell);
                }
                return state;
            }
            index = Self::next(index);
        }

        critical_section::with(|_| self.cursor = 0);
        debug!("log is empty");
        None
    }

    /// Returns the index of the cell last written or found.
    #[inline]
    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    /// Returns the number of cells in the log.
    #[inline]
    pub const fn capacity(&self) -> usize {
        CELLS
    }

    /// Returns a reference to the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a mutable reference to the underlying storage.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Releases the underlying storage.
    pub fn into_inner(self) -> S {
        self.storage
    }

    #[inline]
    fn next(index: u8) -> u8 {
        if usize::from(index) + 1 >= CELLS {
            0
        } else {
            index + 1
        }
    }
}
