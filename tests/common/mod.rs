//! Shared test infrastructure for duolight integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use duolight::{
    CellStorage, EMPTY_CELL, Light, ModeId, PersistedState, PressSensor, PwmOutput, TickTimer,
};

// ============================================================================
// Mock PWM Output
// ============================================================================

/// Mock PWM output that records every level change
pub struct MockOutput {
    levels: [Option<u8>; Light::COUNT],
    history: heapless::Vec<(Light, u8), 128>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self {
            levels: [None; Light::COUNT],
            history: heapless::Vec::new(),
        }
    }

    /// Last level driven to `light`, if any
    pub fn level(&self, light: Light) -> Option<u8> {
        self.levels[light.index()]
    }

    pub fn history(&self) -> &[(Light, u8)] {
        &self.history
    }

    /// Levels driven to one light, in order
    pub fn levels_of(&self, light: Light) -> heapless::Vec<u8, 128> {
        self.history
            .iter()
            .filter(|(l, _)| *l == light)
            .map(|(_, level)| *level)
            .collect()
    }
}

impl PwmOutput for MockOutput {
    fn set_level(&mut self, light: Light, level: u8) {
        self.levels[light.index()] = Some(level);
        let _ = self.history.push((light, level));
    }
}

// ============================================================================
// Mock Cells
// ============================================================================

/// In-memory cells that log every write
pub struct RamCells<const N: usize> {
    pub cells: [u8; N],
    writes: heapless::Vec<(u8, u8), 512>,
}

impl<const N: usize> RamCells<N> {
    /// All cells erased
    pub fn erased() -> Self {
        Self {
            cells: [EMPTY_CELL; N],
            writes: heapless::Vec::new(),
        }
    }

    /// Cells with the given content, e.g. left behind by a previous boot
    pub fn from_cells(cells: [u8; N]) -> Self {
        Self {
            cells,
            writes: heapless::Vec::new(),
        }
    }

    /// All cells erased except `index`, which holds `state`
    pub fn holding(index: usize, state: PersistedState) -> Self {
        let mut cells = Self::erased();
        cells.cells[index] = state.encode();
        cells
    }

    /// Every `(index, value)` written so far
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Indices of cells that hold anything but the empty marker
    pub fn occupied(&self) -> heapless::Vec<usize, N> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, value)| **value != EMPTY_CELL)
            .map(|(index, _)| index)
            .collect()
    }
}

impl<const N: usize> CellStorage for RamCells<N> {
    fn read_cell(&mut self, index: u8) -> u8 {
        self.cells[index as usize]
    }

    fn write_cell(&mut self, index: u8, value: u8) {
        self.cells[index as usize] = value;
        let _ = self.writes.push((index, value));
    }
}

/// Cells that lose power after a fixed number of writes
///
/// Writes past the budget are silently dropped, as if the supply had
/// collapsed before the EEPROM committed them.
pub struct BrownoutCells<const N: usize> {
    pub cells: [u8; N],
    writes_left: usize,
}

impl<const N: usize> BrownoutCells<N> {
    pub fn new(cells: [u8; N], writes_left: usize) -> Self {
        Self { cells, writes_left }
    }
}

impl<const N: usize> CellStorage for BrownoutCells<N> {
    fn read_cell(&mut self, index: u8) -> u8 {
        self.cells[index as usize]
    }

    fn write_cell(&mut self, index: u8, value: u8) {
        if self.writes_left == 0 {
            return;
        }
        self.writes_left -= 1;
        self.cells[index as usize] = value;
    }
}

// ============================================================================
// Mock Sensor and Timer
// ============================================================================

/// Sensor that always reads the same charge
pub struct MockSensor(pub u8);

impl PressSensor for MockSensor {
    fn read(&mut self) -> u8 {
        self.0
    }
}

/// Reading that classifies as a short press with stock thresholds
pub const SHORT_PRESS: u8 = 250;
/// Reading that classifies as a medium press with stock thresholds
pub const MEDIUM_PRESS: u8 = 200;
/// Reading that classifies as a cold boot with stock thresholds
pub const COLD: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCall {
    Enable(u16),
    Disable,
}

/// Timer that records every arming call
pub struct MockTimer {
    calls: heapless::Vec<TimerCall, 8>,
}

impl MockTimer {
    pub fn new() -> Self {
        Self {
            calls: heapless::Vec::new(),
        }
    }

    pub fn calls(&self) -> &[TimerCall] {
        &self.calls
    }
}

impl TickTimer for MockTimer {
    fn enable_periodic(&mut self, period_ms: u16) {
        let _ = self.calls.push(TimerCall::Enable(period_ms));
    }

    fn disable_periodic(&mut self) {
        let _ = self.calls.push(TimerCall::Disable);
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub fn state(primary: ModeId, secondary: ModeId) -> PersistedState {
    PersistedState::new([primary, secondary])
}
