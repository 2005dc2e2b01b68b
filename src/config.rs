//! Firmware configuration.

use core::num::NonZeroU16;

use crate::command::Thresholds;
use crate::time::DEFAULT_TICK_MS;
use crate::types::ConfigError;

/// Tunables of the firmware.
///
/// The number of log cells is a const generic of
/// [`Firmware`](crate::Firmware) rather than a field here, because it sizes
/// the store at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareConfig {
    /// Time between two ticks. Step durations are consumed in these units.
    pub tick_ms: NonZeroU16,

    /// Press-duration bucket boundaries.
    pub thresholds: Thresholds,
}

impl FirmwareConfig {
    /// Stock configuration.
    pub const DEFAULT: Self = Self {
        tick_ms: match NonZeroU16::new(DEFAULT_TICK_MS) {
            Some(tick_ms) => tick_ms,
            None => panic!("default tick period is zero"),
        },
        thresholds: Thresholds::DEFAULT,
    };

    /// Sets the tick period.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroTickPeriod`] if `tick_ms` is 0.
    pub const fn with_tick_ms(mut self, tick_ms: u16) -> Result<Self, ConfigError> {
        match NonZeroU16::new(tick_ms) {
            Some(tick_ms) => {
                self.tick_ms = tick_ms;
                Ok(self)
            }
            None => Err(ConfigError::ZeroTickPeriod),
        }
    }

    /// Sets the press thresholds.
    pub const fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
