//! Power-on command classification.
//!
//! The only user input is how long the power switch was released before
//! the current power-on. A capacitor that drains while power is off is
//! sampled once at boot: the more charge is left, the shorter the tap.

use crate::types::Light;

/// Trait for abstracting the press-duration sensor.
pub trait PressSensor {
    /// Samples the residual charge, 0 (fully drained) to 255 (just tapped).
    ///
    /// Larger values mean power was removed more recently.
    fn read(&mut self) -> u8;
}

impl<T: PressSensor + ?Sized> PressSensor for &mut T {
    fn read(&mut self) -> u8 {
        (**self).read()
    }
}

/// What to do at power-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Advance the light to the next mode in its group.
    Cycle(Light),

    /// Start every light in its default mode.
    ColdBoot,
}

/// Press-duration bucket boundaries.
///
/// Both bounds are on elapsed off-time, `255 - reading`. A press with
/// elapsed time below `short` cycles the primary light, below `medium` the
/// secondary light; anything longer is a cold boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    /// Upper bound (exclusive) of a short press.
    pub short: u8,

    /// Upper bound (exclusive) of a medium press.
    pub medium: u8,
}

impl Thresholds {
    /// Stock thresholds.
    pub const DEFAULT: Self = Self {
        short: 30,
        medium: 70,
    };

    /// Maps a sensor reading to a command. Total over all readings.
    pub const fn classify(&self, reading: u8) -> Command {
        let elapsed = u8::MAX - reading;
        if elapsed < self.short {
            Command::Cycle(Light::Primary)
        } else if elapsed < self.medium {
            Command::Cycle(Light::Secondary)
        } else {
            Command::ColdBoot
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}
