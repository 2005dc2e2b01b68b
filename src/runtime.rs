//! Per-light mode state machine.
//!
//! Provides [`LightState`], the whole suspended state of one light between
//! ticks, and the [`PwmOutput`] trait for the hardware it drives. Because a
//! light's state is three small fields and nothing else, any number of
//! lights can be multiplexed inside one timer interrupt without a stack per
//! light.

use core::num::NonZeroU16;

use crate::catalog::Catalog;
use crate::types::{Light, ModeId};

/// Trait for abstracting the PWM outputs.
///
/// Implement this for your timer/PWM peripheral. A level takes effect by
/// the next tick at the latest. Handle any hardware errors internally -
/// this method cannot fail.
pub trait PwmOutput {
    /// Sets the duty cycle of `light`'s channel, 0 (dark) to 255 (full power).
    fn set_level(&mut self, light: Light, level: u8);
}

impl<T: PwmOutput + ?Sized> PwmOutput for &mut T {
    fn set_level(&mut self, light: Light, level: u8) {
        (**self).set_level(light, level)
    }
}

/// Time left in the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Countdown {
    /// A mode was just applied; its first step fires on the next tick.
    Pending,

    /// Milliseconds left until the current step ends.
    Remaining(u16),

    /// The current step is indefinite. Nothing changes until a new mode is
    /// applied.
    Held,
}

/// Outcome of advancing a light by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Advance {
    /// The current step is still running. Output unchanged.
    Wait,

    /// The light is parked on an indefinite step. Output unchanged.
    Hold,

    /// A new step started; drive the output to this level.
    Emit(u8),

    /// The mode ran out and hands the light over to another mode. The
    /// caller applies that mode; the state itself is left untouched.
    Settle(ModeId),
}

/// Mutable state of one light: which mode, which step, how long left.
///
/// `step_index` is the step that fires when the countdown runs out. It is
/// always a valid index into the mode's steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightState {
    mode: ModeId,
    step_index: u8,
    countdown: Countdown,
}

impl LightState {
    /// Creates a state that starts `mode` from its first step on the next
    /// tick.
    #[inline]
    pub const fn new(mode: ModeId) -> Self {
        Self {
            mode,
            step_index: 0,
            countdown: Countdown::Pending,
        }
    }

    /// Switches to `mode`, restarting from its first step on the next tick.
    #[inline]
    pub fn apply_mode(&mut self, mode: ModeId) {
        *self = Self::new(mode);
    }

    /// Advances the state machine by one tick of `quantum_ms`.
    ///
    /// While at least one quantum is left the countdown is decremented.
    /// Once less than a quantum is left (or the mode was just applied) the
    /// step at `step_index` fires: its level is emitted, the countdown is
    /// reset to the step's duration and `step_index` moves on, wrapping to 0
    /// after the last step. A step of `d` ms thus lasts `d / quantum + 1`
    /// ticks. An indefinite step parks the light.
    ///
    /// When a mode with a settle target runs out of its final step,
    /// [`Advance::Settle`] is returned instead of looping.
    pub fn advance(&mut self, catalog: &Catalog, quantum_ms: NonZeroU16) -> Advance {
        let quantum_ms = quantum_ms.get();
        match self.countdown {
            Countdown::Held => return Advance::Hold,
            Countdown::Remaining(left) if left >= quantum_ms => {
                self.countdown = Countdown::Remaining(left - quantum_ms);
                return Advance::Wait;
            }
            Countdown::Remaining(_) => {
                // step_index wrapped: the final step just ran out
                if self.step_index == 0 {
                    if let Some(next) = catalog.mode(self.mode).settles_into() {
                        return Advance::Settle(next);
                    }
                }
            }
            Countdown::Pending => {}
        }

        let steps = catalog.steps(self.mode);
        let index = usize::from(self.step_index);
        let Some(step) = steps.get(index) else {
            // Unreachable with a validated catalog; restart the mode.
            self.step_index = 0;
            self.countdown = Countdown::Pending;
            return Advance::Wait;
        };

        self.countdown = if step.is_indefinite() {
            Countdown::Held
        } else {
            Countdown::Remaining(step.duration_ms)
        };
        self.step_index = if index + 1 >= steps.len() {
            0
        } else {
            self.step_index + 1
        };

        Advance::Emit(step.level)
    }

    /// Returns the current mode.
    #[inline]
    pub fn mode(&self) -> ModeId {
        self.mode
    }

    /// Returns the index of the step that fires next.
    #[inline]
    pub fn step_index(&self) -> u8 {
        self.step_index
    }

    /// Returns the time left in the current step.
    #[inline]
    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    /// Returns true if the light is parked on an indefinite step.
    #[inline]
    pub fn is_held(&self) -> bool {
        self.countdown == Countdown::Held
    }
}
