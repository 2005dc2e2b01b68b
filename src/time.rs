//! Periodic tick timer abstraction.

/// Default time between two ticks.
pub const DEFAULT_TICK_MS: u16 = 500;

/// Trait for abstracting the periodic interrupt that drives the scheduler.
///
/// The firmware calls each method once per boot: it disables the timer
/// before touching shared state and enables it once the lights are set up.
pub trait TickTimer {
    /// Starts raising the tick interrupt every `period_ms` milliseconds.
    fn enable_periodic(&mut self, period_ms: u16);

    /// Stops the tick interrupt.
    fn disable_periodic(&mut self);
}

impl<T: TickTimer + ?Sized> TickTimer for &mut T {
    fn enable_periodic(&mut self, period_ms: u16) {
        (**self).enable_periodic(period_ms)
    }

    fn disable_periodic(&mut self) {
        (**self).disable_periodic()
    }
}
