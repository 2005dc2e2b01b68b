//! Tick scheduler that multiplexes every light's state machine.
//!
//! [`TickScheduler`] owns one [`LightState`] per light and advances all of
//! them, in [`Light::ALL`] order, each time the periodic timer fires.

use core::num::NonZeroU16;

use crate::catalog::Catalog;
use crate::runtime::{Advance, LightState, PwmOutput};
use crate::types::{Light, ModeId};
use heapless::Vec;

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    emitted: Vec<(Light, u8), { Light::COUNT }>,
    settled: Vec<Light, { Light::COUNT }>,
}

impl TickReport {
    /// Levels driven this tick, in scheduling order.
    pub fn emitted(&self) -> &[(Light, u8)] {
        &self.emitted
    }

    /// Level driven to `light` this tick, if its step changed.
    pub fn level(&self, light: Light) -> Option<u8> {
        self.emitted
            .iter()
            .find(|(l, _)| *l == light)
            .map(|(_, level)| *level)
    }

    /// Lights whose mode ran out and settled into another mode this tick.
    pub fn settled(&self) -> &[Light] {
        &self.settled
    }

    /// Returns true if any light changed mode this tick.
    pub fn mode_changed(&self) -> bool {
        !self.settled.is_empty()
    }
}

/// Runs every light's state machine once per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickScheduler {
    lights: [LightState; Light::COUNT],
    quantum_ms: NonZeroU16,
}

impl TickScheduler {
    /// Creates a scheduler with each light starting `modes[light.index()]`.
    ///
    /// # Arguments
    /// * `modes` - Initial mode per light
    /// * `quantum_ms` - Time between two ticks
    pub fn new(modes: [ModeId; Light::COUNT], quantum_ms: NonZeroU16) -> Self {
        Self {
            lights: core::array::from_fn(|i| LightState::new(modes[i])),
            quantum_ms,
        }
    }

    /// Advances every light by one tick and drives the outputs.
    ///
    /// A light whose mode settles into another is switched to that mode and
    /// advanced again within the same tick, so its output never goes stale
    /// for a tick.
    pub fn tick<O: PwmOutput>(&mut self, catalog: &Catalog, output: &mut O) -> TickReport {
        let mut report = TickReport::default();

        for light in Light::ALL {
            let state = &mut self.lights[light.index()];
            let mut advance = state.advance(catalog, self.quantum_ms);

            if let Advance::Settle(next) = advance {
                debug!("{} settles from {} into {}", light, state.mode(), next);
                state.apply_mode(next);
                let _ = report.settled.push(light);
                advance = state.advance(catalog, self.quantum_ms);
            }

            if let Advance::Emit(level) = advance {
                output.set_level(light, level);
                let _ = report.emitted.push((light, level));
            }
        }

        report
    }

    /// Switches `light` to `mode`, starting on the next tick.
    #[inline]
    pub fn apply(&mut self, light: Light, mode: ModeId) {
        self.lights[light.index()].apply_mode(mode);
    }

    /// Returns the state of `light`.
    #[inline]
    pub fn state(&self, light: Light) -> &LightState {
        &self.lights[light.index()]
    }

    /// Returns the current mode of every light, indexed by [`Light::index`].
    pub fn modes(&self) -> [ModeId; Light::COUNT] {
        core::array::from_fn(|i| self.lights[i].mode())
    }

    /// Returns the tick period.
    #[inline]
    pub fn quantum_ms(&self) -> NonZeroU16 {
        self.quantum_ms
    }
}
