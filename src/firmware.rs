//! Boot sequence, command handling and the per-tick entry point.
//!
//! [`Firmware`] ties the catalog, the tick scheduler and the wear-leveled
//! store together. The boot path runs once at power-on:
//!
//! 1. disable the tick timer
//! 2. restore the persisted modes, if any
//! 3. read the press sensor and classify the reading
//! 4. cycle the selected light, or apply defaults on a cold boot
//! 5. enable the tick timer
//!
//! After that, [`Firmware::tick`] is the only entry point, called from the
//! timer interrupt.

use crate::catalog::Catalog;
use crate::cells::CellStorage;
use crate::command::{Command, PressSensor};
use crate::config::FirmwareConfig;
use crate::cycler::next_mode;
use crate::runtime::{LightState, PwmOutput};
use crate::scheduler::{TickReport, TickScheduler};
use crate::store::{DEFAULT_LOG_CELLS, PersistedState, WearLevelStore};
use crate::time::TickTimer;
use crate::types::Light;

/// The flashlight control core.
///
/// # Type Parameters
/// * `O` - PWM output implementation
/// * `S` - Non-volatile cell storage implementation
/// * `CELLS` - Number of cells in the wear-leveled log
pub struct Firmware<O: PwmOutput, S: CellStorage, const CELLS: usize = DEFAULT_LOG_CELLS> {
    catalog: &'static Catalog,
    config: FirmwareConfig,
    output: O,
    store: WearLevelStore<S, CELLS>,
    scheduler: TickScheduler,
}

impl<O: PwmOutput, S: CellStorage, const CELLS: usize> Firmware<O, S, CELLS> {
    /// Creates the firmware with every light in its default mode.
    ///
    /// Nothing is read from or written to storage until [`boot`](Self::boot).
    pub fn new(catalog: &'static Catalog, output: O, storage: S, config: FirmwareConfig) -> Self {
        let defaults = Light::ALL.map(|light| catalog.default_mode(light));
        Self {
            catalog,
            config,
            output,
            store: WearLevelStore::new(storage),
            scheduler: TickScheduler::new(defaults, config.tick_ms),
        }
    }

    /// Runs the power-on sequence and returns the command it applied.
    ///
    /// The timer is disabled on entry and enabled, with the configured tick
    /// period, once the lights are set up.
    pub fn boot<P: PressSensor, T: TickTimer>(&mut self, sensor: &mut P, timer: &mut T) -> Command {
        timer.disable_periodic();

        self.restore();

        let reading = sensor.read();
        let command = self.config.thresholds.classify(reading);
        debug!("press reading {=u8} -> {}", reading, command);
        self.apply(command);

        timer.enable_periodic(self.config.tick_ms.get());
        command
    }

    /// Applies a power-on command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Cycle(light) => self.cycle(light),
            Command::ColdBoot => self.apply_defaults(),
        }
    }

    /// Advances `light` to the next mode of its group and persists the
    /// result.
    ///
    /// A current mode outside the group falls back to the group's first
    /// entry.
    pub fn cycle(&mut self, light: Light) {
        let current = self.scheduler.state(light).mode();
        let next = next_mode(self.catalog.group(light), current);
        debug!("{} cycles from {} to {}", light, current, next);

        self.scheduler.apply(light, next);
        self.persist();
    }

    /// Puts every light in its default mode with a single save.
    pub fn apply_defaults(&mut self) {
        for light in Light::ALL {
            self.scheduler.apply(light, self.catalog.default_mode(light));
        }
        debug!("applied default modes");
        self.persist();
    }

    /// Advances every light by one tick.
    ///
    /// If a light's mode settled into another during the tick, the new
    /// modes are persisted before returning.
    pub fn tick(&mut self) -> TickReport {
        let report = self.scheduler.tick(self.catalog, &mut self.output);
        if report.mode_changed() {
            self.persist();
        }
        report
    }

    /// Returns the state of `light`.
    pub fn light(&self, light: Light) -> &LightState {
        self.scheduler.state(light)
    }

    /// Returns the modes as they would be persisted now.
    pub fn persisted(&self) -> PersistedState {
        PersistedState::new(self.scheduler.modes())
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FirmwareConfig {
        &self.config
    }

    /// Returns a reference to the PWM output.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Returns a reference to the store.
    pub fn store(&self) -> &WearLevelStore<S, CELLS> {
        &self.store
    }

    fn restore(&mut self) {
        let Some(state) = self.store.restore() else {
            debug!("no persisted modes, keeping defaults");
            return;
        };

        for light in Light::ALL {
            self.scheduler.apply(light, state.mode(light));
        }
        debug!("restored {}", state);
    }

    fn persist(&mut self) {
        let state = self.persisted();
        self.store.save(state);
    }
}

impl<O, S, const CELLS: usize> core::fmt::Debug for Firmware<O, S, CELLS>
where
    O: PwmOutput,
    S: CellStorage,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Firmware")
            .field("config", &self.config)
            .field("scheduler", &self.scheduler)
            .field("cursor", &self.store.cursor())
            .finish()
    }
}
