#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Catalog`**: Compiled-in mode programs (`Mode`) and the mode group each light cycles through
//! - **`ModeStep`**: A single output level + duration within a mode; a zero duration holds forever
//! - **`LightState`**: The complete suspended state of one light: mode, step index, countdown
//! - **`TickScheduler`**: Advances every light's state machine once per timer tick
//! - **`WearLevelStore`**: Persists both lights' modes in a circular log of single-byte cells
//! - **`Thresholds`**: Classifies the power-on press reading into a `Command`
//! - **`Firmware`**: Boot sequence, command handling and the per-tick entry point
//! - **`SharedFirmware`**: A `static`-friendly wrapper shared by the boot path and the tick interrupt
//! - **`PwmOutput`**, **`PressSensor`**, **`CellStorage`**, **`TickTimer`**: Traits to implement for your hardware

#[macro_use]
mod log;

pub mod types;
pub mod catalog;
pub mod cells;
pub mod store;
pub mod runtime;
pub mod scheduler;
pub mod cycler;
pub mod command;
pub mod time;
pub mod config;
pub mod firmware;
pub mod shared;

pub use catalog::{Catalog, FLASHLIGHT, Mode};
pub use cells::{CellStorage, EMPTY_CELL, StorageCells};
pub use command::{Command, PressSensor, Thresholds};
pub use config::FirmwareConfig;
pub use cycler::next_mode;
pub use firmware::Firmware;
pub use runtime::{Advance, Countdown, LightState, PwmOutput};
pub use scheduler::{TickReport, TickScheduler};
pub use shared::{SharedFirmware, TickGate};
pub use store::{DEFAULT_LOG_CELLS, PersistedState, WearLevelStore};
pub use time::{DEFAULT_TICK_MS, TickTimer};
pub use types::{CatalogError, ConfigError, Light, ModeId, ModeStep};
