//! Compiled-in mode programs and per-light mode groups.
//!
//! The catalog is immutable data: a table of [`Mode`] programs indexed by
//! [`ModeId`] and one mode group per [`Light`]. Because the table is an
//! array with one slot per id, every lookup is total. Emptiness is checked
//! by [`Catalog::new`], which is a `const fn`, so a catalog defined as a
//! constant is validated at compile time.

use crate::types::{CatalogError, Light, ModeId, ModeStep};

/// A mode program: an ordered, non-empty list of steps that loops forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    steps: &'static [ModeStep],
    settles_into: Option<ModeId>,
}

impl Mode {
    /// Creates a looping mode.
    pub const fn new(steps: &'static [ModeStep]) -> Self {
        Self {
            steps,
            settles_into: None,
        }
    }

    /// Creates a mode that hands its light over to `next` once the final
    /// step has run out, instead of looping.
    ///
    /// A final step with indefinite duration never runs out, so `next` only
    /// takes effect when the last step is timed.
    pub const fn settling(steps: &'static [ModeStep], next: ModeId) -> Self {
        Self {
            steps,
            settles_into: Some(next),
        }
    }

    /// Returns the steps of this mode.
    #[inline]
    pub const fn steps(&self) -> &'static [ModeStep] {
        self.steps
    }

    /// Returns the mode this one settles into, if any.
    #[inline]
    pub const fn settles_into(&self) -> Option<ModeId> {
        self.settles_into
    }

    /// Returns the number of steps in this mode.
    #[inline]
    pub const fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// Read-only lookup of mode programs and mode groups.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    modes: [Mode; ModeId::COUNT],
    groups: [&'static [ModeId]; Light::COUNT],
}

impl Catalog {
    /// Creates a validated catalog.
    ///
    /// `modes` is indexed by [`ModeId::index`] and `groups` by
    /// [`Light::index`].
    ///
    /// # Errors
    /// * `EmptyMode` - A mode has no steps
    /// * `TooManySteps` - A mode has more than 255 steps
    /// * `EmptyGroup` - A light has an empty mode group
    /// * `GroupTooLong` - A mode group has more than 255 entries
    pub const fn new(
        modes: [Mode; ModeId::COUNT],
        groups: [&'static [ModeId]; Light::COUNT],
    ) -> Result<Self, CatalogError> {
        let mut i = 0;
        while i < ModeId::COUNT {
            let id = ModeId::ALL[i];
            let len = modes[i].steps.len();
            if len == 0 {
                return Err(CatalogError::EmptyMode(id));
            }
            if len > u8::MAX as usize {
                return Err(CatalogError::TooManySteps(id));
            }
            i += 1;
        }

        let mut l = 0;
        while l < Light::COUNT {
            let light = Light::ALL[l];
            let len = groups[l].len();
            if len == 0 {
                return Err(CatalogError::EmptyGroup(light));
            }
            if len > u8::MAX as usize {
                return Err(CatalogError::GroupTooLong(light));
            }
            l += 1;
        }

        Ok(Self { modes, groups })
    }

    /// Returns the program of a mode.
    #[inline]
    pub const fn mode(&self, id: ModeId) -> &Mode {
        &self.modes[id.index()]
    }

    /// Returns the steps of a mode.
    #[inline]
    pub const fn steps(&self, id: ModeId) -> &'static [ModeStep] {
        self.modes[id.index()].steps
    }

    /// Returns one step of a mode, or `None` if `index` is out of range.
    #[inline]
    pub fn step(&self, id: ModeId, index: usize) -> Option<ModeStep> {
        self.steps(id).get(index).copied()
    }

    /// Returns the modes a light cycles through.
    #[inline]
    pub const fn group(&self, light: Light) -> &'static [ModeId] {
        self.groups[light.index()]
    }

    /// Returns the first entry of a light's mode group.
    ///
    /// This is the light's mode after a cold boot and the cycler's
    /// fallback for a mode outside the group.
    #[inline]
    pub const fn default_mode(&self, light: Light) -> ModeId {
        self.groups[light.index()][0]
    }
}

const MOON: [ModeStep; 1] = [ModeStep::hold(3)];
const LOW: [ModeStep; 1] = [ModeStep::hold(15)];
const MEDIUM: [ModeStep; 1] = [ModeStep::hold(128)];
const HIGH: [ModeStep; 1] = [ModeStep::hold(180)];
const TURBO: [ModeStep; 1] = [ModeStep::new(255, 30_000)];
const BLINK: [ModeStep; 2] = [ModeStep::new(170, 100), ModeStep::new(0, 400)];
const DOUBLE_BLINK: [ModeStep; 4] = [
    ModeStep::new(170, 100),
    ModeStep::new(0, 200),
    ModeStep::new(170, 100),
    ModeStep::new(0, 1_600),
];
const BEACON: [ModeStep; 2] = [ModeStep::new(255, 50), ModeStep::new(0, 2_950)];
// Fully dark, unlike a dim standby level.
const OFF: [ModeStep; 1] = [ModeStep::hold(0)];

const PRIMARY_GROUP: [ModeId; 5] = [
    ModeId::Moon,
    ModeId::Low,
    ModeId::Medium,
    ModeId::High,
    ModeId::Turbo,
];
const SECONDARY_GROUP: [ModeId; 5] = [
    ModeId::Moon,
    ModeId::Low,
    ModeId::Medium,
    ModeId::High,
    ModeId::Blink,
];

/// The stock flashlight catalog.
///
/// The primary light cycles moon, low, medium, high and turbo; turbo runs
/// at full power for 30 seconds and then settles into high. The secondary
/// light cycles moon, low, medium, high and blink.
pub const FLASHLIGHT: Catalog = match Catalog::new(
    [
        Mode::new(&MOON),
        Mode::new(&LOW),
        Mode::new(&MEDIUM),
        Mode::new(&HIGH),
        Mode::settling(&TURBO, ModeId::High),
        Mode::new(&BLINK),
        Mode::new(&DOUBLE_BLINK),
        Mode::new(&BEACON),
        Mode::new(&OFF),
    ],
    [&PRIMARY_GROUP, &SECONDARY_GROUP],
) {
    Ok(catalog) => catalog,
    Err(_) => panic!("stock flashlight catalog is invalid"),
};
