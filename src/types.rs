//! Core types shared by the catalog, the runtime and the store.

/// One of the independently controlled PWM output channels.
///
/// [`Light::ALL`] is also the order in which the tick scheduler services
/// the lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Light {
    /// The first channel. Its mode is stored in the high nibble of a log cell.
    Primary,
    /// The second channel. Its mode is stored in the low nibble of a log cell.
    Secondary,
}

impl Light {
    /// Number of lights in the system.
    pub const COUNT: usize = 2;

    /// All lights, in scheduling order.
    pub const ALL: [Light; Light::COUNT] = [Light::Primary, Light::Secondary];

    /// Slot of this light in per-light arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Identifier of a mode program.
///
/// Ids fit in four bits so that both lights' modes pack into a single
/// byte. Raw value [`ModeId::NULL`] and raw value [`ModeId::INVALID`] are
/// reserved and are deliberately not variants: the first can never be a
/// light's mode, the second keeps an encoded cell distinguishable from an
/// erased one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ModeId {
    /// Roughly the light of a full moon.
    Moon = 1,
    Low = 2,
    Medium = 3,
    High = 4,
    /// Full power for a limited time.
    Turbo = 5,
    Blink = 6,
    DoubleBlink = 7,
    Beacon = 8,
    Off = 9,
}

impl ModeId {
    /// Reserved raw id that never names a mode.
    pub const NULL: u8 = 0x0;

    /// Reserved raw id, all bits of a nibble set. Never encoded.
    pub const INVALID: u8 = 0xF;

    /// Number of real modes.
    pub const COUNT: usize = 9;

    /// All real modes, in raw id order.
    pub const ALL: [ModeId; ModeId::COUNT] = [
        ModeId::Moon,
        ModeId::Low,
        ModeId::Medium,
        ModeId::High,
        ModeId::Turbo,
        ModeId::Blink,
        ModeId::DoubleBlink,
        ModeId::Beacon,
        ModeId::Off,
    ];

    /// Returns the raw four-bit id.
    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Parses a raw id. Reserved and unknown ids yield `None`.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(ModeId::Moon),
            2 => Some(ModeId::Low),
            3 => Some(ModeId::Medium),
            4 => Some(ModeId::High),
            5 => Some(ModeId::Turbo),
            6 => Some(ModeId::Blink),
            7 => Some(ModeId::DoubleBlink),
            8 => Some(ModeId::Beacon),
            9 => Some(ModeId::Off),
            _ => None,
        }
    }

    /// Slot of this mode in the catalog's mode table.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize - 1
    }
}

/// A single segment of a mode program: hold `level` for `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeStep {
    /// PWM duty, 0 (dark) to 255 (full power).
    pub level: u8,

    /// How long the step lasts. Zero means the step never ends.
    pub duration_ms: u16,
}

impl ModeStep {
    /// Creates a timed step.
    #[inline]
    pub const fn new(level: u8, duration_ms: u16) -> Self {
        Self { level, duration_ms }
    }

    /// Creates a step that holds `level` indefinitely.
    #[inline]
    pub const fn hold(level: u8) -> Self {
        Self::new(level, 0)
    }

    /// Returns true if this step never expires.
    #[inline]
    pub const fn is_indefinite(&self) -> bool {
        self.duration_ms == 0
    }
}

/// Catalog validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CatalogError {
    /// A mode has no steps.
    EmptyMode(ModeId),

    /// A mode has more steps than a step index can address.
    TooManySteps(ModeId),

    /// A light has no modes to cycle through.
    EmptyGroup(Light),

    /// A light's mode group is longer than a group index can address.
    GroupTooLong(Light),
}

impl core::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CatalogError::EmptyMode(id) => {
                write!(f, "mode {:?} must have at least one step", id)
            }
            CatalogError::TooManySteps(id) => {
                write!(f, "mode {:?} has more than 255 steps", id)
            }
            CatalogError::EmptyGroup(light) => {
                write!(f, "mode group of {:?} must not be empty", light)
            }
            CatalogError::GroupTooLong(light) => {
                write!(f, "mode group of {:?} has more than 255 entries", light)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CatalogError {}

/// Firmware configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The tick period is zero, so timed steps would never run out.
    ZeroTickPeriod,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroTickPeriod => write!(f, "tick period must be at least 1 ms"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
