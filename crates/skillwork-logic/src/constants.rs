//! Engine constants for the skill scale, priority scale and scheduling defaults.
//!
//! These are plain integer constants with no host dependency. The host
//! game, the simtest harness and the persistence layer all share them.

/// Skill level scale used as the attribute value of range rules.
pub mod skill {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 20;
}

/// Work priority scale written back to the host.
///
/// `1` is the most urgent active priority, `4` the least urgent. `0` is
/// reserved for "do not work this category" and never stored in a rule.
pub mod priority {
    pub const DISABLED: u8 = 0;
    pub const HIGHEST: u8 = 1;
    pub const LOWEST: u8 = 4;
    /// Lowest but one, used for freshly created rules.
    pub const DEFAULT: u8 = 3;
}

/// Reconciliation scheduling.
pub mod schedule {
    /// Host ticks between timer-driven passes (~2 s at normal speed).
    pub const DEFAULT_INTERVAL_TICKS: u64 = 120;
    /// Upper bound accepted from configuration files.
    pub const MAX_INTERVAL_TICKS: u64 = 60_000;
}

/// Defaults for a rule created through the editor surface.
pub mod new_rule {
    pub const MIN_VALUE: u8 = 0;
    pub const MAX_VALUE: u8 = 5;
    pub const PRIORITY: u8 = super::priority::DEFAULT;
}

/// Persisted rule record format version.
pub const RULES_VERSION: u32 = 1;
