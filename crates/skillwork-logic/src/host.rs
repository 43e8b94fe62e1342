//! Host collaborator interfaces.
//!
//! The engine owns no entities. Everything it knows about colonists comes
//! through these traits, read fresh on every pass:
//!
//! - [`EligibilityProvider`]: which entities are considered at all
//!   (alive, capable, not excluded, owned by the player's faction).
//! - [`EntityAttributeSource`]: per-category skill, disabled flag and
//!   current priority, plus the write-back.
//! - [`HostClock`]: tick counter and "may a timer pass run now" query.
//!
//! A [`Host`] bundles the first two. Either may be unavailable (for
//! instance while the host is still loading), in which case a pass is
//! skipped rather than failed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::CategoryKey;
use crate::error::HostError;

/// Opaque handle to a host entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Supplies the entities a pass should consider.
pub trait EligibilityProvider {
    /// Current eligible entities, already filtered. May be empty.
    fn list_eligible(&self) -> Vec<EntityId>;
}

/// Per-entity, per-category state owned by the host.
pub trait EntityAttributeSource {
    /// Whether the host forbids this entity from doing this category.
    fn is_disabled(&self, entity: EntityId, category: &CategoryKey) -> bool;

    /// Skill level relevant to the category, `0` if there is none.
    fn attribute_value(&self, entity: EntityId, category: &CategoryKey) -> i32;

    /// Priority currently assigned by the host.
    fn current_priority(&self, entity: EntityId, category: &CategoryKey) -> u8;

    /// Assign a new priority.
    fn set_priority(
        &mut self,
        entity: EntityId,
        category: &CategoryKey,
        priority: u8,
    ) -> Result<(), HostError>;
}

/// Access to the host's collaborators for one pass.
pub trait Host {
    fn eligibility(&self) -> Option<&dyn EligibilityProvider>;
    fn attributes(&mut self) -> Option<&mut dyn EntityAttributeSource>;
}

/// Host simulation clock as seen by the timer trigger.
pub trait HostClock {
    /// Monotonic simulation tick counter.
    fn ticks(&self) -> u64;

    /// `true` when a session is active, a map is loaded and the clock is
    /// not paused.
    fn can_run(&self) -> bool;
}
