//! A single skill-range rule: "skill in `min..=max` ⇒ priority `p`".
//!
//! Every constructor and mutator clamps its input, so a [`RangeRule`]
//! value always satisfies `0 <= min <= max <= 20` and `1 <= priority <= 4`.
//! An inverted range is repaired by lowering `min` to `max`.
//!
//! ```
//! use skillwork_logic::rule::RangeRule;
//!
//! let rule = RangeRule::new(15, 5, 2);
//! assert_eq!((rule.min_value(), rule.max_value()), (5, 5));
//! assert!(rule.matches(5));
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{new_rule, priority, skill};

/// Unchecked rule fields as they appear in persisted data.
///
/// Values may be out of range or inverted; [`RangeRule::from_raw`] repairs
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRule {
    pub min_value: i32,
    pub max_value: i32,
    pub priority: i32,
}

/// A validated skill-range rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRule", into = "RawRule")]
pub struct RangeRule {
    min_value: u8,
    max_value: u8,
    priority: u8,
}

impl RangeRule {
    /// Build a rule, clamping every field into its valid range.
    pub fn new(min_value: i32, max_value: i32, priority: i32) -> Self {
        Self::from_raw(RawRule {
            min_value,
            max_value,
            priority,
        })
        .0
    }

    /// Build a rule from persisted fields.
    ///
    /// The second value is `true` when any field had to be corrected.
    pub fn from_raw(raw: RawRule) -> (Self, bool) {
        let max_value = clamp_skill(raw.max_value);
        let min_value = clamp_skill(raw.min_value).min(max_value);
        let priority = clamp_priority(raw.priority);
        let rule = Self {
            min_value,
            max_value,
            priority,
        };
        let corrected = i32::from(min_value) != raw.min_value
            || i32::from(max_value) != raw.max_value
            || i32::from(priority) != raw.priority;
        (rule, corrected)
    }

    pub fn min_value(&self) -> u8 {
        self.min_value
    }

    pub fn max_value(&self) -> u8 {
        self.max_value
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Whether `value` lies inside this rule's range (both ends inclusive).
    pub fn matches(&self, value: i32) -> bool {
        i32::from(self.min_value) <= value && value <= i32::from(self.max_value)
    }

    /// Slider edit of the lower bound.
    pub fn set_min_value(&mut self, value: i32) {
        self.min_value = clamp_skill(value);
        self.normalize();
    }

    /// Slider edit of the upper bound.
    pub fn set_max_value(&mut self, value: i32) {
        self.max_value = clamp_skill(value);
        self.normalize();
    }

    /// Edit of the assigned priority.
    pub fn set_priority(&mut self, value: i32) {
        self.priority = clamp_priority(value);
    }

    fn normalize(&mut self) {
        if self.min_value > self.max_value {
            self.min_value = self.max_value;
        }
    }
}

impl Default for RangeRule {
    fn default() -> Self {
        Self {
            min_value: new_rule::MIN_VALUE,
            max_value: new_rule::MAX_VALUE,
            priority: new_rule::PRIORITY,
        }
    }
}

impl From<RawRule> for RangeRule {
    fn from(raw: RawRule) -> Self {
        Self::from_raw(raw).0
    }
}

impl From<RangeRule> for RawRule {
    fn from(rule: RangeRule) -> Self {
        Self {
            min_value: i32::from(rule.min_value),
            max_value: i32::from(rule.max_value),
            priority: i32::from(rule.priority),
        }
    }
}

fn clamp_skill(value: i32) -> u8 {
    value.clamp(i32::from(skill::MIN), i32::from(skill::MAX)) as u8
}

fn clamp_priority(value: i32) -> u8 {
    value.clamp(i32::from(priority::HIGHEST), i32::from(priority::LOWEST)) as u8
}
