//! Ordered rules for one work category.
//!
//! A [`RuleSet`] keeps its rules sorted ascending by `min_value` after
//! every mutation. Evaluation is first-match-wins, so this order decides
//! which of two overlapping rules applies. Rules with equal `min_value`
//! keep insertion order, whether the tie comes from `add` or from a later
//! edit.
//!
//! Rules are addressed by [`RuleId`], a handle that stays valid while the
//! rule is in the set regardless of how sorting moves it around.

use serde::{Deserialize, Serialize};

use crate::rule::RangeRule;

/// Identity of a rule within its owning [`RuleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    id: RuleId,
    rule: RangeRule,
}

/// Sorted list of range rules for one category.
///
/// Two sets are equal when they hold the same rules in the same order;
/// handles are not compared.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: Vec<Entry>,
    next_id: u64,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from rules in any order.
    pub fn from_rules(rules: impl IntoIterator<Item = RangeRule>) -> Self {
        let mut set = Self::new();
        for rule in rules {
            set.push_unsorted(rule);
        }
        set.sort();
        set
    }

    /// Add a rule and return its handle. The set is re-sorted.
    pub fn add(&mut self, rule: RangeRule) -> RuleId {
        let id = self.push_unsorted(rule);
        self.sort();
        id
    }

    /// Remove a rule by identity.
    pub fn remove(&mut self, id: RuleId) -> Option<RangeRule> {
        let index = self.index_of(id)?;
        Some(self.entries.remove(index).rule)
    }

    /// Drop every rule. The set stays registered with its store.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: RuleId) -> Option<&RangeRule> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.rule)
    }

    /// Move the lower bound of a rule. Returns `false` for an unknown id.
    pub fn set_min(&mut self, id: RuleId, value: i32) -> bool {
        self.edit(id, |rule| rule.set_min_value(value))
    }

    /// Move the upper bound of a rule. Returns `false` for an unknown id.
    pub fn set_max(&mut self, id: RuleId, value: i32) -> bool {
        self.edit(id, |rule| rule.set_max_value(value))
    }

    /// Change a rule's priority. Returns `false` for an unknown id.
    pub fn set_priority(&mut self, id: RuleId, value: i32) -> bool {
        self.edit(id, |rule| rule.set_priority(value))
    }

    /// Apply an arbitrary edit to one rule, then restore ordering.
    pub fn edit(&mut self, id: RuleId, f: impl FnOnce(&mut RangeRule)) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        f(&mut self.entries[index].rule);
        self.sort();
        true
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &RangeRule> + '_ {
        self.entries.iter().map(|e| &e.rule)
    }

    /// Rules with their handles, in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &RangeRule)> + '_ {
        self.entries.iter().map(|e| (e.id, &e.rule))
    }

    /// Whether the set is ascending by `min_value`.
    pub fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].rule.min_value() <= w[1].rule.min_value())
    }

    fn push_unsorted(&mut self, rule: RangeRule) -> RuleId {
        let id = RuleId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, rule });
        id
    }

    fn index_of(&self, id: RuleId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn sort(&mut self) {
        // Ids are handed out in insertion order.
        self.entries.sort_by_key(|e| (e.rule.min_value(), e.id));
    }
}

impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        self.rules().eq(other.rules())
    }
}

impl Eq for RuleSet {}
