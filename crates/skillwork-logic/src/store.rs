//! Category → rule set mapping, with load-time normalization.
//!
//! # Load normalization
//!
//! [`RuleStore::load`] never fails. It repairs the record in four steps:
//!
//! 1. drop categories the catalog no longer knows,
//! 2. turn a missing rule list into an empty one,
//! 3. remove missing rules from each list,
//! 4. clamp every rule and repair inverted ranges.
//!
//! Names the catalog resolves to a category that is already loaded (an
//! alias or a renamed category) have their rules merged into that set.
//!
//! Each correction is counted in the returned [`LoadReport`] and logged as
//! a warning.
//!
//! ```
//! use skillwork_logic::category::AnyCategory;
//! use skillwork_logic::persistence::load_json_str;
//! use skillwork_logic::store::RuleStore;
//!
//! let record = load_json_str(
//!     r#"{"version":1,"categories":{"Mining":[null,{"min_value":15,"max_value":5,"priority":2}]}}"#,
//! ).unwrap();
//! let (store, report) = RuleStore::load(record, &AnyCategory);
//! assert_eq!(report.null_rules_removed, 1);
//! assert_eq!(report.rules_corrected, 1);
//! assert!(store.has_any_rules());
//! ```

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::category::{CategoryCatalog, CategoryKey};
use crate::persistence::RuleStoreRecord;
use crate::rule::{RangeRule, RawRule};
use crate::rule_set::RuleSet;

/// Corrections applied while loading a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Categories whose name no longer resolves.
    pub categories_dropped: usize,
    /// Categories whose rule list was missing.
    pub null_lists_replaced: usize,
    /// Missing entries removed from rule lists.
    pub null_rules_removed: usize,
    /// Rules with out-of-range or inverted fields.
    pub rules_corrected: usize,
    /// Persisted names folded into a category already loaded under
    /// another name.
    pub categories_merged: usize,
}

impl LoadReport {
    /// Whether the record needed no repair.
    pub fn is_clean(&self) -> bool {
        *self == LoadReport::default()
    }
}

/// Rule sets per category for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleStore {
    sets: BTreeMap<CategoryKey, RuleSet>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the rule set for `category`, inserting an empty one first if
    /// the category has none.
    ///
    /// This is the only accessor that adds categories. Editors use it to
    /// obtain a mutable handle without registering the category first.
    pub fn get_or_insert(&mut self, category: CategoryKey) -> &mut RuleSet {
        self.sets.entry(category).or_default()
    }

    /// Read-only lookup. Never inserts.
    pub fn get(&self, category: &CategoryKey) -> Option<&RuleSet> {
        self.sets.get(category)
    }

    /// Mutable lookup. Never inserts.
    pub fn get_mut(&mut self, category: &CategoryKey) -> Option<&mut RuleSet> {
        self.sets.get_mut(category)
    }

    /// Forget a category and all its rules.
    pub fn remove_category(&mut self, category: &CategoryKey) -> Option<RuleSet> {
        self.sets.remove(category)
    }

    /// Whether any category has at least one rule.
    pub fn has_any_rules(&self) -> bool {
        self.sets.values().any(|set| !set.is_empty())
    }

    /// Every registered category, including those with empty sets.
    pub fn categories(&self) -> impl Iterator<Item = &CategoryKey> + '_ {
        self.sets.keys()
    }

    /// Categories with at least one rule, in iteration order.
    pub fn active(&self) -> impl Iterator<Item = (&CategoryKey, &RuleSet)> + '_ {
        self.sets.iter().filter(|(_, set)| !set.is_empty())
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Total rule count across all categories.
    pub fn rule_count(&self) -> usize {
        self.sets.values().map(RuleSet::len).sum()
    }

    /// Build a store from a persisted record, repairing it as needed.
    pub fn load(record: RuleStoreRecord, catalog: &dyn CategoryCatalog) -> (Self, LoadReport) {
        let mut report = LoadReport::default();
        let mut sets = BTreeMap::new();

        for (name, list) in record.categories {
            let Some(key) = catalog.resolve(&name) else {
                log::warn!("Dropping rules for unknown category '{}'", name);
                report.categories_dropped += 1;
                continue;
            };

            let list = match list {
                Some(list) => list,
                None => {
                    log::warn!("Category '{}' had no rule list; using empty list", key);
                    report.null_lists_replaced += 1;
                    Vec::new()
                }
            };

            let mut rules = Vec::with_capacity(list.len());
            for raw in list {
                let Some(raw) = raw else {
                    report.null_rules_removed += 1;
                    continue;
                };
                let (rule, corrected) = RangeRule::from_raw(raw);
                if corrected {
                    log::warn!(
                        "Corrected rule in '{}': {:?} -> {}..={} @ {}",
                        key,
                        raw,
                        rule.min_value(),
                        rule.max_value(),
                        rule.priority()
                    );
                    report.rules_corrected += 1;
                }
                rules.push(rule);
            }

            match sets.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(RuleSet::from_rules(rules));
                }
                Entry::Occupied(mut slot) => {
                    log::warn!(
                        "Category '{}' resolves to '{}', which is already loaded; merging {} rules",
                        name,
                        slot.key(),
                        rules.len()
                    );
                    report.categories_merged += 1;
                    let set = slot.get_mut();
                    for rule in rules {
                        set.add(rule);
                    }
                }
            }
        }

        if report.null_rules_removed > 0 {
            log::warn!("Removed {} empty rule entries", report.null_rules_removed);
        }

        let store = Self { sets };
        log::info!(
            "Loaded {} rules across {} categories",
            store.rule_count(),
            store.len()
        );
        (store, report)
    }

    /// Persisted form of this store.
    pub fn to_record(&self) -> RuleStoreRecord {
        let mut record = RuleStoreRecord::new();
        for (key, set) in &self.sets {
            let rules = set.rules().map(|r| Some(RawRule::from(*r))).collect();
            record.categories.insert(key.as_str().to_owned(), Some(rules));
        }
        record
    }
}
