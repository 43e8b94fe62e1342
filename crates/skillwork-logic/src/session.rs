//! Per-save session: rules, configuration and the reconciliation driver.
//!
//! One [`Session`] exists per loaded game. It owns the [`RuleStore`]
//! exclusively; the editor UI and the reconciliation triggers all go
//! through it, and it is dropped when the game is unloaded.
//!
//! ```
//! use skillwork_logic::category::CategoryKey;
//! use skillwork_logic::config::EngineConfig;
//! use skillwork_logic::rule::RangeRule;
//! use skillwork_logic::session::Session;
//!
//! let mut session = Session::new(EngineConfig::default());
//! let mining = CategoryKey::new("Mining");
//! session.rule_set_mut(mining.clone()).add(RangeRule::new(0, 5, 4));
//! assert!(session.store().has_any_rules());
//! ```

use crate::category::{CategoryCatalog, CategoryKey};
use crate::config::EngineConfig;
use crate::host::{Host, HostClock};
use crate::persistence::RuleStoreRecord;
use crate::reconcile::{PassReport, ReconcileStats, Reconciler};
use crate::rule_set::{RuleId, RuleSet};
use crate::store::{LoadReport, RuleStore};

#[derive(Debug)]
pub struct Session {
    config: EngineConfig,
    store: RuleStore,
    reconciler: Reconciler,
}

impl Session {
    /// Fresh session with no rules.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(config, RuleStore::new())
    }

    pub fn with_store(config: EngineConfig, store: RuleStore) -> Self {
        let reconciler = Reconciler::new(&config);
        Self {
            config,
            store,
            reconciler,
        }
    }

    /// Session restored from a saved record.
    pub fn from_record(
        config: EngineConfig,
        record: RuleStoreRecord,
        catalog: &dyn CategoryCatalog,
    ) -> (Self, LoadReport) {
        let (store, report) = RuleStore::load(record, catalog);
        (Self::with_store(config, store), report)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    pub fn stats(&self) -> &ReconcileStats {
        self.reconciler.stats()
    }

    // ── Editor surface ──────────────────────────────────────────────

    /// Mutable rule set for `category`, created empty on first access.
    pub fn rule_set_mut(&mut self, category: CategoryKey) -> &mut RuleSet {
        self.store.get_or_insert(category)
    }

    /// Add a rule using the configured template.
    pub fn add_default_rule(&mut self, category: CategoryKey) -> RuleId {
        let rule = self.config.new_rule;
        self.store.get_or_insert(category).add(rule)
    }

    /// Forget every rule for `category`.
    pub fn remove_category(&mut self, category: &CategoryKey) -> Option<RuleSet> {
        self.store.remove_category(category)
    }

    // ── Triggers ────────────────────────────────────────────────────

    /// Timer trigger, called once per host tick.
    pub fn tick(&mut self, clock: &dyn HostClock, host: &mut dyn Host) -> Option<PassReport> {
        self.reconciler.on_tick(&self.store, clock, host)
    }

    /// Run a pass immediately, e.g. right after the host assigned work.
    pub fn run_now(&mut self, host: &mut dyn Host) -> PassReport {
        self.reconciler.run_pass(&self.store, host)
    }

    // ── Persistence ─────────────────────────────────────────────────

    pub fn to_record(&self) -> RuleStoreRecord {
        self.store.to_record()
    }
}
