//! Reconciliation pass: apply rule results to every eligible colonist.
//!
//! A pass is triggered either by the tick timer ([`Reconciler::on_tick`])
//! or explicitly right after the host's own work assignment
//! ([`Reconciler::run_pass`]), so that rule results are applied last.
//!
//! # Pass body
//!
//! 1. If the store has no rules, return immediately without touching the
//!    host.
//! 2. List eligible entities.
//! 3. For each entity (host order) and each non-empty category (store
//!    order): read disabled flag and skill, evaluate, and write back only
//!    when the result differs from the current priority.
//!
//! A host error ends the pass. Writes made before it stay in place; the
//! next pass converges to the same target state because the computation
//! depends only on its inputs.

use crate::config::EngineConfig;
use crate::error::{Collaborator, PassError};
use crate::evaluator::evaluate;
use crate::host::{EntityAttributeSource, EntityId, Host, HostClock};
use crate::schedule::TickSchedule;
use crate::store::RuleStore;

/// How a pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// Every eligible entity was processed.
    Completed,
    /// No category has rules; the host was not consulted.
    Inert,
    /// The pass stopped early. See [`PassError`].
    Aborted(PassError),
}

/// Result of one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub outcome: PassOutcome,
    /// Eligible entities listed by the host.
    pub entities: usize,
    /// (entity, category) pairs evaluated.
    pub evaluations: usize,
    /// Priorities actually changed.
    pub writes: usize,
}

impl PassReport {
    fn new(outcome: PassOutcome) -> Self {
        Self {
            outcome,
            entities: 0,
            evaluations: 0,
            writes: 0,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.outcome == PassOutcome::Completed
    }
}

/// Running totals across a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub passes_completed: u64,
    pub passes_inert: u64,
    pub passes_skipped: u64,
    pub passes_failed: u64,
    pub writes: u64,
}

/// Drives reconciliation passes for one session.
#[derive(Debug, Clone)]
pub struct Reconciler {
    schedule: TickSchedule,
    log_summaries: bool,
    missing_reported: bool,
    stats: ReconcileStats,
}

impl Reconciler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            schedule: TickSchedule::new(config.reconcile_interval_ticks),
            log_summaries: config.log_pass_summaries,
            missing_reported: false,
            stats: ReconcileStats::default(),
        }
    }

    pub fn schedule(&self) -> TickSchedule {
        self.schedule
    }

    pub fn stats(&self) -> &ReconcileStats {
        &self.stats
    }

    /// Timer trigger. Runs a pass when the tick is due and the clock
    /// allows it; returns `None` otherwise.
    pub fn on_tick(
        &mut self,
        store: &RuleStore,
        clock: &dyn HostClock,
        host: &mut dyn Host,
    ) -> Option<PassReport> {
        if !self.schedule.should_run(clock) {
            return None;
        }
        Some(self.run_pass(store, host))
    }

    /// Run one pass now.
    pub fn run_pass(&mut self, store: &RuleStore, host: &mut dyn Host) -> PassReport {
        if !store.has_any_rules() {
            self.stats.passes_inert += 1;
            return PassReport::new(PassOutcome::Inert);
        }

        let Some(eligibility) = host.eligibility() else {
            return self.skip(Collaborator::Eligibility);
        };
        let entities = eligibility.list_eligible();

        let Some(attributes) = host.attributes() else {
            return self.skip(Collaborator::Attributes);
        };

        let mut report = PassReport::new(PassOutcome::Completed);
        report.entities = entities.len();

        if let Err(err) = apply_rules(store, &entities, attributes, &mut report) {
            log::error!(
                "Work priority pass aborted after {} changes: {}",
                report.writes,
                err
            );
            self.stats.passes_failed += 1;
            self.stats.writes += report.writes as u64;
            report.outcome = PassOutcome::Aborted(err);
            return report;
        }

        self.stats.passes_completed += 1;
        self.stats.writes += report.writes as u64;
        log::debug!(
            "Work priority pass: {} colonists, {} evaluations, {} changes",
            report.entities,
            report.evaluations,
            report.writes
        );
        if self.log_summaries && report.writes > 0 {
            log::info!(
                "Applied {} work priority changes across {} colonists",
                report.writes,
                report.entities
            );
        }
        report
    }

    fn skip(&mut self, missing: Collaborator) -> PassReport {
        if self.missing_reported {
            log::debug!("Skipping work priority pass: {} unavailable", missing);
        } else {
            log::warn!(
                "Skipping work priority passes until the {} is available",
                missing
            );
            self.missing_reported = true;
        }
        self.stats.passes_skipped += 1;
        PassReport::new(PassOutcome::Aborted(PassError::MissingCollaborator(missing)))
    }
}

fn apply_rules(
    store: &RuleStore,
    entities: &[EntityId],
    attributes: &mut dyn EntityAttributeSource,
    report: &mut PassReport,
) -> Result<(), PassError> {
    for &entity in entities {
        for (category, rules) in store.active() {
            let disabled = attributes.is_disabled(entity, category);
            let value = attributes.attribute_value(entity, category);
            let target = evaluate(disabled, value, rules);
            report.evaluations += 1;

            if attributes.current_priority(entity, category) == target {
                continue;
            }
            attributes
                .set_priority(entity, category, target)
                .map_err(|source| PassError::Unexpected {
                    entity,
                    category: category.clone(),
                    source,
                })?;
            report.writes += 1;
        }
    }
    Ok(())
}
