//! Integration tests for the session → reconciler → host pipeline.
//!
//! Exercises: persisted record → Session → timer / triggered passes →
//! priority writes on a fake colony that counts every collaborator call.

use std::cell::Cell;
use std::collections::HashMap;

use skillwork_logic::category::{CatalogSnapshot, CategoryKey};
use skillwork_logic::config::EngineConfig;
use skillwork_logic::constants::priority;
use skillwork_logic::error::{Collaborator, HostError, PassError};
use skillwork_logic::host::{
    EligibilityProvider, EntityAttributeSource, EntityId, Host, HostClock,
};
use skillwork_logic::persistence::load_json_str;
use skillwork_logic::reconcile::PassOutcome;
use skillwork_logic::rule::RangeRule;
use skillwork_logic::session::Session;

// ── Fake host ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Calls {
    list_eligible: Cell<usize>,
    is_disabled: Cell<usize>,
    attribute_value: Cell<usize>,
    current_priority: Cell<usize>,
    set_priority: Cell<usize>,
}

impl Calls {
    fn reads(&self) -> usize {
        self.list_eligible.get()
            + self.is_disabled.get()
            + self.attribute_value.get()
            + self.current_priority.get()
    }
}

fn bump(c: &Cell<usize>) {
    c.set(c.get() + 1);
}

#[derive(Default)]
struct Colony {
    roster: Vec<EntityId>,
    skills: HashMap<(u64, String), i32>,
    disabled: Vec<(u64, String)>,
    priorities: HashMap<(u64, String), u8>,
    ghosts: Vec<EntityId>,
    calls: Calls,
    loading: bool,
}

impl Colony {
    fn with_pawns(n: u64) -> Self {
        Self {
            roster: (1..=n).map(EntityId).collect(),
            ..Default::default()
        }
    }

    fn skill(&mut self, id: u64, category: &str, level: i32) {
        self.skills.insert((id, category.to_owned()), level);
    }

    fn priority(&self, id: u64, category: &str) -> u8 {
        self.priorities
            .get(&(id, category.to_owned()))
            .copied()
            .unwrap_or(priority::DISABLED)
    }
}

impl EligibilityProvider for Colony {
    fn list_eligible(&self) -> Vec<EntityId> {
        bump(&self.calls.list_eligible);
        self.roster.clone()
    }
}

impl EntityAttributeSource for Colony {
    fn is_disabled(&self, entity: EntityId, category: &CategoryKey) -> bool {
        bump(&self.calls.is_disabled);
        self.disabled
            .contains(&(entity.0, category.as_str().to_owned()))
    }

    fn attribute_value(&self, entity: EntityId, category: &CategoryKey) -> i32 {
        bump(&self.calls.attribute_value);
        self.skills
            .get(&(entity.0, category.as_str().to_owned()))
            .copied()
            .unwrap_or(0)
    }

    fn current_priority(&self, entity: EntityId, category: &CategoryKey) -> u8 {
        bump(&self.calls.current_priority);
        self.priority(entity.0, category.as_str())
    }

    fn set_priority(
        &mut self,
        entity: EntityId,
        category: &CategoryKey,
        priority: u8,
    ) -> Result<(), HostError> {
        bump(&self.calls.set_priority);
        if self.ghosts.contains(&entity) {
            return Err(HostError::new(format!("no pawn {}", entity)));
        }
        self.priorities
            .insert((entity.0, category.as_str().to_owned()), priority);
        Ok(())
    }
}

impl Host for Colony {
    fn eligibility(&self) -> Option<&dyn EligibilityProvider> {
        if self.loading {
            return None;
        }
        Some(self)
    }

    fn attributes(&mut self) -> Option<&mut dyn EntityAttributeSource> {
        if self.loading {
            return None;
        }
        Some(self)
    }
}

struct Clock {
    ticks: u64,
    paused: bool,
}

impl HostClock for Clock {
    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn can_run(&self) -> bool {
        !self.paused
    }
}

// ── Helpers ────────────────────────────────────────────────────────────

fn mining() -> CategoryKey {
    CategoryKey::new("Mining")
}

fn tiered_session() -> Session {
    let mut session = Session::new(EngineConfig::default());
    let set = session.rule_set_mut(mining());
    set.add(RangeRule::new(11, 20, 2));
    set.add(RangeRule::new(0, 5, 4));
    set.add(RangeRule::new(6, 10, 3));
    session
}

// ── Tests ──────────────────────────────────────────────────────────────

#[test]
fn no_rules_means_no_host_reads() {
    let mut session = Session::new(EngineConfig::default());
    session.rule_set_mut(mining());
    session.rule_set_mut(CategoryKey::new("Cooking"));

    let mut colony = Colony::with_pawns(5);
    let report = session.run_now(&mut colony);

    assert_eq!(report.outcome, PassOutcome::Inert);
    assert_eq!(colony.calls.reads(), 0);
    assert_eq!(colony.calls.set_priority.get(), 0);
}

#[test]
fn triggered_pass_applies_tiers() {
    let mut session = tiered_session();
    let mut colony = Colony::with_pawns(3);
    colony.skill(1, "Mining", 7);
    colony.skill(2, "Mining", 20);
    colony.skill(3, "Mining", 5);

    let report = session.run_now(&mut colony);
    assert!(report.is_completed());
    assert_eq!(colony.priority(1, "Mining"), 3);
    assert_eq!(colony.priority(2, "Mining"), 2);
    assert_eq!(colony.priority(3, "Mining"), 4);
}

#[test]
fn second_pass_is_idempotent() {
    let mut session = tiered_session();
    let mut colony = Colony::with_pawns(4);
    for id in 1..=4 {
        colony.skill(id, "Mining", (id * 5) as i32);
    }

    let first = session.run_now(&mut colony);
    let writes_after_first = colony.calls.set_priority.get();
    let second = session.run_now(&mut colony);

    assert_eq!(first.writes, writes_after_first);
    assert_eq!(second.writes, 0);
    assert_eq!(colony.calls.set_priority.get(), writes_after_first);
}

#[test]
fn gap_in_coverage_switches_work_off() {
    let mut session = Session::new(EngineConfig::default());
    let set = session.rule_set_mut(mining());
    set.add(RangeRule::new(0, 5, 4));
    set.add(RangeRule::new(10, 15, 2));

    let mut colony = Colony::with_pawns(1);
    colony.skill(1, "Mining", 7);
    colony.priorities.insert((1, "Mining".into()), 1);

    session.run_now(&mut colony);
    assert_eq!(colony.priority(1, "Mining"), priority::DISABLED);
}

#[test]
fn categories_without_rules_are_left_alone() {
    let mut session = tiered_session();
    session.rule_set_mut(CategoryKey::new("Cooking"));

    let mut colony = Colony::with_pawns(1);
    colony.skill(1, "Mining", 12);
    colony.priorities.insert((1, "Cooking".into()), 1);

    let report = session.run_now(&mut colony);
    assert_eq!(report.evaluations, 1);
    assert_eq!(colony.priority(1, "Cooking"), 1);
}

#[test]
fn disabled_category_is_forced_off() {
    let mut session = tiered_session();
    let mut colony = Colony::with_pawns(1);
    colony.skill(1, "Mining", 18);
    colony.disabled.push((1, "Mining".into()));
    colony.priorities.insert((1, "Mining".into()), 2);

    session.run_now(&mut colony);
    assert_eq!(colony.priority(1, "Mining"), priority::DISABLED);
}

#[test]
fn timer_runs_on_interval_and_not_while_paused() {
    let mut session = tiered_session();
    let mut colony = Colony::with_pawns(1);
    colony.skill(1, "Mining", 3);

    let mut passes = 0;
    for tick in 1..=600 {
        let clock = Clock {
            ticks: tick,
            paused: tick > 360,
        };
        if session.tick(&clock, &mut colony).is_some() {
            passes += 1;
        }
    }

    // Due at 120, 240, 360; 480 and 600 fall in the paused window.
    assert_eq!(passes, 3);
    assert_eq!(colony.calls.list_eligible.get(), 3);
    assert_eq!(colony.priority(1, "Mining"), 4);
}

#[test]
fn loading_host_skips_and_recovers() {
    let mut session = tiered_session();
    let mut colony = Colony::with_pawns(2);
    colony.skill(1, "Mining", 9);
    colony.skill(2, "Mining", 14);
    colony.loading = true;

    let report = session.run_now(&mut colony);
    assert_eq!(
        report.outcome,
        PassOutcome::Aborted(PassError::MissingCollaborator(Collaborator::Eligibility))
    );
    assert_eq!(colony.calls.reads(), 0);

    colony.loading = false;
    let report = session.run_now(&mut colony);
    assert!(report.is_completed());
    assert_eq!(session.stats().passes_skipped, 1);
    assert_eq!(session.stats().passes_completed, 1);
    assert_eq!(colony.priority(2, "Mining"), 2);
}

#[test]
fn host_failure_keeps_partial_writes_and_next_pass_converges() {
    let mut session = tiered_session();
    let mut colony = Colony::with_pawns(3);
    colony.skill(1, "Mining", 1);
    colony.skill(2, "Mining", 19);
    colony.skill(3, "Mining", 8);
    // Pawn 2 despawns between listing and write-back.
    colony.ghosts.push(EntityId(2));

    let report = session.run_now(&mut colony);
    assert!(matches!(
        report.outcome,
        PassOutcome::Aborted(PassError::Unexpected {
            entity: EntityId(2),
            ..
        })
    ));
    assert_eq!(report.writes, 1);
    assert_eq!(colony.priority(1, "Mining"), 4);
    assert_eq!(colony.priority(3, "Mining"), priority::DISABLED);

    colony.ghosts.clear();
    let report = session.run_now(&mut colony);
    assert!(report.is_completed());
    assert_eq!(report.writes, 2);
    assert_eq!(colony.priority(2, "Mining"), 2);
    assert_eq!(colony.priority(3, "Mining"), 3);
    assert_eq!(session.stats().passes_failed, 1);
}

#[test]
fn persisted_rules_are_normalized_on_load() {
    let record = load_json_str(
        r#"{
            "version": 1,
            "categories": {
                "Mining": [null, {"min_value": 15, "max_value": 5, "priority": 2}],
                "Doctor": null,
                "Smithing": [{"min_value": 0, "max_value": 20, "priority": 1}]
            }
        }"#,
    )
    .unwrap();
    let catalog = CatalogSnapshot::new(["Mining", "Doctor", "Cooking"]);
    let (mut session, report) = Session::from_record(EngineConfig::default(), record, &catalog);

    assert_eq!(report.null_rules_removed, 1);
    assert_eq!(report.rules_corrected, 1);
    assert_eq!(report.null_lists_replaced, 1);
    assert_eq!(report.categories_dropped, 1);

    let rules: Vec<RangeRule> = session
        .store()
        .get(&mining())
        .unwrap()
        .rules()
        .copied()
        .collect();
    assert_eq!(rules, vec![RangeRule::new(5, 5, 2)]);

    let mut colony = Colony::with_pawns(2);
    colony.skill(1, "Mining", 5);
    colony.skill(2, "Mining", 6);
    session.run_now(&mut colony);
    assert_eq!(colony.priority(1, "Mining"), 2);
    assert_eq!(colony.priority(2, "Mining"), priority::DISABLED);
}
