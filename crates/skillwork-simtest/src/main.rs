//! Skillwork Headless Colony Harness
//!
//! Drives the rule engine against a synthetic colony without a host game.
//! Runs entirely in-process: no game engine, no UI, no save files.
//!
//! Usage:
//!   cargo run -p skillwork-simtest
//!   cargo run -p skillwork-simtest -- --verbose

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skillwork_logic::category::{CatalogSnapshot, CategoryKey};
use skillwork_logic::config::EngineConfig;
use skillwork_logic::constants::priority;
use skillwork_logic::error::HostError;
use skillwork_logic::evaluator::evaluate;
use skillwork_logic::host::{
    EligibilityProvider, EntityAttributeSource, EntityId, Host, HostClock,
};
use skillwork_logic::persistence::{load_binary, load_json_str, save_binary, save_json};
use skillwork_logic::reconcile::PassOutcome;
use skillwork_logic::session::Session;
use skillwork_logic::store::RuleStore;

// ── Rule file (same JSON a player's settings would hold) ────────────────
const RULES_JSON: &str = include_str!("../../../data/default_rules.json");

const CATEGORIES: [&str; 6] = [
    "Doctor",
    "Mining",
    "Cooking",
    "Research",
    "Construction",
    "Growing",
];

const TICKS_PER_DAY: u64 = 60_000;

// ── Synthetic colony ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Colonist {
    id: EntityId,
    alive: bool,
    downed: bool,
    skills: HashMap<String, i32>,
    incapable: Vec<String>,
    priorities: HashMap<String, u8>,
}

struct Colony {
    colonists: Vec<Colonist>,
    ready: bool,
    paused: bool,
    ticks: u64,
    writes: usize,
}

impl Colony {
    fn generate(size: u64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let colonists = (1..=size)
            .map(|id| {
                let skills = CATEGORIES
                    .iter()
                    .map(|c| (c.to_string(), rng.gen_range(0..=20)))
                    .collect();
                let incapable = if rng.gen_bool(0.15) {
                    vec![CATEGORIES[rng.gen_range(0..CATEGORIES.len())].to_string()]
                } else {
                    Vec::new()
                };
                Colonist {
                    id: EntityId(id),
                    alive: true,
                    downed: false,
                    skills,
                    incapable,
                    priorities: HashMap::new(),
                }
            })
            .collect();
        Self {
            colonists,
            ready: true,
            paused: false,
            ticks: 0,
            writes: 0,
        }
    }

    fn find(&self, entity: EntityId) -> Option<&Colonist> {
        self.colonists.iter().find(|c| c.id == entity)
    }

    fn priority(&self, entity: EntityId, category: &str) -> u8 {
        self.find(entity)
            .and_then(|c| c.priorities.get(category).copied())
            .unwrap_or(priority::DISABLED)
    }

    /// The host's own assignment pass: everyone does everything at 3.
    fn host_assign_all(&mut self) {
        for c in &mut self.colonists {
            for cat in CATEGORIES {
                c.priorities.insert(cat.to_string(), 3);
            }
        }
    }

    /// One day of practice: a few skills improve.
    fn train(&mut self, rng: &mut StdRng) {
        for c in &mut self.colonists {
            let cat = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
            if let Some(level) = c.skills.get_mut(cat) {
                *level = (*level + 1).min(20);
            }
        }
    }
}

impl EligibilityProvider for Colony {
    fn list_eligible(&self) -> Vec<EntityId> {
        self.colonists
            .iter()
            .filter(|c| c.alive && !c.downed)
            .map(|c| c.id)
            .collect()
    }
}

impl EntityAttributeSource for Colony {
    fn is_disabled(&self, entity: EntityId, category: &CategoryKey) -> bool {
        self.find(entity)
            .map(|c| c.incapable.iter().any(|i| i == category.as_str()))
            .unwrap_or(true)
    }

    fn attribute_value(&self, entity: EntityId, category: &CategoryKey) -> i32 {
        self.find(entity)
            .and_then(|c| c.skills.get(category.as_str()).copied())
            .unwrap_or(0)
    }

    fn current_priority(&self, entity: EntityId, category: &CategoryKey) -> u8 {
        self.priority(entity, category.as_str())
    }

    fn set_priority(
        &mut self,
        entity: EntityId,
        category: &CategoryKey,
        priority: u8,
    ) -> Result<(), HostError> {
        let colonist = self
            .colonists
            .iter_mut()
            .find(|c| c.id == entity)
            .ok_or_else(|| HostError::new(format!("colonist {} vanished", entity)))?;
        colonist
            .priorities
            .insert(category.as_str().to_owned(), priority);
        self.writes += 1;
        Ok(())
    }
}

impl Host for Colony {
    fn eligibility(&self) -> Option<&dyn EligibilityProvider> {
        self.ready.then_some(self as &dyn EligibilityProvider)
    }

    fn attributes(&mut self) -> Option<&mut dyn EntityAttributeSource> {
        if !self.ready {
            return None;
        }
        Some(self)
    }
}

impl HostClock for Colony {
    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn can_run(&self) -> bool {
        self.ready && !self.paused
    }
}

/// Expected priority straight from the store, bypassing the reconciler.
fn expected(
    store: &RuleStore,
    colony: &Colony,
    c: &Colonist,
    category: &CategoryKey,
) -> Option<u8> {
    let rules = store.get(category).filter(|r| !r.is_empty())?;
    Some(evaluate(
        colony.is_disabled(c.id, category),
        colony.attribute_value(c.id, category),
        rules,
    ))
}

fn mismatches(store: &RuleStore, colony: &Colony) -> usize {
    let mut count = 0;
    for c in colony.colonists.iter().filter(|c| c.alive && !c.downed) {
        for name in CATEGORIES {
            let key = CategoryKey::new(name);
            if let Some(want) = expected(store, colony, c, &key) {
                if colony.priority(c.id, name) != want {
                    count += 1;
                }
            }
        }
    }
    count
}

fn load_session() -> Option<Session> {
    let record = load_json_str(RULES_JSON).ok()?;
    let catalog = CatalogSnapshot::new(CATEGORIES);
    Some(Session::from_record(EngineConfig::default(), record, &catalog).0)
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    if verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }
    println!("=== Skillwork Colony Harness ===\n");

    let mut results = Vec::new();

    // 1. Rule file normalization
    results.extend(validate_rule_file(verbose));

    // 2. Evaluator tiers
    results.extend(validate_evaluator(verbose));

    // 3. Timer-driven passes over simulated days
    results.extend(validate_timer_passes(verbose));

    // 4. Triggered pass after host assignment
    results.extend(validate_triggered_pass(verbose));

    // 5. Host availability and eligibility
    results.extend(validate_host_edges(verbose));

    // 6. Persistence
    results.extend(validate_persistence(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Rule File ────────────────────────────────────────────────────────

fn validate_rule_file(verbose: bool) -> Vec<TestResult> {
    println!("--- Rule File ---");
    let mut results = Vec::new();

    let record = match load_json_str(RULES_JSON) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult {
                name: "rules_parse".into(),
                passed: false,
                detail: format!("rule file error: {}", e),
            });
            return results;
        }
    };

    let catalog = CatalogSnapshot::new(CATEGORIES);
    let (store, report) = RuleStore::load(record, &catalog);

    results.push(TestResult {
        name: "rules_unknown_category_dropped".into(),
        passed: report.categories_dropped == 1,
        detail: format!("{} categories dropped", report.categories_dropped),
    });
    results.push(TestResult {
        name: "rules_null_list_replaced".into(),
        passed: report.null_lists_replaced == 1
            && store
                .get(&CategoryKey::new("Research"))
                .is_some_and(|s| s.is_empty()),
        detail: format!("{} null lists replaced", report.null_lists_replaced),
    });
    results.push(TestResult {
        name: "rules_null_entries_removed".into(),
        passed: report.null_rules_removed == 1,
        detail: format!("{} null entries removed", report.null_rules_removed),
    });
    results.push(TestResult {
        name: "rules_corrected".into(),
        passed: report.rules_corrected == 2,
        detail: format!("{} rules corrected", report.rules_corrected),
    });

    let unsorted: Vec<String> = store
        .categories()
        .filter(|k| store.get(k).is_some_and(|s| !s.is_sorted()))
        .map(|k| k.to_string())
        .collect();
    results.push(TestResult {
        name: "rules_sorted".into(),
        passed: unsorted.is_empty(),
        detail: if unsorted.is_empty() {
            format!("{} rules, all sets ascending", store.rule_count())
        } else {
            format!("unsorted: {}", unsorted.join(", "))
        },
    });

    if verbose {
        for (key, set) in store.active() {
            let ranges: Vec<String> = set
                .rules()
                .map(|r| format!("{}-{}→{}", r.min_value(), r.max_value(), r.priority()))
                .collect();
            println!("    {}: {}", key, ranges.join("  "));
        }
    }

    results
}

// ── 2. Evaluator ────────────────────────────────────────────────────────

fn validate_evaluator(verbose: bool) -> Vec<TestResult> {
    println!("--- Evaluator ---");
    let mut results = Vec::new();
    let Some(session) = load_session() else {
        results.push(TestResult {
            name: "evaluator_session".into(),
            passed: false,
            detail: "could not load rule file".into(),
        });
        return results;
    };

    let Some(doctor) = session.store().get(&CategoryKey::new("Doctor")) else {
        results.push(TestResult {
            name: "evaluator_doctor_rules".into(),
            passed: false,
            detail: "no Doctor rules".into(),
        });
        return results;
    };
    let sweep: Vec<u8> = (0..=20).map(|v| evaluate(false, v, doctor)).collect();
    if verbose {
        println!("    Doctor sweep 0..=20: {:?}", sweep);
    }
    let expected: Vec<u8> = (0..=20)
        .map(|v| match v {
            0..=5 => 4,
            6..=11 => 3,
            _ => 1,
        })
        .collect();
    results.push(TestResult {
        name: "evaluator_doctor_sweep".into(),
        passed: sweep == expected,
        detail: format!("{:?}", sweep),
    });

    // Cooking only covers 0-3 and 8-20: 4..=7 is a gap.
    let Some(cooking) = session.store().get(&CategoryKey::new("Cooking")) else {
        return results;
    };
    let gap: Vec<u8> = (4..=7).map(|v| evaluate(false, v, cooking)).collect();
    results.push(TestResult {
        name: "evaluator_gap_disables".into(),
        passed: gap.iter().all(|p| *p == priority::DISABLED),
        detail: format!("skills 4-7 → {:?}", gap),
    });

    let disabled = (0..=20).all(|v| evaluate(true, v, doctor) == priority::DISABLED);
    results.push(TestResult {
        name: "evaluator_disabled_overrides".into(),
        passed: disabled,
        detail: "disabled flag always yields 0".into(),
    });

    results
}

// ── 3. Timer Passes ─────────────────────────────────────────────────────

fn validate_timer_passes(verbose: bool) -> Vec<TestResult> {
    println!("--- Timer Passes ---");
    let mut results = Vec::new();
    let Some(mut session) = load_session() else {
        return results;
    };

    let mut colony = Colony::generate(40, 7);
    let mut rng = StdRng::seed_from_u64(99);
    let mut passes = 0;
    let mut failures = 0;
    let days = 5;

    for _ in 0..days * TICKS_PER_DAY {
        colony.ticks += 1;
        if colony.ticks.is_multiple_of(TICKS_PER_DAY) {
            colony.train(&mut rng);
        }
        if let Some(report) = session.tick(&colony.clock(), &mut colony) {
            passes += 1;
            if !report.is_completed() {
                failures += 1;
            }
        }
    }

    let expected_passes = days * TICKS_PER_DAY / session.config().reconcile_interval_ticks;
    results.push(TestResult {
        name: "timer_pass_count".into(),
        passed: passes == expected_passes && failures == 0,
        detail: format!("{} passes over {} days ({} failed)", passes, days, failures),
    });

    // Training on the last tick may not be reconciled yet; one more pass
    // must bring everything in line.
    session.run_now(&mut colony);
    let off = mismatches(session.store(), &colony);
    results.push(TestResult {
        name: "timer_converged".into(),
        passed: off == 0,
        detail: format!("{} mismatched priorities", off),
    });

    let stats = session.stats();
    if verbose {
        println!("    stats: {:?}", stats);
    }
    results.push(TestResult {
        name: "timer_writes_tracked".into(),
        passed: stats.writes as usize == colony.writes,
        detail: format!("{} writes", stats.writes),
    });

    // Pausing stops timer passes entirely.
    colony.paused = true;
    let before = session.stats().passes_completed;
    for _ in 0..TICKS_PER_DAY {
        colony.ticks += 1;
        session.tick(&colony.clock(), &mut colony);
    }
    results.push(TestResult {
        name: "timer_paused_idle".into(),
        passed: session.stats().passes_completed == before,
        detail: "no passes while paused".into(),
    });

    results
}

// ── 4. Triggered Pass ───────────────────────────────────────────────────

fn validate_triggered_pass(_verbose: bool) -> Vec<TestResult> {
    println!("--- Triggered Pass ---");
    let mut results = Vec::new();
    let Some(mut session) = load_session() else {
        return results;
    };

    let mut colony = Colony::generate(25, 11);
    colony.host_assign_all();
    let report = session.run_now(&mut colony);

    let off = mismatches(session.store(), &colony);
    results.push(TestResult {
        name: "triggered_overrides_host".into(),
        passed: report.is_completed() && off == 0,
        detail: format!("{} changes, {} mismatched", report.writes, off),
    });

    // Categories without rules keep the host's assignment.
    let untouched = colony.colonists.iter().all(|c| {
        c.priorities.get("Construction") == Some(&3) && c.priorities.get("Research") == Some(&3)
    });
    results.push(TestResult {
        name: "triggered_ruleless_untouched".into(),
        passed: untouched,
        detail: "Construction/Research left at host priority".into(),
    });

    let again = session.run_now(&mut colony);
    results.push(TestResult {
        name: "triggered_idempotent".into(),
        passed: again.writes == 0,
        detail: format!("{} writes on repeat", again.writes),
    });

    results
}

// ── 5. Host Edges ───────────────────────────────────────────────────────

fn validate_host_edges(_verbose: bool) -> Vec<TestResult> {
    println!("--- Host Edges ---");
    let mut results = Vec::new();

    // No rules: nothing happens.
    let mut empty = Session::new(EngineConfig::default());
    let mut colony = Colony::generate(10, 3);
    colony.host_assign_all();
    let report = empty.run_now(&mut colony);
    results.push(TestResult {
        name: "edges_inert_without_rules".into(),
        passed: report.outcome == PassOutcome::Inert && colony.writes == 0,
        detail: format!("{:?}", report.outcome),
    });

    let Some(mut session) = load_session() else {
        return results;
    };

    // Host still loading: pass skipped, then recovers.
    colony.ready = false;
    let skipped = session.run_now(&mut colony);
    colony.ready = true;
    let recovered = session.run_now(&mut colony);
    results.push(TestResult {
        name: "edges_missing_host_skips".into(),
        passed: matches!(skipped.outcome, PassOutcome::Aborted(_)) && recovered.is_completed(),
        detail: format!("{:?} then {:?}", skipped.outcome, recovered.outcome),
    });

    // Downed and dead colonists are not touched.
    colony.host_assign_all();
    colony.colonists[0].downed = true;
    colony.colonists[1].alive = false;
    let writes_before = colony.writes;
    session.run_now(&mut colony);
    let sidelined = colony.colonists[..2].iter().all(|c| {
        CATEGORIES
            .iter()
            .all(|cat| c.priorities.get(*cat) == Some(&3))
    });
    results.push(TestResult {
        name: "edges_ineligible_untouched".into(),
        passed: sidelined && colony.writes > writes_before,
        detail: "downed/dead colonists keep host priorities".into(),
    });

    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();
    let Some(session) = load_session() else {
        return results;
    };
    let record = session.to_record();
    let catalog = CatalogSnapshot::new(CATEGORIES);

    let mut json = Vec::new();
    let json_ok = save_json(&mut json, &record).is_ok()
        && std::str::from_utf8(&json)
            .ok()
            .and_then(|text| load_json_str(text).ok())
            .map(|r| RuleStore::load(r, &catalog))
            .is_some_and(|(store, report)| report.is_clean() && &store == session.store());
    results.push(TestResult {
        name: "persistence_json".into(),
        passed: json_ok,
        detail: format!("{} bytes", json.len()),
    });

    let mut binary = Vec::new();
    let binary_ok = save_binary(&mut binary, &record).is_ok()
        && load_binary(&binary[..])
            .ok()
            .map(|r| RuleStore::load(r, &catalog))
            .is_some_and(|(store, report)| report.is_clean() && &store == session.store());
    results.push(TestResult {
        name: "persistence_binary".into(),
        passed: binary_ok,
        detail: format!("{} bytes", binary.len()),
    });

    results
}

// ── Clock view ──────────────────────────────────────────────────────────

struct ClockView {
    ticks: u64,
    can_run: bool,
}

impl HostClock for ClockView {
    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn can_run(&self) -> bool {
        self.can_run
    }
}

impl Colony {
    /// Snapshot of the clock so the colony itself can be borrowed mutably
    /// as the host during the same call.
    fn clock(&self) -> ClockView {
        ClockView {
            ticks: self.ticks,
            can_run: self.can_run(),
        }
    }
}
