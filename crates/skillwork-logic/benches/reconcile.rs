//! Criterion benchmarks for skillwork reconciliation.
//!
//! Uses a synthetic colony with random skills to measure the cost of a
//! full pass independent of any host game.

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skillwork_logic::category::CategoryKey;
use skillwork_logic::config::EngineConfig;
use skillwork_logic::error::HostError;
use skillwork_logic::evaluator::evaluate;
use skillwork_logic::host::{EligibilityProvider, EntityAttributeSource, EntityId, Host};
use skillwork_logic::rule::RangeRule;
use skillwork_logic::rule_set::RuleSet;
use skillwork_logic::session::Session;

const CATEGORIES: [&str; 8] = [
    "Doctor", "Cooking", "Hunting", "Construction", "Growing", "Mining", "Crafting", "Research",
];

struct Colony {
    roster: Vec<EntityId>,
    skills: HashMap<(u64, usize), i32>,
    priorities: HashMap<(u64, usize), u8>,
}

fn category_index(category: &CategoryKey) -> usize {
    CATEGORIES
        .iter()
        .position(|c| *c == category.as_str())
        .unwrap_or(0)
}

impl Colony {
    fn generate(size: u64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut skills = HashMap::new();
        for id in 0..size {
            for c in 0..CATEGORIES.len() {
                skills.insert((id, c), rng.gen_range(0..=20));
            }
        }
        Self {
            roster: (0..size).map(EntityId).collect(),
            skills,
            priorities: HashMap::new(),
        }
    }
}

impl EligibilityProvider for Colony {
    fn list_eligible(&self) -> Vec<EntityId> {
        self.roster.clone()
    }
}

impl EntityAttributeSource for Colony {
    fn is_disabled(&self, _entity: EntityId, _category: &CategoryKey) -> bool {
        false
    }

    fn attribute_value(&self, entity: EntityId, category: &CategoryKey) -> i32 {
        self.skills
            .get(&(entity.0, category_index(category)))
            .copied()
            .unwrap_or(0)
    }

    fn current_priority(&self, entity: EntityId, category: &CategoryKey) -> u8 {
        self.priorities
            .get(&(entity.0, category_index(category)))
            .copied()
            .unwrap_or(0)
    }

    fn set_priority(
        &mut self,
        entity: EntityId,
        category: &CategoryKey,
        priority: u8,
    ) -> Result<(), HostError> {
        self.priorities
            .insert((entity.0, category_index(category)), priority);
        Ok(())
    }
}

impl Host for Colony {
    fn eligibility(&self) -> Option<&dyn EligibilityProvider> {
        Some(self)
    }

    fn attributes(&mut self) -> Option<&mut dyn EntityAttributeSource> {
        Some(self)
    }
}

fn tiered_rules() -> RuleSet {
    RuleSet::from_rules([
        RangeRule::new(0, 5, 4),
        RangeRule::new(6, 10, 3),
        RangeRule::new(11, 15, 2),
        RangeRule::new(16, 20, 1),
    ])
}

fn bench_evaluate(c: &mut Criterion) {
    let rules = tiered_rules();
    c.bench_function("evaluate_tiered", |b| {
        b.iter(|| {
            let mut sum = 0u32;
            for value in 0..=20 {
                sum += u32::from(evaluate(false, black_box(value), &rules));
            }
            sum
        })
    });
}

fn bench_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_pass");
    for &size in &[50u64, 500, 5000] {
        let mut session = Session::new(EngineConfig::default());
        for name in CATEGORIES {
            *session.rule_set_mut(CategoryKey::new(name)) = tiered_rules();
        }
        let mut colony = Colony::generate(size, 42);
        // Converge first so the benchmark measures the steady-state pass.
        session.run_now(&mut colony);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| session.run_now(black_box(&mut colony)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_pass);
criterion_main!(benches);
