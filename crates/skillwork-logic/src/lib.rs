//! Skill-range work priority rules.
//!
//! This crate holds the rule engine that sets colonists' work priorities
//! from their skill levels. It is independent of any game engine: the
//! host supplies colonists and categories through the traits in [`host`],
//! and everything else is plain data and pure functions, unit-testable
//! and portable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`category`] | Stable category keys and the catalog that resolves them |
//! | [`config`] | Engine configuration (interval, new-rule template) |
//! | [`constants`] | Skill and priority scales, scheduling defaults |
//! | [`error`] | Host, pass, persistence and config errors |
//! | [`evaluator`] | First-match skill → priority lookup |
//! | [`host`] | Collaborator traits implemented by the host game |
//! | [`persistence`] | JSON / bincode save and load of rule records |
//! | [`reconcile`] | Reconciliation pass over eligible colonists |
//! | [`rule`] | A single clamped skill-range rule |
//! | [`rule_set`] | Sorted rules for one category |
//! | [`schedule`] | Tick-interval timer trigger |
//! | [`session`] | Per-save owner of rules and the reconciler |
//! | [`store`] | Category → rule set mapping with load normalization |

pub mod category;
pub mod config;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod host;
pub mod persistence;
pub mod reconcile;
pub mod rule;
pub mod rule_set;
pub mod schedule;
pub mod session;
pub mod store;
