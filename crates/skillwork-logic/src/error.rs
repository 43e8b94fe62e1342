//! Error types.
//!
//! Only persistence and configuration errors are returned to callers as
//! `Err`. Failures during a reconciliation pass are reported inside the
//! pass result instead, so they can never interrupt the host loop.

use std::fmt;

use thiserror::Error;

use crate::category::CategoryKey;
use crate::host::EntityId;

/// Error raised by a host collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The host collaborators a pass depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collaborator {
    Eligibility,
    Attributes,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collaborator::Eligibility => f.write_str("eligibility provider"),
            Collaborator::Attributes => f.write_str("entity attribute source"),
        }
    }
}

/// Why a reconciliation pass did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PassError {
    #[error("{0} unavailable")]
    MissingCollaborator(Collaborator),
    #[error("failed on entity {entity} / {category}: {source}")]
    Unexpected {
        entity: EntityId,
        category: CategoryKey,
        #[source]
        source: HostError,
    },
}

/// Errors that can occur while saving or loading rule records.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("Rules version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Invalid engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("reconcile interval {0} exceeds maximum of {max} ticks", max = crate::constants::schedule::MAX_INTERVAL_TICKS)]
    IntervalTooLong(u64),
}
