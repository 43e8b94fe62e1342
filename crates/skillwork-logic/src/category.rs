//! Work category keys and the catalog that resolves them.
//!
//! A [`CategoryKey`] is an opaque, stable name supplied by the host (for
//! example a work type definition name). Keys are never raw indices, so
//! persisted rules survive reordering of the host's definition list.
//!
//! Whether a key still refers to something real is decided by a
//! [`CategoryCatalog`]. The host builds a [`CatalogSnapshot`] whenever it
//! needs one; nothing in this crate caches catalog state between calls.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a work category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryKey(String);

impl CategoryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Resolves persisted category names against the host's current content.
pub trait CategoryCatalog {
    /// Returns the live key for `name`, or `None` when the category no
    /// longer exists.
    fn resolve(&self, name: &str) -> Option<CategoryKey>;
}

/// Point-in-time list of the categories the host currently defines.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    names: BTreeSet<String>,
}

impl CatalogSnapshot {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = CategoryKey> + '_ {
        self.names.iter().map(|n| CategoryKey::new(n.as_str()))
    }
}

impl CategoryCatalog for CatalogSnapshot {
    fn resolve(&self, name: &str) -> Option<CategoryKey> {
        if name.is_empty() || !self.names.contains(name) {
            return None;
        }
        Some(CategoryKey::new(name))
    }
}

/// Accepts every non-empty name. Useful when no content check is possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyCategory;

impl CategoryCatalog for AnyCategory {
    fn resolve(&self, name: &str) -> Option<CategoryKey> {
        (!name.is_empty()).then(|| CategoryKey::new(name))
    }
}
