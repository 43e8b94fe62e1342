//! Save/Load of rule data.
//!
//! The persisted form is a [`RuleStoreRecord`]: category name → optional
//! list of optional raw rules. Every level is optional because saves may
//! come from older versions or be edited by hand, and normalization in
//! [`RuleStore::load`](crate::store::RuleStore::load) repairs whatever it
//! finds. Only a structurally unreadable record or a format version
//! mismatch is an error.
//!
//! Two encodings are provided: JSON for human-editable settings files and
//! bincode for compact game saves. [`save_file`] and [`load_file`] pick
//! one from the path's extension (`.json` is JSON, anything else bincode).

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::RULES_VERSION;
use crate::error::PersistError;
use crate::rule::RawRule;

/// Serializable snapshot of a rule store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStoreRecord {
    /// Record format version
    pub version: u32,
    /// Rules per category name, `None` where a list was lost
    pub categories: BTreeMap<String, Option<Vec<Option<RawRule>>>>,
}

impl RuleStoreRecord {
    pub fn new() -> Self {
        Self {
            version: RULES_VERSION,
            categories: BTreeMap::new(),
        }
    }
}

impl Default for RuleStoreRecord {
    fn default() -> Self {
        Self::new()
    }
}

fn check_version(record: RuleStoreRecord) -> Result<RuleStoreRecord, PersistError> {
    if record.version != RULES_VERSION {
        return Err(PersistError::VersionMismatch {
            expected: RULES_VERSION,
            found: record.version,
        });
    }
    Ok(record)
}

/// Write a record as pretty-printed JSON.
pub fn save_json<W: Write>(writer: W, record: &RuleStoreRecord) -> Result<(), PersistError> {
    serde_json::to_writer_pretty(writer, record)?;
    Ok(())
}

/// Read a JSON record.
pub fn load_json<R: Read>(reader: R) -> Result<RuleStoreRecord, PersistError> {
    let record: RuleStoreRecord = serde_json::from_reader(reader)?;
    check_version(record)
}

/// Parse a JSON record held in memory.
pub fn load_json_str(text: &str) -> Result<RuleStoreRecord, PersistError> {
    load_json(text.as_bytes())
}

/// Write a record with bincode.
pub fn save_binary<W: Write>(writer: W, record: &RuleStoreRecord) -> Result<(), PersistError> {
    bincode::serialize_into(writer, record)?;
    Ok(())
}

/// Read a bincode record.
pub fn load_binary<R: Read>(reader: R) -> Result<RuleStoreRecord, PersistError> {
    let record: RuleStoreRecord = bincode::deserialize_from(reader)?;
    check_version(record)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Write a record to `path`, replacing any existing file.
pub fn save_file(path: &Path, record: &RuleStoreRecord) -> Result<(), PersistError> {
    let mut writer = BufWriter::new(File::create(path)?);
    if is_json(path) {
        save_json(&mut writer, record)?;
    } else {
        save_binary(&mut writer, record)?;
    }
    writer.flush()?;
    log::info!("Saved work priority rules to {}", path.display());
    Ok(())
}

/// Read a record from `path`.
pub fn load_file(path: &Path) -> Result<RuleStoreRecord, PersistError> {
    let reader = BufReader::new(File::open(path)?);
    if is_json(path) {
        load_json(reader)
    } else {
        load_binary(reader)
    }
}
