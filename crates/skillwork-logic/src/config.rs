//! Engine configuration.
//!
//! Loaded from JSON by the host (usually alongside its own mod settings);
//! every field has a default so a partial file is fine.
//!
//! ```
//! use skillwork_logic::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{"reconcile_interval_ticks": 250}"#).unwrap();
//! assert_eq!(config.reconcile_interval_ticks, 250);
//! assert!(config.log_pass_summaries);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::schedule;
use crate::error::ConfigError;
use crate::rule::RangeRule;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Host ticks between timer-driven passes. `0` turns the timer off;
    /// triggered passes still run.
    pub reconcile_interval_ticks: u64,
    /// Template for rules added through the editor.
    pub new_rule: RangeRule,
    /// Log an info line for every pass that changed something.
    pub log_pass_summaries: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reconcile_interval_ticks: schedule::DEFAULT_INTERVAL_TICKS,
            new_rule: RangeRule::default(),
            log_pass_summaries: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reconcile_interval_ticks > schedule::MAX_INTERVAL_TICKS {
            return Err(ConfigError::IntervalTooLong(self.reconcile_interval_ticks));
        }
        Ok(())
    }
}
