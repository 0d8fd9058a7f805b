//! Configuration for the taint scoreboard.
//!
//! This module defines the configuration structures used to parameterize the
//! scoreboard. It provides:
//! 1. **Defaults:** Baseline constants (taint table size, fallback seed).
//! 2. **Structures:** Scoreboard and ledger sections of the root `Config`.
//! 3. **Enums:** The trigger that decides when compute steps are recorded.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built with `Config::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants.
pub mod defaults {
    /// Taint table capacity used when the host reports zero physical registers.
    pub const NUM_PHYS_REGS: usize = 256;

    /// Seed value used when the host has no vectorised load value to offer (0xa82).
    pub const FALLBACK_SEED: u64 = 2690;

    /// Whether completed chains are listed in the log when a chain closes.
    pub const LOG_CHAINS: bool = true;
}

/// When compute steps are written into the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum RecordTrigger {
    /// Steps are staged while `propagate` runs and committed when the chain closes.
    #[default]
    Inline,
    /// Steps are recorded later (commit or writeback time) through
    /// `TaintScoreboard::record_deferred`, placed by their position in the chain.
    Deferred,
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use dvr_core::config::{Config, RecordTrigger};
///
/// let json = r#"{
///     "scoreboard": { "num_phys_regs": 128, "fallback_seed": 64 },
///     "ledger": { "trigger": "Deferred" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.scoreboard.num_phys_regs, 128);
/// assert_eq!(config.scoreboard.fallback_seed, 64);
/// assert!(config.scoreboard.log_chains);
/// assert_eq!(config.ledger.trigger, RecordTrigger::Deferred);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Taint table and seeding parameters
    #[serde(default)]
    pub scoreboard: ScoreboardConfig,
    /// Compute-step ledger parameters
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// Missing sections and fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the document does not match the schema.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Parse` if its contents do not match the schema.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Taint table and seeding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreboardConfig {
    /// Number of physical registers in the host core (0 selects the default)
    #[serde(default = "ScoreboardConfig::default_num_phys_regs")]
    pub num_phys_regs: usize,

    /// Seed used when the host has no vectorised load value
    #[serde(default = "ScoreboardConfig::default_fallback_seed")]
    pub fallback_seed: u64,

    /// List every completed chain in the log when a chain closes
    #[serde(default = "ScoreboardConfig::default_log_chains")]
    pub log_chains: bool,
}

impl ScoreboardConfig {
    /// Returns the default taint table capacity.
    const fn default_num_phys_regs() -> usize {
        defaults::NUM_PHYS_REGS
    }

    /// Returns the default fallback seed.
    const fn default_fallback_seed() -> u64 {
        defaults::FALLBACK_SEED
    }

    /// Returns the default chain-listing setting.
    const fn default_log_chains() -> bool {
        defaults::LOG_CHAINS
    }

    /// Taint table capacity actually allocated.
    ///
    /// A host that reports zero physical registers gets the default capacity.
    pub const fn effective_num_phys_regs(&self) -> usize {
        if self.num_phys_regs == 0 {
            defaults::NUM_PHYS_REGS
        } else {
            self.num_phys_regs
        }
    }
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self {
            num_phys_regs: defaults::NUM_PHYS_REGS,
            fallback_seed: defaults::FALLBACK_SEED,
            log_chains: defaults::LOG_CHAINS,
        }
    }
}

/// Compute-step ledger configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// When compute steps are recorded
    #[serde(default)]
    pub trigger: RecordTrigger,
}
