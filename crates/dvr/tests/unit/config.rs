//! # Configuration Tests
//!
//! Defaults, JSON parsing and file loading.

use std::io::Write;

use dvr_core::common::ConfigError;
use dvr_core::config::*;
use dvr_core::TaintScoreboard;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.scoreboard.num_phys_regs, 256);
    assert_eq!(config.scoreboard.fallback_seed, 2690);
    assert!(config.scoreboard.log_chains);
    assert_eq!(config.ledger.trigger, RecordTrigger::Inline);
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = Config::from_json(r#"{"scoreboard": {"log_chains": false}}"#).unwrap();
    assert!(!config.scoreboard.log_chains);
    assert_eq!(config.scoreboard.num_phys_regs, defaults::NUM_PHYS_REGS);
    assert_eq!(config.scoreboard.fallback_seed, defaults::FALLBACK_SEED);
}

#[test]
fn test_capacity_follows_config() {
    let config = Config::from_json(r#"{"scoreboard": {"num_phys_regs": 48}}"#).unwrap();
    assert_eq!(TaintScoreboard::with_config(&config).capacity(), 48);

    let config = Config::from_json(r#"{"scoreboard": {"num_phys_regs": 0}}"#).unwrap();
    assert_eq!(TaintScoreboard::with_config(&config).capacity(), 256);
    assert_eq!(TaintScoreboard::new(0).capacity(), 256);
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"ledger": {"trigger": "Deferred"}}"#)
        .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.ledger.trigger, RecordTrigger::Deferred);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_wrong_type_rejected() {
    let err = Config::from_json(r#"{"scoreboard": {"num_phys_regs": "many"}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}
