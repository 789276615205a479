//! Tracing setup
//!
//! The global subscriber can only be installed once per process, so this
//! binary holds a single test.

use serial_test::serial;
use stagehand_common::config::LoggingConfig;
use stagehand_common::logging::init_tracing;

#[test]
#[serial]
fn test_file_logging_installs_once() {
    std::env::remove_var("RUST_LOG");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("client.log");
    let config = LoggingConfig {
        level: "info".to_string(),
        file: Some(path.clone()),
    };

    assert!(init_tracing(&config).unwrap());
    tracing::info!("bridge ready");
    tracing::debug!("filtered out");

    assert!(!init_tracing(&config).unwrap());

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("bridge ready"));
    assert!(!content.contains("filtered out"));
}
