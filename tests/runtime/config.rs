//! Integration tests for runtime configuration

use questlogic_engine::CompletionMode;
use questlogic_foundation::ErrorKind;
use questlogic_runtime::RuntimeConfig;

use crate::temp_path;

#[test]
fn config_file_maps_onto_pipeline() {
    let path = temp_path("config.toml");
    std::fs::write(
        &path,
        "[completion]\nmode = \"backward-only\"\nmax_fetches = 50\n\n[pipeline]\ncontract = false\n",
    )
    .unwrap();

    let config = RuntimeConfig::load(&path).unwrap();
    let pipeline = config.pipeline();
    assert_eq!(pipeline.mode, CompletionMode::BackwardOnly);
    assert_eq!(pipeline.limits.max_fetches, 50);
    assert!(pipeline.reduce);
    assert!(!pipeline.contract);
    assert_eq!(config.log.filter, "questlogic=info");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn config_round_trips_through_toml() {
    let config = RuntimeConfig::from_toml("[log]\nfilter = \"questlogic=debug\"\n").unwrap();
    let text = config.to_toml().unwrap();
    assert_eq!(RuntimeConfig::from_toml(&text).unwrap(), config);
}

#[test]
fn bad_config_is_a_config_error() {
    let err = RuntimeConfig::from_toml("[completion]\nmode = \"sideways\"\n").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ConfigError(_)));
}
