use std::path::Path;
use std::time::Duration;

use elevator_sim::config::{load_config, parse_config, SimConfig};
use elevator_sim::simulation::{error_kind, SimError, DEFAULT_CAPACITY, DEFAULT_TRAVEL_TIME_MS};

#[test]
fn test_empty_config_uses_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config, SimConfig::default());
    assert_eq!(config.building.floors, 10);
    assert_eq!(config.building.elevators, 3);
    assert_eq!(config.elevator.capacity, DEFAULT_CAPACITY);
    assert_eq!(config.elevator.travel_time_ms, DEFAULT_TRAVEL_TIME_MS);
    assert_eq!(config.driver.tick_interval(), Duration::from_millis(250));
}

#[test]
fn test_partial_config_keeps_other_defaults() {
    let config = parse_config(
        r#"
        [building]
        floors = 25

        [elevator]
        travel_time_ms = 50
        "#,
    )
    .unwrap();

    assert_eq!(config.building.floors, 25);
    assert_eq!(config.building.elevators, 3);
    assert_eq!(config.elevator.capacity, DEFAULT_CAPACITY);
    assert_eq!(config.elevator.travel_time(), Duration::from_millis(50));
}

#[test]
fn test_malformed_config_is_an_error() {
    assert!(parse_config("[building\nfloors = 3").is_err());
    assert!(parse_config("[building]\nfloors = \"many\"").is_err());
}

#[test]
fn test_zero_counts_fail_validation() {
    let mut config = SimConfig::default();
    assert!(config.validate().is_ok());

    config.elevator.capacity = 0;
    let err = config.validate().unwrap_err();
    assert!(matches!(error_kind(&err), Some(SimError::Configuration(_))));

    let mut config = SimConfig::default();
    config.building.floors = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_missing_file_reports_path() {
    let err = load_config(Path::new("does/not/exist.toml")).unwrap_err();
    assert!(format!("{:#}", err).contains("does/not/exist.toml"));
}

#[test]
fn test_shipped_config_loads() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
    let config = load_config(&path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.building.floors, 10);
}
