//! Logging Tests

use interpose_domain::Error;
use interpose_infrastructure::config::ConfigBuilder;
use interpose_infrastructure::constants::DEFAULT_LOG_LEVEL;
use interpose_infrastructure::logging::{
    LoggingConfig, build_filter, init_logging, parse_directive, parse_log_level,
};
use tracing::Level;

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("debug").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("INFO").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warn").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("Warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level(" error ").unwrap(), Level::ERROR);

    assert!(parse_log_level("invalid").is_err());
}

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, DEFAULT_LOG_LEVEL);
    assert!(config.directives.is_empty());
    assert!(!config.json_format);
    assert!(config.file_output.is_none());
}

#[test]
fn test_parse_directive() {
    assert!(parse_directive("interpose_infrastructure::proxy=trace").is_ok());
    assert!(parse_directive("debug").is_ok());

    let err = parse_directive("proxy=loudest").err().unwrap();
    assert!(matches!(err, Error::Configuration { source: Some(_), .. }));
    assert!(err.to_string().contains("proxy=loudest"));
}

#[test]
fn test_filter_rejects_invalid_directives() {
    let config = LoggingConfig {
        directives: vec![
            "interpose_infrastructure::di=debug".to_string(),
            "interpose_application=chatty".to_string(),
        ],
        ..LoggingConfig::default()
    };

    assert!(build_filter(&config).is_err());
}

#[test]
fn test_filter_accepts_module_overrides() {
    let config = LoggingConfig {
        level: "warn".to_string(),
        directives: vec!["interpose_infrastructure::proxy=trace".to_string()],
        ..LoggingConfig::default()
    };

    assert!(build_filter(&config).is_ok());
}

#[test]
fn test_builder_validates_directives() {
    let err = ConfigBuilder::new()
        .with_logging(LoggingConfig {
            directives: vec!["proxy=loudest".to_string()],
            ..LoggingConfig::default()
        })
        .build()
        .err()
        .unwrap();

    assert!(err.to_string().contains("proxy=loudest"));
}

#[test]
fn test_init_rejects_invalid_level() {
    let config = LoggingConfig {
        level: "shouting".to_string(),
        ..LoggingConfig::default()
    };

    assert!(init_logging(&config).is_err());
}
