//! Configuration loaded from TOML driving the generator and container.

use std::io::Write;

use interpose::infrastructure::config::{ConfigBuilder, ContainerConfig, ProxyConfig};
use interpose::prelude::*;
use serde_json::json;
use tempfile::NamedTempFile;

use crate::test_utils::test_fixtures::{ADD_ONE_TYPE, CALCULATOR, register_interceptors};

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_type_name_prefix_from_file() {
    let file = config_file(
        r#"
[proxy]
type_name_prefix = "Generated"
"#,
    );
    let config = ConfigLoader::new().with_config_path(file.path()).load().unwrap();
    let runtime = bootstrap(&config);
    let mut builder = runtime.container_builder();
    register_interceptors(&mut builder);
    builder
        .register_type(&CALCULATOR)
        .enable_class_interceptors(runtime.interception())
        .unwrap()
        .intercepted_by_types(&[ADD_ONE_TYPE.clone()])
        .unwrap();
    let container = builder.build().unwrap();

    let calculator = container.resolve_type(&CALCULATOR).unwrap();

    assert_eq!(calculator.runtime_type().name(), "Generated.CalculatorProxy");
    assert_eq!(calculator.invoke("add", &[json!(2), json!(3)]).unwrap(), json!(6));
    assert_eq!(runtime.config().proxy.type_name_prefix, "Generated");
}

#[test]
fn test_disabled_type_cache_generates_fresh_types() {
    let config = ConfigBuilder::new()
        .with_proxy(ProxyConfig {
            type_name_prefix: "Fresh".to_string(),
            cache_generated_types: false,
        })
        .build()
        .unwrap();
    let runtime = bootstrap(&config);
    let mut builder = runtime.container_builder();
    builder
        .register_type(&CALCULATOR)
        .enable_class_interceptors(runtime.interception())
        .unwrap();
    builder
        .register_type(&CALCULATOR)
        .named("second")
        .enable_class_interceptors(runtime.interception())
        .unwrap();
    let container = builder.build().unwrap();

    let first = container.resolve_type(&CALCULATOR).unwrap();
    let second = container.resolve_named("second").unwrap();

    assert_ne!(first.runtime_type(), second.runtime_type());
    assert_eq!(first.runtime_type().name(), "Fresh.CalculatorProxy");
    assert_eq!(second.runtime_type().name(), "Fresh.CalculatorProxy_1");
    assert_eq!(runtime.generator().cached_types(), 0);
}

#[test]
fn test_container_section_reaches_the_builder() {
    let file = config_file(
        r#"
[container]
max_resolve_depth = 7
"#,
    );
    let config = ConfigLoader::new().with_config_path(file.path()).load().unwrap();

    assert_eq!(config.container, ContainerConfig { max_resolve_depth: 7 });
    assert_eq!(config.proxy, ProxyConfig::default());
}

#[test]
fn test_invalid_values_are_rejected() {
    let empty_prefix = config_file(
        r#"
[proxy]
type_name_prefix = "  "
"#,
    );
    let zero_depth = config_file(
        r#"
[container]
max_resolve_depth = 0
"#,
    );
    let bad_level = config_file(
        r#"
[logging]
level = "loud"
"#,
    );

    for file in [&empty_prefix, &zero_depth, &bad_level] {
        let err = ConfigLoader::new()
            .with_config_path(file.path())
            .load()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration { .. }), "{err}");
    }
}

#[test]
fn test_malformed_file_is_a_configuration_error() {
    let file = config_file("[proxy\ntype_name_prefix = ");

    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .load()
        .err()
        .unwrap();

    assert!(matches!(err, Error::Configuration { .. }));
}
