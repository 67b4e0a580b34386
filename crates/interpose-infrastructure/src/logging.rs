//! Structured logging with tracing
//!
//! Interception logs at `trace` for every proxy type lookup and every
//! wrapped activation, so the filter is a base level plus per-module
//! directives such as `interpose_infrastructure::proxy=trace`. When
//! `INTERPOSE_LOG` is set it replaces both.

use std::ffi::OsStr;
use std::path::Path;
use std::str::FromStr;

use interpose_domain::error::{Error, Result};
use tracing::level_filters::LevelFilter;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use crate::config::AppConfig;
pub use crate::config::LoggingConfig;
use crate::constants::{LOG_FILE_STEM, LOG_FILTER_ENV_VAR};

type OutputLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber described by `config`
///
/// Fails when the level or a directive is invalid, or when a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;

    Registry::default()
        .with(output_layers(config))
        .with(filter)
        .try_init()
        .map_err(|err| {
            Error::configuration_with_source("Failed to install the tracing subscriber", err)
        })?;

    info!(
        level = %config.level,
        directives = config.directives.len(),
        json = config.json_format,
        file = ?config.file_output,
        "Logging initialized"
    );
    Ok(())
}

/// Filter for `config`, unless `INTERPOSE_LOG` overrides it
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let level = parse_log_level(&config.level)?;
    let directives = config
        .directives
        .iter()
        .map(|directive| parse_directive(directive))
        .collect::<Result<Vec<_>>>()?;

    if let Ok(filter) = EnvFilter::try_from_env(LOG_FILTER_ENV_VAR) {
        return Ok(filter);
    }

    Ok(directives.into_iter().fold(
        EnvFilter::default().add_directive(LevelFilter::from_level(level).into()),
        EnvFilter::add_directive,
    ))
}

/// Parse a level name; `warning` is accepted for `warn`
pub fn parse_log_level(level: &str) -> Result<Level> {
    let name = level.trim();
    let name = if name.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        name
    };
    Level::from_str(name).map_err(|_| {
        Error::configuration(format!(
            "Invalid log level '{level}': use trace, debug, info, warn or error"
        ))
    })
}

/// Parse one `target=level` filter directive
pub fn parse_directive(directive: &str) -> Result<Directive> {
    Directive::from_str(directive.trim()).map_err(|err| {
        Error::configuration_with_source(format!("Invalid log directive '{directive}'"), err)
    })
}

fn output_layers(config: &LoggingConfig) -> Vec<OutputLayer> {
    let mut layers = vec![stdout_layer(config.json_format)];
    if let Some(path) = &config.file_output {
        layers.push(file_layer(path, config.json_format));
    }
    layers
}

fn stdout_layer(json: bool) -> OutputLayer {
    let layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

fn file_layer(path: &Path, json: bool) -> OutputLayer {
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let stem = path.file_stem().unwrap_or_else(|| OsStr::new(LOG_FILE_STEM));
    let layer = fmt::layer()
        .with_writer(tracing_appender::rolling::daily(directory, stem))
        .with_ansi(false)
        .with_target(true);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Report whether a configuration file was merged
pub fn log_config_source(config_path: &Path, found: bool) {
    if found {
        info!(path = %config_path.display(), "Configuration file merged");
    } else {
        warn!(path = %config_path.display(), "Configuration file not found, using defaults");
    }
}

/// Report the settings the interception runtime will be built with
pub fn log_effective_config(config: &AppConfig) {
    debug!(
        type_name_prefix = %config.proxy.type_name_prefix,
        cache_generated_types = config.proxy.cache_generated_types,
        max_resolve_depth = config.container.max_resolve_depth,
        log_level = %config.logging.level,
        "Effective configuration"
    );
}
